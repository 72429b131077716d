//! Wire-format types for the FriendFrame service.
//!
//! Field names match the service exactly (snake_case). Nothing outside the
//! client should see these; [`crate::mapping`] turns them into UI types.

use serde::{Deserialize, Serialize};

/// A device as reported by `GET /devices` and nested in groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Percent. Some firmware reports fractional readings.
    #[serde(default)]
    pub last_battery_level: Option<f64>,
    #[serde(default)]
    pub group_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// User id of the owner.
    #[serde(default)]
    pub owner: Option<String>,
    /// Member entries; only their count is surfaced. The service may send
    /// `null` for an empty list.
    #[serde(default)]
    pub members: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub devices: Option<Vec<DeviceDto>>,
    #[serde(default)]
    pub cover_art: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumDto {
    pub id: String,
    pub name: String,
    pub source: String,
    #[serde(default)]
    pub photo_count: u32,
}

// ── Requests ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_art: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigureGroupRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_art: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveMemberRequest {
    pub member_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinGroupRequest {
    pub share_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterDeviceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ── Responses ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGroupResponse {
    #[serde(default)]
    pub group: Option<GroupDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterDeviceResponse {
    #[serde(default)]
    pub device: Option<DeviceDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinGroupResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareTokenResponse {
    pub share_token: String,
}

/// Error body. The service sends `{"message": ..}`; some proxies send
/// `{"error": ..}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Best human-readable reason from a raw error body.
    pub fn reason(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.trim().to_string())
    }
}
