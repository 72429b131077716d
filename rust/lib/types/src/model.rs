use serde::{Deserialize, Serialize};
use std::fmt;

use crate::id::{FrameId, GroupId, UserId};

/// Upper bound of [`Frame::battery_level`], in percent.
pub const MAX_BATTERY_LEVEL: u8 = 100;

// ── Group ───────────────────────────────────────────────────────────

/// A named collection of frames shared between members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub members_count: u32,
    pub frames_count: u32,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// True when the signed-in user owns the group.
    pub is_owner: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_albums: Option<Vec<PhotoAlbum>>,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl Group {
    /// `frames_count` agrees with the frames actually held.
    pub fn is_consistent(&self) -> bool {
        self.frames_count as usize == self.frames.len()
    }

    /// Replace the frame list, keeping `frames_count` in step.
    pub fn set_frames(&mut self, frames: Vec<Frame>) {
        self.frames_count = frames.len() as u32;
        self.frames = frames;
    }
}

// ── Frame ───────────────────────────────────────────────────────────

/// Connectivity state of a frame as shown in the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStatus {
    #[default]
    Online,
    Offline,
    Sleep,
}

impl FrameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameStatus::Online => "online",
            FrameStatus::Offline => "offline",
            FrameStatus::Sleep => "sleep",
        }
    }
}

impl fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame settings that are only editable from the advanced panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_code: Option<String>,
    /// Minutes between photo changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u32>,
    /// Percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
}

/// A registered physical photo frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub id: FrameId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Device-assigned serial, distinct from the UI id in principle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    pub battery_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_photo_displayed: Option<String>,
    #[serde(default)]
    pub status: FrameStatus,
    /// Owning group. When set it names a group the user can see; the client
    /// takes this from the service and does not re-check it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_config: Option<AdvancedConfig>,
}

impl Frame {
    pub fn is_ungrouped(&self) -> bool {
        self.group_id.as_ref().is_none_or(|g| g.is_empty())
    }

    /// Clamp a raw battery reading into `0..=100`.
    pub fn clamp_battery(raw: i64) -> u8 {
        raw.clamp(0, MAX_BATTERY_LEVEL as i64) as u8
    }
}

// ── Albums / identity ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumSource {
    Apple,
    Google,
}

impl fmt::Display for AlbumSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlbumSource::Apple => f.write_str("apple"),
            AlbumSource::Google => f.write_str("google"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAlbum {
    pub id: String,
    pub name: String,
    pub source: AlbumSource,
    pub photo_count: u32,
}

/// The signed-in user as the service knows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
