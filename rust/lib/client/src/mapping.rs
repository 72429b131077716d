//! DTO → UI model translation.
//!
//! The service omits everything the UI derives for itself (status, counts,
//! ownership, timestamps). Defaults are filled in here and nowhere else.

use friendframe_types::{
    AlbumSource, CurrentUser, Frame, FrameId, FrameStatus, Group, GroupId, PhotoAlbum, UserId,
    MAX_BATTERY_LEVEL,
};

use crate::dto::{AlbumDto, DeviceDto, GroupDto, MeResponse};
use crate::error::ApiError;

/// Timestamp stamped on freshly mapped records.
pub fn now_stamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Map a device. The device id doubles as its serial number.
pub fn to_frame(d: DeviceDto, stamp: &str) -> Frame {
    let id = d.id.unwrap_or_default();
    Frame {
        id: FrameId::new(id.clone()),
        name: d.name,
        serial_number: Some(id),
        battery_level: d
            .last_battery_level
            .map(|level| Frame::clamp_battery(level.round() as i64))
            .unwrap_or(MAX_BATTERY_LEVEL),
        last_updated: Some(stamp.to_string()),
        last_photo_displayed: None,
        status: FrameStatus::Online,
        group_id: d.group_id.filter(|g| !g.is_empty()).map(GroupId::new),
        advanced_config: None,
    }
}

/// Map a group. `me` is the signed-in user; without it nobody owns anything.
///
/// Devices that do not name a group inherit the enclosing one.
pub fn to_group(g: GroupDto, me: Option<&UserId>, stamp: &str) -> Group {
    let group_id = GroupId::new(g.id);
    let frames: Vec<Frame> = g
        .devices
        .unwrap_or_default()
        .into_iter()
        .map(|d| {
            let mut frame = to_frame(d, stamp);
            if frame.group_id.is_none() {
                frame.group_id = Some(group_id.clone());
            }
            frame
        })
        .collect();
    let is_owner = match (me, g.owner.as_deref()) {
        (Some(me), Some(owner)) => !me.is_empty() && me.as_str() == owner,
        _ => false,
    };

    let mut group = Group {
        id: group_id,
        name: g.name,
        description: g.description,
        members_count: g.members.map_or(0, |m| m.len()) as u32,
        frames_count: 0,
        cover_image: g.cover_art.unwrap_or_default(),
        last_updated: Some(stamp.to_string()),
        is_owner,
        photo_albums: None,
        frames: Vec::new(),
    };
    group.set_frames(frames);
    group
}

pub fn to_user(me: MeResponse) -> CurrentUser {
    CurrentUser {
        user_id: UserId::new(me.user_id),
        email: me.email,
        name: me.name,
    }
}

pub fn to_album(a: AlbumDto) -> Result<PhotoAlbum, ApiError> {
    let source = match a.source.to_ascii_lowercase().as_str() {
        "apple" => AlbumSource::Apple,
        "google" => AlbumSource::Google,
        other => {
            return Err(ApiError::Decode(format!(
                "album {}: unknown source '{}'",
                a.id, other
            )));
        }
    };
    Ok(PhotoAlbum {
        id: a.id,
        name: a.name,
        source,
        photo_count: a.photo_count,
    })
}
