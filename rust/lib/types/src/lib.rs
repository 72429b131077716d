//! UI-facing domain model for FriendFrame.
//!
//! These are the shapes the presentation layer consumes. They are never
//! deserialized straight off the wire: the API client owns the translation
//! from the service's snake_case DTOs and fills in the UI-only fields
//! (status, counts, ownership).
//!
//! All types serialize camelCase, and optional fields are omitted when absent.

mod id;
mod model;

pub use id::{FrameId, GroupId, UserId};
pub use model::{
    AdvancedConfig, AlbumSource, CurrentUser, Frame, FrameStatus, Group, PhotoAlbum,
    MAX_BATTERY_LEVEL,
};
