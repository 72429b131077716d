//! Flux: client-side state for FriendFrame screens.
//!
//! Two layers:
//!
//! - [`StateStore`]: a path-keyed store of type-erased values with
//!   subscriptions (`groups/list`, `groups/#`, `#`).
//! - [`Resource`]: one entity list (`data`, `is_loading`, `error`) that
//!   fetches through a [`ResourceSource`], gates on the identity provider,
//!   and publishes every change into the store.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use friendframe_flux::{StateStore, use_groups, GROUPS_PATH};
//!
//! let store = Arc::new(StateStore::new());
//! let groups = use_groups(client, store.clone());
//!
//! store.subscribe(GROUPS_PATH, |_, v| { /* re-render */ });
//! groups.sync_with(identity.as_ref()).await;
//! ```

pub mod hooks;
pub mod resource;
pub mod store;
pub mod value;

pub use hooks::{
    FRAMES_PATH, Frames, FramesSource, GROUPS_PATH, Groups, GroupsSource, use_frames, use_groups,
};
pub use resource::{FetchError, FetchOutcome, Resource, ResourceSource, ResourceState, Session};
pub use store::{ChangeHandler, StateStore};
pub use value::{StateValue, SubscriptionId};
