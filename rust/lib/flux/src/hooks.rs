//! Ready-made resources for the FriendFrame screens.

use std::sync::Arc;

use friendframe_client::{ApiClient, ApiError};
use friendframe_types::{Frame, Group};

use crate::resource::{Resource, ResourceSource};
use crate::store::StateStore;

/// Store path of the groups snapshot.
pub const GROUPS_PATH: &str = "groups/list";

/// Store path of the frames snapshot.
pub const FRAMES_PATH: &str = "frames/list";

pub type Groups = Resource<Group>;
pub type Frames = Resource<Frame>;

/// Lists groups through the API client.
pub struct GroupsSource(pub ApiClient);

#[async_trait::async_trait]
impl ResourceSource<Group> for GroupsSource {
    async fn list(&self) -> Result<Vec<Group>, ApiError> {
        self.0.list_groups().await
    }
}

/// Lists frames through the API client.
pub struct FramesSource(pub ApiClient);

#[async_trait::async_trait]
impl ResourceSource<Frame> for FramesSource {
    async fn list(&self) -> Result<Vec<Frame>, ApiError> {
        self.0.list_frames().await
    }
}

pub fn use_groups(client: ApiClient, store: Arc<StateStore>) -> Groups {
    Resource::new("groups", GROUPS_PATH, Arc::new(GroupsSource(client)), store)
}

pub fn use_frames(client: ApiClient, store: Arc<StateStore>) -> Frames {
    Resource::new("frames", FRAMES_PATH, Arc::new(FramesSource(client)), store)
}
