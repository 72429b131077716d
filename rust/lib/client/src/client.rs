use std::sync::Arc;

use friendframe_types::{
    CurrentUser, Frame, FrameId, Group, GroupId, MAX_BATTERY_LEVEL, PhotoAlbum, UserId,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::dto::{
    AlbumDto, ConfigureGroupRequest, CreateGroupRequest, CreateGroupResponse, DeviceDto,
    ErrorBody, GroupDto, JoinGroupRequest, JoinGroupResponse, MeResponse, RegisterDeviceRequest,
    RegisterDeviceResponse, RemoveMemberRequest, ShareTokenResponse,
};
use crate::error::ApiError;
use crate::identity::IdentityProvider;
use crate::mapping;

// ── Inputs ──────────────────────────────────────────────────────────

/// Input for [`ApiClient::create_group`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewGroup {
    pub name: String,
    /// Kept client-side; the service does not store descriptions.
    pub description: Option<String>,
    pub cover_image: Option<String>,
}

/// Input for [`ApiClient::update_group`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupUpdate {
    pub cover_image: Option<String>,
}

/// Input for [`ApiClient::register_frame`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewFrame {
    pub serial_number: String,
    pub name: Option<String>,
    pub group_id: Option<GroupId>,
    pub battery_level: Option<u8>,
}

// ── ApiClient ───────────────────────────────────────────────────────

/// One method per FriendFrame domain action.
///
/// Each call fetches a token from the identity provider, sends the request
/// with it, and maps the result. A missing token or a 401 response asks the
/// provider to redirect to sign-in and fails with
/// [`ApiError::Authentication`]; the request is never retried and no
/// substitute data is returned.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    identity: Arc<dyn IdentityProvider>,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, ApiError> {
        let base = config.normalized_base_url();
        let base_url = Url::parse(base)
            .map_err(|e| ApiError::Validation(format!("invalid API url '{}': {}", base, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Validation(format!("invalid API url '{}'", base)));
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, base_url, identity })
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Groups ──────────────────────────────────────────────────────

    /// All groups visible to the signed-in user, in service order.
    pub async fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        let groups: Vec<GroupDto> = self.get_json(&["groups"]).await?;
        let me = self.me().await?;
        debug!("Listed {} groups for {}", groups.len(), me.user_id);
        let stamp = mapping::now_stamp();
        Ok(groups
            .into_iter()
            .map(|g| mapping::to_group(g, Some(&me.user_id), &stamp))
            .collect())
    }

    pub async fn create_group(&self, group: NewGroup) -> Result<Group, ApiError> {
        let name = group.name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("group name is required".into()));
        }
        let body = CreateGroupRequest {
            name: name.to_string(),
            cover_art: group.cover_image.clone().filter(|c| !c.is_empty()),
        };
        let resp: CreateGroupResponse = self.send_json(Method::POST, &["groups"], &body).await?;
        let created = resp
            .group
            .ok_or_else(|| ApiError::Decode("create group: response has no group".into()))?;
        let me = self.me().await?;

        let mut mapped = mapping::to_group(created, Some(&me.user_id), &mapping::now_stamp());
        if mapped.description.is_none() {
            mapped.description = group.description;
        }
        if mapped.cover_image.is_empty() {
            mapped.cover_image = group.cover_image.unwrap_or_default();
        }
        Ok(mapped)
    }

    pub async fn delete_group(&self, id: &GroupId) -> Result<(), ApiError> {
        require_id("group id", id)?;
        self.send_empty(Method::DELETE, &["groups", id.as_str()], None::<&()>).await
    }

    pub async fn remove_member(
        &self,
        group_id: &GroupId,
        member_id: &UserId,
    ) -> Result<(), ApiError> {
        require_id("group id", group_id)?;
        require_id("member id", member_id)?;
        let body = RemoveMemberRequest { member_id: member_id.to_string() };
        self.send_empty(
            Method::POST,
            &["groups", group_id.as_str(), "members", "remove"],
            Some(&body),
        )
        .await
    }

    /// Change a group's cover art.
    pub async fn update_group(
        &self,
        group_id: &GroupId,
        update: GroupUpdate,
    ) -> Result<(), ApiError> {
        require_id("group id", group_id)?;
        let body = ConfigureGroupRequest { cover_art: update.cover_image };
        self.send_empty(Method::PATCH, &["groups", group_id.as_str()], Some(&body)).await
    }

    /// Join a group using a share token. Returns the service's `ok` flag.
    pub async fn join_group(&self, share_token: &str) -> Result<bool, ApiError> {
        let share_token = share_token.trim();
        if share_token.is_empty() {
            return Err(ApiError::Validation("share token is required".into()));
        }
        let body = JoinGroupRequest { share_token: share_token.to_string() };
        let resp: JoinGroupResponse = self
            .send_json(Method::POST, &["groups", "join"], &body)
            .await?;
        Ok(resp.ok)
    }

    /// Mint an invite token for a group.
    pub async fn create_share_token(&self, group_id: &GroupId) -> Result<String, ApiError> {
        require_id("group id", group_id)?;
        let resp: ShareTokenResponse = self
            .send_json(
                Method::POST,
                &["groups", group_id.as_str(), "share-token"],
                &serde_json::json!({}),
            )
            .await?;
        Ok(resp.share_token)
    }

    // ── Frames ──────────────────────────────────────────────────────

    pub async fn list_frames(&self) -> Result<Vec<Frame>, ApiError> {
        let devices: Vec<DeviceDto> = self.get_json(&["devices"]).await?;
        let stamp = mapping::now_stamp();
        Ok(devices.into_iter().map(|d| mapping::to_frame(d, &stamp)).collect())
    }

    /// Frames not assigned to any group.
    pub async fn list_ungrouped_frames(&self) -> Result<Vec<Frame>, ApiError> {
        let frames = self.list_frames().await?;
        Ok(frames.into_iter().filter(Frame::is_ungrouped).collect())
    }

    pub async fn register_frame(&self, frame: NewFrame) -> Result<Frame, ApiError> {
        let serial = frame.serial_number.trim();
        if serial.is_empty() {
            return Err(ApiError::Validation("serial number is required".into()));
        }
        let body = RegisterDeviceRequest { name: frame.name.clone().filter(|n| !n.is_empty()) };
        let resp: RegisterDeviceResponse =
            self.send_json(Method::POST, &["devices", serial], &body).await?;
        let device = resp
            .device
            .ok_or_else(|| ApiError::Decode("register device: response has no device".into()))?;

        let mut mapped = mapping::to_frame(device, &mapping::now_stamp());
        if mapped.id.is_empty() {
            mapped.id = FrameId::new(serial);
            mapped.serial_number = Some(serial.to_string());
        }
        if mapped.name.is_none() {
            mapped.name = frame.name;
        }
        if mapped.group_id.is_none() {
            mapped.group_id = frame.group_id;
        }
        if let Some(level) = frame.battery_level {
            mapped.battery_level = level.min(MAX_BATTERY_LEVEL);
        }
        Ok(mapped)
    }

    pub async fn unregister_frame(&self, id: &FrameId) -> Result<(), ApiError> {
        require_id("frame id", id)?;
        self.send_empty(Method::DELETE, &["devices", id.as_str()], None::<&()>).await
    }

    pub async fn add_frame_to_group(
        &self,
        frame_id: &FrameId,
        group_id: &GroupId,
    ) -> Result<(), ApiError> {
        require_id("frame id", frame_id)?;
        require_id("group id", group_id)?;
        self.send_empty(
            Method::POST,
            &["groups", group_id.as_str(), "devices", frame_id.as_str()],
            None::<&()>,
        )
        .await
    }

    // ── User / photos ───────────────────────────────────────────────

    pub async fn me(&self) -> Result<CurrentUser, ApiError> {
        let me: MeResponse = self.get_json(&["me"]).await?;
        Ok(mapping::to_user(me))
    }

    pub async fn list_albums(&self) -> Result<Vec<PhotoAlbum>, ApiError> {
        let albums: Vec<AlbumDto> = self.get_json(&["albums"]).await?;
        albums.into_iter().map(mapping::to_album).collect()
    }

    // ── Transport ───────────────────────────────────────────────────

    /// Resolve path segments against the base URL, percent-encoding each.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Validation(format!("invalid API url '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach the bearer token, or redirect to sign-in if there is none.
    async fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.identity.token().await {
            Ok(Some(token)) if !token.is_empty() => Ok(builder.bearer_auth(token)),
            Ok(_) => {
                warn!("No session token; redirecting to sign-in");
                self.identity.redirect_to_sign_in();
                Err(ApiError::Authentication("missing session token".into()))
            }
            Err(e) => {
                warn!("Token acquisition failed: {}", e);
                self.identity.redirect_to_sign_in();
                Err(e)
            }
        }
    }

    /// Send with auth, mapping 401 and other non-2xx statuses to errors.
    async fn execute<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(segments)?;
        debug!("{} {}", method, url.path());
        let mut builder = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let builder = self.authed(builder).await?;
        let resp = builder.send().await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            let reason = ErrorBody::reason(&resp.text().await.unwrap_or_default());
            warn!("{} {} rejected the session; redirecting to sign-in", method, url.path());
            self.identity.redirect_to_sign_in();
            return Err(ApiError::Authentication(if reason.is_empty() {
                "session rejected".into()
            } else {
                reason
            }));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = ErrorBody::reason(&body);
            debug!("{} {} failed: {} {}", method, url.path(), status.as_u16(), message);
            return Err(ApiError::Service {
                status: status.as_u16(),
                message: if message.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    message
                },
            });
        }
        Ok(resp)
    }

    async fn parse<R: DeserializeOwned>(resp: Response, what: &str) -> Result<R, ApiError> {
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("{}: {}", what, e)))
    }

    async fn get_json<R: DeserializeOwned>(&self, segments: &[&str]) -> Result<R, ApiError> {
        let resp = self.execute(Method::GET, segments, None::<&()>).await?;
        Self::parse(resp, &segments.join("/")).await
    }

    async fn send_json<B, R>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<R, ApiError>
    where
        B: serde::Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.execute(method, segments, Some(body)).await?;
        Self::parse(resp, &segments.join("/")).await
    }

    async fn send_empty<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: serde::Serialize + ?Sized,
    {
        self.execute(method, segments, body).await?;
        Ok(())
    }
}

fn require_id(what: &str, id: &str) -> Result<(), ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} is required", what)));
    }
    Ok(())
}
