//! Client tests against a real HTTP server.
//!
//! Starts an axum server on a random port that mimics the FriendFrame
//! service, then drives every `ApiClient` operation through it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use friendframe_types::{AlbumSource, FrameId, FrameStatus, GroupId, UserId};

use crate::{ApiClient, ApiError, ClientConfig, GroupUpdate, NewFrame, NewGroup, StaticIdentity};

const GOOD_TOKEN: &str = "good-token";

// =====================================================================
// Test server
// =====================================================================

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<String>>,
    bodies: Mutex<Vec<Value>>,
}

impl Recorder {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn last_body(&self) -> Option<Value> {
        self.bodies.lock().unwrap().last().cloned()
    }
}

type Shared = Arc<Recorder>;

fn check(rec: &Recorder, headers: &HeaderMap, call: String) -> Result<(), Response> {
    rec.calls.lock().unwrap().push(call);
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        == Some(GOOD_TOKEN);
    if authorized {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, Json(json!({"message": "session expired"}))).into_response())
    }
}

fn device(id: &str, battery: Option<u8>, group: Option<&str>) -> Value {
    let mut d = json!({ "id": id, "name": format!("Frame {}", id) });
    if let Some(b) = battery {
        d["last_battery_level"] = json!(b);
    }
    if let Some(g) = group {
        d["group_id"] = json!(g);
    }
    d
}

async fn list_groups(State(rec): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check(&rec, &headers, "GET /groups".into()) {
        return r;
    }
    Json(json!([
        {
            "id": "g1",
            "name": "Family",
            "owner": "u1",
            "members": ["u1", "u2", "u3"],
            "devices": [device("d1", Some(42), Some("g1")), device("d2", None, None)],
            "cover_art": "https://img/family.jpg"
        },
        { "id": "g2", "name": "Work", "owner": "u7" }
    ]))
    .into_response()
}

async fn me(State(rec): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check(&rec, &headers, "GET /me".into()) {
        return r;
    }
    Json(json!({ "user_id": "u1", "email": "ada@example.com" })).into_response()
}

async fn create_group(
    State(rec): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = check(&rec, &headers, "POST /groups".into()) {
        return r;
    }
    rec.bodies.lock().unwrap().push(body.clone());
    Json(json!({
        "group": {
            "id": "g-new",
            "name": body["name"].clone(),
            "owner": "u1",
            "members": ["u1"],
            "cover_art": body.get("cover_art").cloned().unwrap_or(Value::Null)
        }
    }))
    .into_response()
}

async fn delete_group(
    State(rec): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(r) = check(&rec, &headers, format!("DELETE /groups/{}", id)) {
        return r;
    }
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "group not found"}))).into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn update_group(
    State(rec): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = check(&rec, &headers, format!("PATCH /groups/{}", id)) {
        return r;
    }
    rec.bodies.lock().unwrap().push(body);
    StatusCode::NO_CONTENT.into_response()
}

async fn remove_member(
    State(rec): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = check(&rec, &headers, format!("POST /groups/{}/members/remove", id)) {
        return r;
    }
    rec.bodies.lock().unwrap().push(body);
    StatusCode::OK.into_response()
}

async fn join_group(
    State(rec): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = check(&rec, &headers, "POST /groups/join".into()) {
        return r;
    }
    let ok = body["share_token"] == "abc123";
    Json(json!({ "ok": ok })).into_response()
}

async fn share_token(
    State(rec): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(r) = check(&rec, &headers, format!("POST /groups/{}/share-token", id)) {
        return r;
    }
    Json(json!({ "share_token": format!("share-{}", id) })).into_response()
}

async fn add_device_to_group(
    State(rec): State<Shared>,
    headers: HeaderMap,
    Path((group_id, device_id)): Path<(String, String)>,
) -> Response {
    let call = format!("POST /groups/{}/devices/{}", group_id, device_id);
    if let Err(r) = check(&rec, &headers, call) {
        return r;
    }
    StatusCode::OK.into_response()
}

async fn list_devices(State(rec): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check(&rec, &headers, "GET /devices".into()) {
        return r;
    }
    Json(json!([
        device("d1", Some(42), Some("g1")),
        device("d2", None, None),
        device("d3", Some(7), Some(""))
    ]))
    .into_response()
}

async fn register_device(
    State(rec): State<Shared>,
    headers: HeaderMap,
    Path(serial): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = check(&rec, &headers, format!("POST /devices/{}", serial)) {
        return r;
    }
    rec.bodies.lock().unwrap().push(body.clone());
    if serial == "taken" {
        return (StatusCode::CONFLICT, Json(json!({"message": "device already registered"})))
            .into_response();
    }
    let name = body.get("name").cloned().unwrap_or(Value::Null);
    Json(json!({ "device": { "id": serial, "name": name } }))
        .into_response()
}

async fn unregister_device(
    State(rec): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(r) = check(&rec, &headers, format!("DELETE /devices/{}", id)) {
        return r;
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_albums(State(rec): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = check(&rec, &headers, "GET /albums".into()) {
        return r;
    }
    Json(json!([
        { "id": "a1", "name": "Summer", "source": "google", "photo_count": 120 },
        { "id": "a2", "name": "Kids", "source": "apple", "photo_count": 48 }
    ]))
    .into_response()
}

struct TestServer {
    base_url: String,
    recorder: Shared,
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn start_test_server() -> TestServer {
    let recorder: Shared = Arc::new(Recorder::default());
    let app = Router::new()
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/join", post(join_group))
        .route("/groups/{id}", delete(delete_group).patch(update_group))
        .route("/groups/{id}/members/remove", post(remove_member))
        .route("/groups/{id}/share-token", post(share_token))
        .route("/groups/{id}/devices/{device_id}", post(add_device_to_group))
        .route("/devices", get(list_devices))
        .route("/devices/{serial}", post(register_device).delete(unregister_device))
        .route("/me", get(me))
        .route("/albums", get(list_albums))
        .with_state(recorder.clone());
    let base_url = serve(app).await;
    TestServer { base_url, recorder }
}

fn client_with(server: &TestServer, identity: Arc<StaticIdentity>) -> ApiClient {
    ApiClient::new(ClientConfig::new(&server.base_url), identity).unwrap()
}

fn signed_in(server: &TestServer) -> ApiClient {
    client_with(server, Arc::new(StaticIdentity::new(GOOD_TOKEN)))
}

// =====================================================================
// Groups
// =====================================================================

#[tokio::test]
async fn list_groups_maps_and_derives_ownership() {
    let server = start_test_server().await;
    let groups = signed_in(&server).list_groups().await.unwrap();

    assert_eq!(groups.len(), 2);
    let family = &groups[0];
    assert_eq!(family.id, GroupId::new("g1"));
    assert_eq!(family.name, "Family");
    assert!(family.is_owner);
    assert_eq!(family.members_count, 3);
    assert_eq!(family.frames_count, 2);
    assert!(family.is_consistent());
    assert_eq!(family.cover_image, "https://img/family.jpg");
    assert_eq!(family.frames[0].battery_level, 42);
    assert_eq!(family.frames[1].battery_level, 100);
    assert_eq!(family.frames[1].group_id, Some(GroupId::new("g1")));

    let work = &groups[1];
    assert_eq!(work.name, "Work");
    assert!(!work.is_owner);
    assert_eq!(work.frames_count, 0);
    assert_eq!(work.cover_image, "");

    assert_eq!(server.recorder.calls(), vec!["GET /groups", "GET /me"]);
}

#[tokio::test]
async fn create_group_sends_name_and_cover() {
    let server = start_test_server().await;
    let group = signed_in(&server)
        .create_group(NewGroup {
            name: "  Cabin  ".into(),
            description: Some("weekend photos".into()),
            cover_image: Some("https://img/cabin.jpg".into()),
        })
        .await
        .unwrap();

    assert_eq!(group.id, GroupId::new("g-new"));
    assert_eq!(group.name, "Cabin");
    assert_eq!(group.description.as_deref(), Some("weekend photos"));
    assert_eq!(group.cover_image, "https://img/cabin.jpg");
    assert!(group.is_owner);
    assert_eq!(group.members_count, 1);
    assert!(group.frames.is_empty());
    assert_eq!(
        server.recorder.last_body(),
        Some(json!({"name": "Cabin", "cover_art": "https://img/cabin.jpg"}))
    );
}

#[tokio::test]
async fn create_group_rejects_blank_name_without_request() {
    let server = start_test_server().await;
    let err = signed_in(&server)
        .create_group(NewGroup { name: "   ".into(), ..Default::default() })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(server.recorder.calls().is_empty());
}

#[tokio::test]
async fn delete_group_surfaces_service_reason() {
    let server = start_test_server().await;
    let client = signed_in(&server);
    client.delete_group(&GroupId::new("g1")).await.unwrap();

    let err = client.delete_group(&GroupId::new("missing")).await.unwrap_err();
    match err {
        ApiError::Service { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "group not found");
        }
        other => panic!("expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn group_membership_and_sharing() {
    let server = start_test_server().await;
    let client = signed_in(&server);
    let g1 = GroupId::new("g1");

    client.remove_member(&g1, &UserId::new("u2")).await.unwrap();
    assert_eq!(server.recorder.last_body(), Some(json!({"member_id": "u2"})));

    client
        .update_group(&g1, GroupUpdate { cover_image: Some("https://img/new.jpg".into()) })
        .await
        .unwrap();
    assert_eq!(server.recorder.last_body(), Some(json!({"cover_art": "https://img/new.jpg"})));

    assert_eq!(client.create_share_token(&g1).await.unwrap(), "share-g1");
    assert!(client.join_group("abc123").await.unwrap());
    assert!(!client.join_group("nope").await.unwrap());

    let err = client.join_group(" ").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    assert_eq!(
        server.recorder.calls(),
        vec![
            "POST /groups/g1/members/remove",
            "PATCH /groups/g1",
            "POST /groups/g1/share-token",
            "POST /groups/join",
            "POST /groups/join",
        ]
    );
}

// =====================================================================
// Frames
// =====================================================================

#[tokio::test]
async fn list_frames_fills_defaults() {
    let server = start_test_server().await;
    let frames = signed_in(&server).list_frames().await.unwrap();

    assert_eq!(frames.len(), 3);
    let d1 = &frames[0];
    assert_eq!(d1.id, FrameId::new("d1"));
    assert_eq!(d1.serial_number.as_deref(), Some("d1"));
    assert_eq!(d1.battery_level, 42);
    assert_eq!(d1.group_id, Some(GroupId::new("g1")));
    assert_eq!(d1.status, FrameStatus::Online);
    assert!(d1.last_updated.is_some());
    assert_eq!(frames[1].battery_level, 100);
}

#[tokio::test]
async fn ungrouped_frames_are_filtered() {
    let server = start_test_server().await;
    let frames = signed_in(&server).list_ungrouped_frames().await.unwrap();
    let ids: Vec<&str> = frames.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["d2", "d3"]);
}

#[tokio::test]
async fn register_frame_round_trip() {
    let server = start_test_server().await;
    let client = signed_in(&server);
    let frame = client
        .register_frame(NewFrame {
            serial_number: "SN-0042".into(),
            name: Some("Kitchen".into()),
            group_id: Some(GroupId::new("g1")),
            battery_level: None,
        })
        .await
        .unwrap();

    assert_eq!(frame.id, FrameId::new("SN-0042"));
    assert_eq!(frame.name.as_deref(), Some("Kitchen"));
    assert_eq!(frame.battery_level, 100);
    assert_eq!(frame.group_id, Some(GroupId::new("g1")));
    assert_eq!(server.recorder.last_body(), Some(json!({"name": "Kitchen"})));

    let err = client
        .register_frame(NewFrame { serial_number: "taken".into(), ..Default::default() })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::CONFLICT));

    let err = client.register_frame(NewFrame::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn frame_assignment_and_removal() {
    let server = start_test_server().await;
    let client = signed_in(&server);
    client
        .add_frame_to_group(&FrameId::new("d2"), &GroupId::new("g1"))
        .await
        .unwrap();
    client.unregister_frame(&FrameId::new("d3")).await.unwrap();
    assert_eq!(
        server.recorder.calls(),
        vec!["POST /groups/g1/devices/d2", "DELETE /devices/d3"]
    );

    let err = client.unregister_frame(&FrameId::new("")).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

// =====================================================================
// User / albums
// =====================================================================

#[tokio::test]
async fn me_and_albums() {
    let server = start_test_server().await;
    let client = signed_in(&server);

    let me = client.me().await.unwrap();
    assert_eq!(me.user_id, UserId::new("u1"));
    assert_eq!(me.email.as_deref(), Some("ada@example.com"));

    let albums = client.list_albums().await.unwrap();
    assert_eq!(albums.len(), 2);
    assert_eq!(albums[0].source, AlbumSource::Google);
    assert_eq!(albums[0].photo_count, 120);
    assert_eq!(albums[1].source, AlbumSource::Apple);
}

// =====================================================================
// Authentication
// =====================================================================

#[tokio::test]
async fn missing_token_redirects_without_request() {
    let server = start_test_server().await;
    let identity = Arc::new(StaticIdentity::signed_out());
    let client = client_with(&server, identity.clone());

    let err = client.list_frames().await.unwrap_err();
    assert!(err.is_authentication());
    assert_eq!(identity.redirect_count(), 1);
    assert!(server.recorder.calls().is_empty());
}

#[tokio::test]
async fn unauthorized_response_redirects_once() {
    let server = start_test_server().await;
    let identity = Arc::new(StaticIdentity::new("expired-token"));
    let client = client_with(&server, identity.clone());

    let err = client.list_groups().await.unwrap_err();
    match &err {
        ApiError::Authentication(reason) => assert_eq!(reason, "session expired"),
        other => panic!("expected auth error, got {:?}", other),
    }
    assert_eq!(identity.redirect_count(), 1);
    // /me is never reached once /groups is rejected.
    assert_eq!(server.recorder.calls(), vec!["GET /groups"]);

    let err = client.delete_group(&GroupId::new("g1")).await.unwrap_err();
    assert!(err.is_authentication());
    assert_eq!(identity.redirect_count(), 2);
}

// =====================================================================
// Transport
// =====================================================================

#[tokio::test]
async fn slow_service_times_out() {
    async fn slow() -> Json<Value> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(json!([]))
    }
    let base_url = serve(Router::new().route("/devices", get(slow))).await;
    let client = ApiClient::new(
        ClientConfig::new(base_url).with_timeout(Duration::from_millis(100)),
        Arc::new(StaticIdentity::new(GOOD_TOKEN)),
    )
    .unwrap();

    let err = client.list_frames().await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout), "got {:?}", err);
}

#[tokio::test]
async fn unreachable_service_is_network_error() {
    // Bind then drop to get a port nothing is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(
        ClientConfig::new(format!("http://{}", addr)),
        Arc::new(StaticIdentity::new(GOOD_TOKEN)),
    )
    .unwrap();
    let err = client.list_frames().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    async fn garbage() -> &'static str {
        "not json"
    }
    let base_url = serve(Router::new().route("/albums", get(garbage))).await;
    let identity = Arc::new(StaticIdentity::new(GOOD_TOKEN));
    let client = ApiClient::new(ClientConfig::new(base_url), identity).unwrap();
    let err = client.list_albums().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {:?}", err);
}

#[test]
fn invalid_base_url_is_rejected() {
    let identity = Arc::new(StaticIdentity::new(GOOD_TOKEN));
    assert!(matches!(
        ApiClient::new(ClientConfig::new("not a url"), identity.clone()),
        Err(ApiError::Validation(_))
    ));
    assert!(matches!(
        ApiClient::new(ClientConfig::new("mailto:frames@example.com"), identity),
        Err(ApiError::Validation(_))
    ));
}

#[tokio::test]
async fn base_path_prefix_is_kept() {
    let recorder: Shared = Arc::new(Recorder::default());
    let app = Router::new()
        .nest("/api", Router::new().route("/me", get(me)))
        .with_state(recorder.clone());
    let base_url = serve(app).await;
    let client = ApiClient::new(
        ClientConfig::new(format!("{}/api/", base_url)),
        Arc::new(StaticIdentity::new(GOOD_TOKEN)),
    )
    .unwrap();
    assert_eq!(client.me().await.unwrap().user_id, UserId::new("u1"));
}
