//! Integration tests for the HTTP surface.
//!
//! Every dependency is replaced by an in-memory fake, so no database or
//! network access is needed.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{AppError, AppResult};
use domain::{NotificationRecord, UserId};
use notification_service_lib::api::{create_router, AppState};
use notification_service_lib::clients::{AccessTokenProvider, PushSender, SendOutcome};
use notification_service_lib::infra::HealthProbe;
use notification_service_lib::repository::{DataStore, DeviceRepository};
use notification_service_lib::service::{
    FanOutManager, NotificationService, PushDispatcher, PushService,
};

// =============================================================================
// Fakes
// =============================================================================

/// Data store that serves fixed users and remembers every insert.
#[derive(Default)]
struct RecordingStore {
    users: Vec<&'static str>,
    read_error: Option<&'static str>,
    write_error: Option<&'static str>,
    inserted: Mutex<Vec<Vec<NotificationRecord>>>,
}

impl RecordingStore {
    fn with_users(users: &[&'static str]) -> Self {
        Self {
            users: users.to_vec(),
            ..Self::default()
        }
    }

    fn inserts(&self) -> Vec<Vec<NotificationRecord>> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataStore for RecordingStore {
    async fn list_user_ids(&self) -> AppResult<Vec<UserId>> {
        if let Some(msg) = self.read_error {
            return Err(AppError::store_read(msg));
        }
        Ok(self.users.iter().map(|id| UserId::from(*id)).collect())
    }

    async fn bulk_insert(&self, records: Vec<NotificationRecord>) -> AppResult<()> {
        if let Some(msg) = self.write_error {
            return Err(AppError::store_write(msg));
        }
        self.inserted.lock().unwrap().push(records);
        Ok(())
    }
}

struct StaticProbe(Result<(), String>);

#[async_trait]
impl HealthProbe for StaticProbe {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> Result<(), String> {
        self.0.clone()
    }
}

struct FixedDevices(Vec<Option<String>>);

#[async_trait]
impl DeviceRepository for FixedDevices {
    async fn tokens_for_user(&self, _user_id: &str) -> AppResult<Vec<Option<String>>> {
        Ok(self.0.clone())
    }
}

struct FixedAccessToken;

#[async_trait]
impl AccessTokenProvider for FixedAccessToken {
    async fn access_token(&self) -> AppResult<String> {
        Ok("ya29.test".to_string())
    }
}

/// Accepts every device except the ones ending in "bad".
struct SelectiveSender;

#[async_trait]
impl PushSender for SelectiveSender {
    async fn send(
        &self,
        _access_token: &str,
        device_token: &str,
        _title: &str,
        _body: &str,
    ) -> AppResult<SendOutcome> {
        if device_token.ends_with("bad") {
            Ok(SendOutcome::Rejected {
                status: 400,
                body: json!({ "error": { "status": "INVALID_ARGUMENT" } }),
            })
        } else {
            Ok(SendOutcome::Accepted(json!({ "name": "projects/demo/messages/1" })))
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn state_with(store: Arc<RecordingStore>) -> AppState {
    let notifications: Arc<dyn NotificationService> = Arc::new(FanOutManager::new(store));
    let probes: Vec<Arc<dyn HealthProbe>> = vec![Arc::new(StaticProbe(Ok(())))];
    AppState::new(notifications, None, probes)
}

fn push_service(devices: Vec<Option<String>>) -> Arc<dyn PushService> {
    Arc::new(PushDispatcher::new(
        Arc::new(FixedDevices(devices)),
        Arc::new(FixedAccessToken),
        Arc::new(SelectiveSender),
    ))
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn insert_webhook(user_id: Option<&str>) -> Value {
    json!({
        "type": "INSERT",
        "table": "notifications",
        "schema": "public",
        "record": {
            "id": "6f1c1c8e-7a51-4a8e-9d55-2a7c0f5b8e11",
            "user_id": user_id,
            "title": "Hi",
            "body": "Hello",
            "created_at": "2025-01-01T00:00:00Z",
            "is_read": false
        },
        "old_record": null
    })
}

// =============================================================================
// Broadcast
// =============================================================================

#[tokio::test]
async fn send_all_stores_one_record_per_user() {
    let store = Arc::new(RecordingStore::with_users(&["u1", "u2", "u3"]));
    let app = create_router(state_with(store.clone()));

    let (status, body) = call(
        app,
        json_request("/send_all", json!({ "title": "Hi", "body": "Hello" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "sent", "count": 3 }));

    let inserts = store.inserts();
    assert_eq!(inserts.len(), 1);
    let recipients: Vec<&str> = inserts[0].iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(recipients, vec!["u1", "u2", "u3"]);
    assert!(inserts[0].iter().all(|r| r.title == "Hi" && r.body == "Hello"));
}

#[tokio::test]
async fn send_all_with_no_users_reports_zero() {
    let store = Arc::new(RecordingStore::default());
    let app = create_router(state_with(store.clone()));

    let (status, body) = call(
        app,
        json_request("/send_all", json!({ "title": "Hi", "body": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "sent", "count": 0 }));
    assert!(store.inserts().is_empty());
}

#[tokio::test]
async fn send_all_rejects_empty_title() {
    let store = Arc::new(RecordingStore::with_users(&["u1"]));
    let app = create_router(state_with(store.clone()));

    let (status, body) = call(
        app,
        json_request("/send_all", json!({ "title": "", "body": "Hello" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Title cannot be empty");
    assert!(store.inserts().is_empty());
}

#[tokio::test]
async fn send_all_rejects_malformed_json() {
    let app = create_router(state_with(Arc::new(RecordingStore::default())));

    let request = Request::builder()
        .method("POST")
        .uri("/send_all")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\":"))
        .unwrap();
    let (status, body) = call(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn send_all_surfaces_read_failure_message() {
    let store = Arc::new(RecordingStore {
        read_error: Some("permission denied for table users"),
        ..RecordingStore::default()
    });
    let app = create_router(state_with(store));

    let (status, body) = call(
        app,
        json_request("/send_all", json!({ "title": "Hi", "body": "Hello" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "STORE_READ_ERROR");
    assert_eq!(body["error"]["message"], "permission denied for table users");
}

#[tokio::test]
async fn send_all_surfaces_write_failure_message() {
    let store = Arc::new(RecordingStore {
        users: vec!["u1"],
        write_error: Some("relation \"notifications\" does not exist"),
        ..RecordingStore::default()
    });
    let app = create_router(state_with(store));

    let (status, body) = call(
        app,
        json_request("/send_all", json!({ "title": "Hi", "body": "Hello" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "STORE_WRITE_ERROR");
    assert_eq!(
        body["error"]["message"],
        "relation \"notifications\" does not exist"
    );
}

// =============================================================================
// API key
// =============================================================================

#[tokio::test]
async fn api_key_is_required_when_configured() {
    let state = state_with(Arc::new(RecordingStore::default())).with_api_key(Some("secret"));
    let app = create_router(state);

    let (status, body) = call(
        app,
        json_request("/send_all", json!({ "title": "Hi", "body": "Hello" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn wrong_api_key_is_rejected() {
    let state = state_with(Arc::new(RecordingStore::default())).with_api_key(Some("secret"));
    let app = create_router(state);

    let mut request = json_request("/send_all", json!({ "title": "Hi", "body": "Hello" }));
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, "Bearer nope".parse().unwrap());
    let (status, _) = call(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn matching_api_key_is_accepted() {
    let store = Arc::new(RecordingStore::with_users(&["u1"]));
    let state = state_with(store).with_api_key(Some("secret"));
    let app = create_router(state);

    let mut request = json_request("/send_all", json!({ "title": "Hi", "body": "Hello" }));
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, "Bearer secret".parse().unwrap());
    let (status, body) = call(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn health_is_public_when_api_key_is_configured() {
    let state = state_with(Arc::new(RecordingStore::default())).with_api_key(Some("secret"));
    let app = create_router(state);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, _) = call(app, request).await;

    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Push webhook
// =============================================================================

#[tokio::test]
async fn push_webhook_without_credentials_is_a_configuration_error() {
    let app = create_router(state_with(Arc::new(RecordingStore::default())));

    let request = json_request("/webhooks/push", insert_webhook(Some("abc")));
    let (status, body) = call(app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    assert_eq!(
        body["error"]["message"],
        "Internal configuration error (FCM credentials)"
    );
}

#[tokio::test]
async fn push_webhook_skips_updates() {
    let mut state = state_with(Arc::new(RecordingStore::default()));
    state.push = Some(push_service(vec![Some("device-good".to_string())]));
    let app = create_router(state);

    let mut payload = insert_webhook(Some("abc"));
    payload["type"] = json!("UPDATE");
    let (status, body) = call(app, json_request("/webhooks/push", payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Skipped, not an INSERT operation or no record."
    );
}

#[tokio::test]
async fn push_webhook_requires_user_id() {
    let mut state = state_with(Arc::new(RecordingStore::default()));
    state.push = Some(push_service(vec![]));
    let app = create_router(state);

    let (status, body) = call(app, json_request("/webhooks/push", insert_webhook(None))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn push_webhook_reports_missing_devices() {
    let mut state = state_with(Arc::new(RecordingStore::default()));
    state.push = Some(push_service(vec![None, Some(String::new())]));
    let app = create_router(state);

    let request = json_request("/webhooks/push", insert_webhook(Some("abc")));
    let (status, body) = call(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No registered devices found for user abc.");
}

#[tokio::test]
async fn push_webhook_reports_each_device() {
    let mut state = state_with(Arc::new(RecordingStore::default()));
    state.push = Some(push_service(vec![
        Some("aaaaaaaaaa-device-good".to_string()),
        Some("bbbbbbbbbb-device-bad".to_string()),
    ]));
    let app = create_router(state);

    let request = json_request("/webhooks/push", insert_webhook(Some("abc")));
    let (status, body) = call(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["results"][0]["status"], "success");
    assert_eq!(body["results"][0]["token"], "...evice-good");
    assert_eq!(body["results"][1]["status"], "failed");
    assert_eq!(body["results"][1]["token"], "...device-bad");
    assert_eq!(
        body["results"][1]["error"]["error"]["status"],
        "INVALID_ARGUMENT"
    );
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_degraded_when_a_probe_fails() {
    let notifications: Arc<dyn NotificationService> =
        Arc::new(FanOutManager::new(Arc::new(RecordingStore::default())));
    let probes: Vec<Arc<dyn HealthProbe>> =
        vec![Arc::new(StaticProbe(Err("connection refused".to_string())))];
    let app = create_router(AppState::new(notifications, None, probes));

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = call(app, request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["database"]["error"], "connection refused");
    assert_eq!(body["push_enabled"], false);
}

#[tokio::test]
async fn openapi_document_lists_endpoints() {
    let app = create_router(state_with(Arc::new(RecordingStore::default())));

    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/send_all").is_some());
    assert!(body["paths"].get("/webhooks/push").is_some());
}
