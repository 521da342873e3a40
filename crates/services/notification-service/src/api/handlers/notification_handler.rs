//! Broadcast notification handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{NotificationRequest, SendReceipt};

use crate::api::extractors::ValidatedJson;
use crate::api::state::AppState;

/// Broadcast request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendNotificationRequest {
    /// Notification title
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    #[schema(example = "Hi")]
    pub title: String,
    /// Notification body (may be empty)
    #[schema(example = "Hello")]
    pub body: String,
}

impl From<SendNotificationRequest> for NotificationRequest {
    fn from(req: SendNotificationRequest) -> Self {
        NotificationRequest::new(req.title, req.body)
    }
}

/// Create broadcast routes
pub fn notification_routes() -> Router<AppState> {
    Router::new().route("/send_all", post(send_all))
}

/// Send a notification to every registered user
#[utoipa::path(
    post,
    path = "/send_all",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    request_body = SendNotificationRequest,
    responses(
        (status = 200, description = "One notification stored per user", body = SendReceipt),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or wrong API key"),
        (status = 500, description = "Data store read or write failed")
    )
)]
pub async fn send_all(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SendNotificationRequest>,
) -> AppResult<Json<SendReceipt>> {
    let receipt = state.notifications.send_to_all(payload.into()).await?;
    Ok(Json(receipt))
}
