//! Database webhook handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use common::{AppError, AppResult};
use domain::{PushOutcome, PushResult, WebhookPayload};

use crate::api::state::AppState;

/// Informational answer when nothing was sent
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Per-device delivery report
#[derive(Debug, Serialize, ToSchema)]
pub struct PushDispatchResponse {
    /// True when every device accepted the message
    pub success: bool,
    pub results: Vec<PushResult>,
}

/// Create webhook routes
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/push", post(push_webhook))
}

/// Push a newly inserted notification to the recipient's devices
#[utoipa::path(
    post,
    path = "/webhooks/push",
    tag = "Webhooks",
    security(("bearer_auth" = [])),
    request_body = WebhookPayload,
    responses(
        (
            status = 200,
            description = "Delivery report, or why nothing was sent",
            body = PushDispatchResponse
        ),
        (status = 400, description = "Record missing user_id or malformed payload"),
        (status = 401, description = "Missing or wrong API key"),
        (status = 500, description = "FCM credentials missing or device lookup failed"),
        (status = 502, description = "Google OAuth token exchange failed")
    )
)]
pub async fn push_webhook(
    State(state): State<AppState>,
    payload: Result<Json<WebhookPayload>, JsonRejection>,
) -> AppResult<Response> {
    let push = state
        .push
        .as_ref()
        .ok_or_else(|| AppError::configuration("FCM credentials"))?;

    let Json(payload) = payload.map_err(|e| AppError::validation(e.body_text()))?;

    let outcome = push.dispatch(payload).await?;
    let success = outcome.all_succeeded();

    let response = match outcome {
        PushOutcome::Skipped => Json(MessageResponse {
            message: "Skipped, not an INSERT operation or no record.".to_string(),
        })
        .into_response(),
        PushOutcome::NoDevices { user_id } => Json(MessageResponse {
            message: format!("No registered devices found for user {}.", user_id),
        })
        .into_response(),
        PushOutcome::Delivered { results } => {
            Json(PushDispatchResponse { success, results }).into_response()
        }
    };

    Ok(response)
}
