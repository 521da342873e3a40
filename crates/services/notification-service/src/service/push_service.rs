//! Push service - delivers a newly stored notification to the recipient's devices.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use common::{AppError, AppResult};
use domain::{mask_token, PushOutcome, PushResult, WebhookPayload};

use crate::clients::{AccessTokenProvider, PushSender, SendOutcome};
use crate::repository::DeviceRepository;

/// Push service trait for dependency injection.
#[async_trait]
pub trait PushService: Send + Sync {
    /// Handle one database webhook.
    ///
    /// Non-insert payloads are skipped. A failed device does not stop
    /// delivery to the remaining ones.
    async fn dispatch(&self, payload: WebhookPayload) -> AppResult<PushOutcome>;
}

/// Concrete implementation of PushService over FCM.
pub struct PushDispatcher {
    devices: Arc<dyn DeviceRepository>,
    tokens: Arc<dyn AccessTokenProvider>,
    sender: Arc<dyn PushSender>,
}

impl PushDispatcher {
    pub fn new(
        devices: Arc<dyn DeviceRepository>,
        tokens: Arc<dyn AccessTokenProvider>,
        sender: Arc<dyn PushSender>,
    ) -> Self {
        Self {
            devices,
            tokens,
            sender,
        }
    }
}

#[async_trait]
impl PushService for PushDispatcher {
    async fn dispatch(&self, payload: WebhookPayload) -> AppResult<PushOutcome> {
        let Some(record) = payload.inserted_record() else {
            info!(
                event = ?payload.event_type,
                table = %payload.table,
                "Webhook is not a notification insert; skipping"
            );
            return Ok(PushOutcome::Skipped);
        };

        let user_id = record.recipient().ok_or_else(|| {
            error!("Notification record is missing the 'user_id'");
            AppError::validation("Notification record missing user_id")
        })?;

        let tokens: Vec<String> = self
            .devices
            .tokens_for_user(user_id)
            .await?
            .into_iter()
            .flatten()
            .filter(|token| !token.is_empty())
            .collect();

        if tokens.is_empty() {
            info!(user_id, "No valid device tokens registered");
            return Ok(PushOutcome::NoDevices {
                user_id: user_id.to_string(),
            });
        }

        info!(user_id, devices = tokens.len(), "Sending push notification");
        let access_token = self.tokens.access_token().await?;

        let mut results = Vec::with_capacity(tokens.len());
        for token in &tokens {
            let masked = mask_token(token);
            let result = match self
                .sender
                .send(&access_token, token, &record.title, &record.body)
                .await
            {
                Ok(SendOutcome::Accepted(response)) => {
                    info!(token = %masked, "FCM send succeeded");
                    PushResult::success(token, response)
                }
                Ok(SendOutcome::Rejected { status, body }) => {
                    warn!(token = %masked, status, "FCM send failed: {}", body);
                    PushResult::failed(token, body)
                }
                Err(e) => {
                    let message = match e {
                        AppError::Upstream(msg) => msg,
                        other => other.to_string(),
                    };
                    error!(token = %masked, "FCM request error: {}", message);
                    PushResult::error(token, message)
                }
            };
            results.push(result);
        }

        Ok(PushOutcome::Delivered { results })
    }
}
