//! FCM HTTP v1 client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use common::{AppError, AppResult};
use domain::FCM_API_BASE_URL;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// FCM's answer to a single send.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// 2xx with the response document
    Accepted(Value),
    /// Non-2xx with the error document
    Rejected { status: u16, body: Value },
}

/// Sends one message to one device.
///
/// `Err` means no FCM answer was obtained (transport failure or an
/// unreadable response).
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(
        &self,
        access_token: &str,
        device_token: &str,
        title: &str,
        body: &str,
    ) -> AppResult<SendOutcome>;
}

#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    notification: FcmNotification<'a>,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

/// reqwest-backed FCM client bound to one Firebase project.
pub struct FcmClient {
    http: Client,
    endpoint: String,
}

impl FcmClient {
    pub fn new(http: Client, project_id: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/projects/{}/messages:send", FCM_API_BASE_URL, project_id),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PushSender for FcmClient {
    async fn send(
        &self,
        access_token: &str,
        device_token: &str,
        title: &str,
        body: &str,
    ) -> AppResult<SendOutcome> {
        let payload = FcmRequest {
            message: FcmMessage {
                token: device_token,
                notification: FcmNotification { title, body },
            },
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::upstream(e.to_string()))?;

        let status = response.status();
        // FCM answers JSON on success and on failure
        let document: Value = response
            .json()
            .await
            .map_err(|e| AppError::upstream(e.to_string()))?;

        if status.is_success() {
            Ok(SendOutcome::Accepted(document))
        } else {
            Ok(SendOutcome::Rejected {
                status: status.as_u16(),
                body: document,
            })
        }
    }
}
