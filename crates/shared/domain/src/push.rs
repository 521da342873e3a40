//! Push delivery types: database webhook payloads, per-device results and
//! the service account key used to authorise FCM calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{GOOGLE_TOKEN_URI, TOKEN_VISIBLE_SUFFIX};
use crate::error::{DomainError, DomainResult};

/// Row change reported by a database webhook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum WebhookEventType {
    Insert,
    Update,
    Delete,
}

/// Row of the notifications table as delivered by the webhook.
///
/// Every column is lenient so a partial row still reaches the dispatcher,
/// which decides what is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StoredNotification {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_read: bool,
}

impl StoredNotification {
    /// Recipient id, if present and non-empty
    pub fn recipient(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Database webhook envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub event_type: WebhookEventType,
    pub table: String,
    pub schema: String,
    pub record: Option<StoredNotification>,
    #[serde(default)]
    pub old_record: Option<StoredNotification>,
}

impl WebhookPayload {
    /// Newly inserted row, if this payload announces one
    pub fn inserted_record(&self) -> Option<&StoredNotification> {
        match self.event_type {
            WebhookEventType::Insert => self.record.as_ref(),
            _ => None,
        }
    }
}

/// Delivery status for a single device token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum PushStatus {
    /// FCM accepted the message
    Success,
    /// FCM answered with a non-success status
    Failed,
    /// The request never produced an FCM answer
    Error,
}

/// Per-token delivery record (token is always masked)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PushResult {
    pub token: String,
    pub status: PushStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub response: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub error: Option<serde_json::Value>,
}

impl PushResult {
    pub fn success(token: &str, response: serde_json::Value) -> Self {
        Self {
            token: mask_token(token),
            status: PushStatus::Success,
            response: Some(response),
            error: None,
        }
    }

    pub fn failed(token: &str, error: serde_json::Value) -> Self {
        Self {
            token: mask_token(token),
            status: PushStatus::Failed,
            response: None,
            error: Some(error),
        }
    }

    pub fn error(token: &str, message: impl Into<String>) -> Self {
        Self {
            token: mask_token(token),
            status: PushStatus::Error,
            response: None,
            error: Some(serde_json::Value::String(message.into())),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PushStatus::Success
    }
}

/// What a push dispatch ended up doing
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// Payload was not a new notification row
    Skipped,
    /// Recipient has no usable device tokens
    NoDevices { user_id: String },
    /// One result per token, in token order
    Delivered { results: Vec<PushResult> },
}

impl PushOutcome {
    /// True when every attempted delivery succeeded
    pub fn all_succeeded(&self) -> bool {
        match self {
            PushOutcome::Delivered { results } => results.iter().all(PushResult::is_success),
            _ => true,
        }
    }
}

/// Render a device token with everything but its tail hidden.
pub fn mask_token(token: &str) -> String {
    let total = token.chars().count();
    let tail: String = token
        .chars()
        .skip(total.saturating_sub(TOKEN_VISIBLE_SUFFIX))
        .collect();
    format!("...{}", tail)
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

/// Google service account key (the JSON file issued by the Firebase console)
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub project_id: Option<String>,
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Parse a key from its JSON text. A project id is mandatory.
    pub fn from_json(json: &str) -> DomainResult<Self> {
        let key: ServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| {
                DomainError::invalid_credentials(format!("FCM credential parsing: {}", e))
            })?;

        if key.project_id.as_deref().map_or(true, str::is_empty) {
            return Err(DomainError::invalid_credentials(
                "project_id not found in service account credentials",
            ));
        }

        Ok(key)
    }

    /// Project id (guaranteed present after `from_json`)
    pub fn project_id(&self) -> &str {
        self.project_id.as_deref().unwrap_or_default()
    }
}
