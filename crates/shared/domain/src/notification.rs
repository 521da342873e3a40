//! Broadcast notification entities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::STATUS_SENT;

/// Opaque identifier of a registered user, as returned by the data store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Message to deliver to every registered user.
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Build the record addressed to a single recipient.
    ///
    /// Title and body are copied verbatim.
    pub fn record_for(&self, user_id: UserId) -> NotificationRecord {
        NotificationRecord {
            user_id,
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }
}

/// One notification row handed to the data store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub user_id: UserId,
    pub title: String,
    pub body: String,
}

/// Outcome status of a fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum DeliveryStatus {
    Sent,
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryStatus::Sent => f.write_str(STATUS_SENT),
        }
    }
}

/// Aggregate result of a successful fan-out (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendReceipt {
    /// Always "sent"
    #[cfg_attr(feature = "openapi", schema(example = "sent"))]
    pub status: DeliveryStatus,
    /// Number of notification records submitted
    #[cfg_attr(feature = "openapi", schema(example = 3))]
    pub count: u64,
}

impl SendReceipt {
    pub fn sent(count: u64) -> Self {
        Self {
            status: DeliveryStatus::Sent,
            count,
        }
    }
}
