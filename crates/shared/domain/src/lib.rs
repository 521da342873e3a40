//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod constants;
pub mod error;
pub mod notification;
pub mod push;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use notification::{
    DeliveryStatus, NotificationRecord, NotificationRequest, SendReceipt, UserId,
};
pub use push::{
    mask_token, PushOutcome, PushResult, PushStatus, ServiceAccountKey, StoredNotification,
    WebhookEventType, WebhookPayload,
};
