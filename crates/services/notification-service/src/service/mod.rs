//! Service layer - notification use cases.

mod notification_service;
mod push_service;

pub use notification_service::{FanOutManager, NotificationService};
pub use push_service::{PushDispatcher, PushService};
