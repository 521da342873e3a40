//! HTTP request handlers.

pub mod health_handler;
pub mod notification_handler;
pub mod webhook_handler;

pub use health_handler::health_routes;
pub use notification_handler::notification_routes;
pub use webhook_handler::webhook_routes;
