//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api::handlers::health_handler::{HealthResponse, ServiceHealth};
use crate::api::handlers::notification_handler::SendNotificationRequest;
use crate::api::handlers::webhook_handler::{MessageResponse, PushDispatchResponse};
use domain::{
    DeliveryStatus, PushResult, PushStatus, SendReceipt, StoredNotification, WebhookEventType,
    WebhookPayload,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::notification_handler::send_all,
        crate::api::handlers::webhook_handler::push_webhook,
        crate::api::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            SendNotificationRequest,
            SendReceipt,
            DeliveryStatus,
            WebhookPayload,
            WebhookEventType,
            StoredNotification,
            PushResult,
            PushStatus,
            PushDispatchResponse,
            MessageResponse,
            HealthResponse,
            ServiceHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Notifications", description = "Broadcast fan-out"),
        (name = "Webhooks", description = "Database webhooks driving push delivery"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("API key")
                        .build(),
                ),
            );
        }
    }
}
