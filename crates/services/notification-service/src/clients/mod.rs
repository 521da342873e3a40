//! Outbound HTTP clients for push delivery.

mod fcm_client;
mod google_auth;

pub use fcm_client::{FcmClient, PushSender, SendOutcome};
pub use google_auth::{AccessTokenProvider, ServiceAccountTokenProvider};

#[cfg(any(test, feature = "test-utils"))]
pub use fcm_client::MockPushSender;
#[cfg(any(test, feature = "test-utils"))]
pub use google_auth::MockAccessTokenProvider;
