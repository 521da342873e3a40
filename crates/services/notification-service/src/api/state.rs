//! Application state for dependency injection.

use std::sync::Arc;

use crate::infra::HealthProbe;
use crate::service::{NotificationService, PushService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast fan-out
    pub notifications: Arc<dyn NotificationService>,
    /// Push delivery; `None` when FCM credentials are not configured
    pub push: Option<Arc<dyn PushService>>,
    /// Dependencies reported by `/health`
    pub probes: Vec<Arc<dyn HealthProbe>>,
    /// Bearer key guarding write endpoints
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        notifications: Arc<dyn NotificationService>,
        push: Option<Arc<dyn PushService>>,
        probes: Vec<Arc<dyn HealthProbe>>,
    ) -> Self {
        Self {
            notifications,
            push,
            probes,
            api_key: None,
        }
    }

    /// Require this bearer key on write endpoints.
    pub fn with_api_key(mut self, key: Option<&str>) -> Self {
        self.api_key = key.map(Arc::from);
        self
    }
}
