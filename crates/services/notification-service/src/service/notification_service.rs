//! Notification service - broadcast fan-out to every registered user.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use common::AppResult;
use domain::{NotificationRecord, NotificationRequest, SendReceipt};

use crate::repository::DataStore;

/// Notification service trait for dependency injection.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Deliver one notification record to every user currently listed by
    /// the data store and report how many were submitted.
    ///
    /// Performs exactly one listing and, when at least one user exists,
    /// exactly one bulk insert. Store failures are returned as
    /// `StoreRead`/`StoreWrite` with the backend message unchanged; nothing
    /// is retried.
    async fn send_to_all(&self, request: NotificationRequest) -> AppResult<SendReceipt>;
}

/// Concrete implementation of NotificationService over a data store.
pub struct FanOutManager {
    store: Arc<dyn DataStore>,
}

impl FanOutManager {
    /// Create new fan-out service instance with data store
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationService for FanOutManager {
    async fn send_to_all(&self, request: NotificationRequest) -> AppResult<SendReceipt> {
        let user_ids = self.store.list_user_ids().await.map_err(|e| {
            warn!("Listing users failed: {}", e);
            e.into_store_read()
        })?;

        let records: Vec<NotificationRecord> = user_ids
            .into_iter()
            .map(|user_id| request.record_for(user_id))
            .collect();
        let count = records.len() as u64;

        if records.is_empty() {
            info!("No registered users; nothing to insert");
            return Ok(SendReceipt::sent(0));
        }

        self.store.bulk_insert(records).await.map_err(|e| {
            warn!(count, "Bulk insert of notifications failed: {}", e);
            e.into_store_write()
        })?;

        info!(count, "Notification fanned out to all users");
        Ok(SendReceipt::sent(count))
    }
}
