//! Push device lookup.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use super::entities::user_device::{self, Entity as UserDeviceEntity};
use common::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Device repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// FCM tokens registered for a user. May contain empty or missing
    /// tokens; callers filter.
    async fn tokens_for_user(&self, user_id: &str) -> AppResult<Vec<Option<String>>>;
}

/// Postgres-backed device repository
pub struct DeviceStore {
    db: DatabaseConnection,
}

impl DeviceStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DeviceRepository for DeviceStore {
    async fn tokens_for_user(&self, user_id: &str) -> AppResult<Vec<Option<String>>> {
        let user_id = Uuid::parse_str(user_id)
            .map_err(|_| AppError::validation(format!("Invalid user_id: {}", user_id)))?;

        UserDeviceEntity::find()
            .select_only()
            .column(user_device::Column::FcmToken)
            .filter(user_device::Column::UserId.eq(user_id))
            .into_tuple::<Option<String>>()
            .all(&self.db)
            .await
            .map_err(|e| AppError::store_read(format!("Database error: {}", e)))
    }
}
