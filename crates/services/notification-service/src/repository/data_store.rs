//! Data store capability: user enumeration and bulk notification insert.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Alias, Query};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Set, TransactionTrait};
use uuid::Uuid;

use super::entities::notification::{ActiveModel, Entity as NotificationEntity};
use common::{AppError, AppResult, DataStoreConfig};
use domain::{NotificationRecord, UserId};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Postgres caps one statement at `u16::MAX` bind parameters
const MAX_BIND_PARAMS: usize = u16::MAX as usize;

/// Bound columns per notification row
const NOTIFICATION_COLUMNS: usize = 6;

const ROWS_PER_STATEMENT: usize = MAX_BIND_PARAMS / NOTIFICATION_COLUMNS;

/// Data store trait for dependency injection.
///
/// Implementations report listing failures as `AppError::StoreRead` and
/// insert failures as `AppError::StoreWrite`, carrying the backend message.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Snapshot of every registered user id, in backend order
    async fn list_user_ids(&self) -> AppResult<Vec<UserId>>;

    /// Persist all records as one unit: either every record is written or
    /// an error is returned
    async fn bulk_insert(&self, records: Vec<NotificationRecord>) -> AppResult<()>;
}

/// Postgres-backed data store
pub struct PgDataStore {
    db: DatabaseConnection,
    users_schema: String,
    users_table: String,
}

impl PgDataStore {
    /// Create a store over an open connection and the configured users collection
    pub fn new(db: DatabaseConnection, config: &DataStoreConfig) -> Self {
        Self {
            db,
            users_schema: config.users_schema.clone(),
            users_table: config.users_table.clone(),
        }
    }
}

fn read_error(err: DbErr) -> AppError {
    AppError::store_read(err.to_string())
}

fn write_error(err: DbErr) -> AppError {
    AppError::store_write(err.to_string())
}

fn to_active_model(record: NotificationRecord, now: DateTime<Utc>) -> AppResult<ActiveModel> {
    let user_id = Uuid::parse_str(record.user_id.as_str()).map_err(|e| {
        AppError::store_write(format!("invalid user id '{}': {}", record.user_id, e))
    })?;

    Ok(ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        title: Set(record.title),
        body: Set(record.body),
        created_at: Set(now),
        is_read: Set(false),
    })
}

#[async_trait]
impl DataStore for PgDataStore {
    async fn list_user_ids(&self) -> AppResult<Vec<UserId>> {
        let query = Query::select()
            .column(Alias::new("id"))
            .from((
                Alias::new(self.users_schema.as_str()),
                Alias::new(self.users_table.as_str()),
            ))
            .to_owned();
        let statement = self.db.get_database_backend().build(&query);

        let rows = self.db.query_all(statement).await.map_err(read_error)?;

        rows.iter()
            .map(|row| {
                row.try_get::<Uuid>("", "id")
                    .map(UserId::from)
                    .map_err(read_error)
            })
            .collect()
    }

    async fn bulk_insert(&self, records: Vec<NotificationRecord>) -> AppResult<()> {
        let now = Utc::now();
        let models = records
            .into_iter()
            .map(|record| to_active_model(record, now))
            .collect::<AppResult<Vec<_>>>()?;

        if models.is_empty() {
            return Ok(());
        }

        // Large batches span several statements inside the same transaction
        let txn = self.db.begin().await.map_err(write_error)?;
        let mut inserted = 0;
        let mut pending = models;
        while !pending.is_empty() {
            let rest = pending.split_off(pending.len().min(ROWS_PER_STATEMENT));
            inserted += NotificationEntity::insert_many(pending)
                .exec_without_returning(&txn)
                .await
                .map_err(write_error)?;
            pending = rest;
        }
        txn.commit().await.map_err(write_error)?;

        tracing::debug!(inserted, "Notification batch committed");
        Ok(())
    }
}
