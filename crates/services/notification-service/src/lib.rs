//! Notification Service Library
//!
//! Broadcast fan-out of notification records to every registered user, and
//! FCM push delivery driven by database webhooks. The HTTP surface lives in
//! [`api`]; the binary in `main.rs` adds serve/migrate/send commands.

pub mod api;
pub mod clients;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use common::{AppError, HttpClientConfig};
use domain::{NotificationRequest, SendReceipt};

use crate::api::{create_router, AppState};
use crate::clients::{FcmClient, ServiceAccountTokenProvider};
use crate::config::NotificationServiceConfig;
use crate::infra::{Database, HealthProbe};
use crate::repository::{DeviceStore, PgDataStore};
use crate::service::{FanOutManager, NotificationService, PushDispatcher, PushService};

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run the HTTP server with configuration from the environment.
///
/// `host` and `port` override the configured listen address when given.
pub async fn run_embedded(
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = NotificationServiceConfig::from_env();
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    run_server_with_config(config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = NotificationServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.data_store).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Run one fan-out against the configured data store (for CLI commands).
///
/// An empty title is rejected before any connection is made.
pub async fn send_once(
    request: NotificationRequest,
) -> Result<SendReceipt, Box<dyn std::error::Error>> {
    if request.title.is_empty() {
        return Err(AppError::validation("Title cannot be empty").into());
    }

    let config = NotificationServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.data_store).await?;

    let service = FanOutManager::new(Arc::new(PgDataStore::new(
        db.get_connection(),
        &config.data_store,
    )));

    Ok(service.send_to_all(request).await?)
}

/// Build the outbound HTTP client shared by FCM and OAuth calls.
pub fn build_http_client(config: &HttpClientConfig) -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .build()
}

/// Wire push delivery, or `None` when FCM credentials are missing or unusable.
fn build_push_service(
    config: &NotificationServiceConfig,
    db: DatabaseConnection,
    http: Client,
) -> Option<Arc<dyn PushService>> {
    let key = match config.service_account() {
        None => {
            warn!("FCM_SERVICE_ACCOUNT_JSON not set; push webhook disabled");
            return None;
        }
        Some(Err(e)) => {
            warn!("Push webhook disabled: {}", e);
            return None;
        }
        Some(Ok(key)) => key,
    };

    info!(project_id = key.project_id(), "Parsed service account credentials");
    let sender = Arc::new(FcmClient::new(http.clone(), key.project_id()));
    match ServiceAccountTokenProvider::new(key, http) {
        Ok(tokens) => Some(Arc::new(PushDispatcher::new(
            Arc::new(DeviceStore::new(db)),
            Arc::new(tokens),
            sender,
        ))),
        Err(e) => {
            warn!("Push webhook disabled: {}", e);
            None
        }
    }
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    config: NotificationServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize database
    let db = Database::connect(&config.data_store).await?;
    let db_conn = db.get_connection();

    // Create data store and services
    let store = Arc::new(PgDataStore::new(db_conn.clone(), &config.data_store));
    let notifications: Arc<dyn NotificationService> = Arc::new(FanOutManager::new(store));

    let http = build_http_client(&config.http_client)?;
    let push = build_push_service(&config, db_conn, http);

    // Create app state
    let probes: Vec<Arc<dyn HealthProbe>> = vec![Arc::new(db)];
    let state = AppState::new(notifications, push, probes)
        .with_api_key(config.api_key());
    if state.api_key.is_none() {
        warn!("NOTIFICATION_API_KEY not set; write endpoints are unauthenticated");
    }

    // Build router
    let app = create_router(state);

    // Build address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(service = %config.server.service_name, "Listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
