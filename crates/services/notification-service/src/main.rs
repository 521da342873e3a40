//! Notification Service - HTTP server for broadcast and push notifications.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use domain::NotificationRequest;
use notification_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "notification-service")]
#[command(about = "Notification fan-out and push delivery microservice")]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Overrides NOTIFICATION_SERVICE_HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides NOTIFICATION_SERVICE_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Send one notification to every user and print the receipt
    Send {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            notification_service_lib::run_embedded(host, port).await?;
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            notification_service_lib::run_migrations(migrate_action).await?;
        }
        Commands::Send { title, body } => {
            let receipt =
                notification_service_lib::send_once(NotificationRequest::new(title, body)).await?;
            println!("{}", serde_json::to_string(&receipt)?);
        }
    }

    Ok(())
}
