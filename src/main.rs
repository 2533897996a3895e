//! Zip Drive booking engine entrypoint
//!
//! Boots the REST API and the OTP dispatch sweep. Reads configuration
//! from a TOML file (./zipdrive.toml, or the path in `ZIPDRIVE_CONFIG`).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use zipdrive_booking::application::{BookingService, OtpDispatcher, OtpService, PaymentService};
use zipdrive_booking::config::{default_config_path, AppConfig};
use zipdrive_booking::domain::notifier::Notifier;
use zipdrive_booking::domain::repositories::RepositoryProvider;
use zipdrive_booking::infrastructure::database::migrator::Migrator;
use zipdrive_booking::infrastructure::database::repositories::SeaOrmDirectory;
use zipdrive_booking::infrastructure::email::{LogNotifier, SmtpNotifier};
use zipdrive_booking::infrastructure::gateway::HmacPaymentGateway;
use zipdrive_booking::shared::ShutdownSignal;
use zipdrive_booking::{create_api_router, init_database, DatabaseConfig, SeaOrmRepositoryProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("ZIPDRIVE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Zip Drive booking engine...");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: config.database.url.clone(),
    };
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Collaborators ──────────────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let directory = Arc::new(SeaOrmDirectory::new(db.clone()));
    let notifier: Arc<dyn Notifier> = if config.email.enabled {
        info!("SMTP notifier enabled ({})", config.email.smtp_host);
        Arc::new(SmtpNotifier::new(config.email.clone())?)
    } else {
        info!("Email disabled, notifications will be logged");
        Arc::new(LogNotifier)
    };
    let gateway = Arc::new(HmacPaymentGateway::new(config.payment_gateway.clone()));

    // ── Services ───────────────────────────────────────────────
    let booking_service = Arc::new(BookingService::new(
        repos.clone(),
        directory.clone(),
        notifier.clone(),
        config.pricing.gst_rate,
    ));
    let otp_service = Arc::new(OtpService::new(
        repos.clone(),
        directory.clone(),
        notifier.clone(),
    ));
    let payment_service = Arc::new(PaymentService::new(repos.clone(), gateway));

    // ── Shutdown & background tasks ────────────────────────────
    let shutdown = ShutdownSignal::new();
    shutdown.listen_for_os_signals();

    let dispatcher = Arc::new(OtpDispatcher::new(
        repos,
        otp_service.clone(),
        directory,
        notifier,
        config.scheduler.interval_secs,
        config.scheduler.lead_window_mins,
    ));
    dispatcher.start(shutdown.clone());

    // ── REST API ───────────────────────────────────────────────
    let router = create_api_router(booking_service, otp_service, payment_service, db.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    let server_shutdown = shutdown.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            server_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await?;

    info!("Closing database connection...");
    db.close().await?;
    info!("Shutdown complete");
    Ok(())
}
