//! Flag Dispensation Report - Daemon Entry Point
//! Runs the report on a fixed cadence until Ctrl+C

mod sink;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dispensation_core::application::{
    shutdown_channel, NotificationRouter, ReportFormatter, ReportScheduler, ReportService,
    RoutingSettings,
};
use dispensation_core::config::AppConfig;
use dispensation_core::port::time_provider::SystemTimeProvider;
use dispensation_infra_sqlite::{
    create_pool, ensure_database_dir, run_migrations, schema_ready, SqliteDispensationRepository,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    init_logging()?;

    info!("Dispensation report daemon v{} starting...", VERSION);

    // 2. Load configuration
    let config = AppConfig::load(None).context("Failed to load configuration")?;
    let params = config
        .report_params()
        .context("Invalid report parameters")?;
    let timezone = config
        .display_timezone()
        .context("Invalid display timezone")?;

    let db_path = config.database_path();
    info!(db_path = %db_path, "Connecting to database...");

    // 3. Initialize database
    ensure_database_dir(&db_path).context("DB directory creation failed")?;
    let pool = create_pool(&db_path)
        .await
        .context("DB pool creation failed")?;
    if config.run_migrations {
        run_migrations(&pool).await.context("Migration failed")?;
    } else if !schema_ready(&pool).await.context("Schema check failed")? {
        warn!(
            db_path = %db_path,
            "Report tables not found; every run will fail. Set DISPENSATION_RUN_MIGRATIONS=true or run `dispensation migrate`"
        );
    }

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let repo = Arc::new(SqliteDispensationRepository::new(pool.clone()));
    let service = Arc::new(ReportService::new(repo, time_provider));

    let scheduler = ReportScheduler::new(
        service,
        ReportFormatter::new(timezone),
        NotificationRouter::new(RoutingSettings::from(&config)),
        Arc::new(sink::LogSink),
        params,
        Duration::from_secs(config.interval_secs),
    );

    // 5. Start scheduler
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx));

    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    shutdown_tx.shutdown();
    let _ = tokio::time::timeout(Duration::from_secs(5), scheduler_handle).await;
    pool.close().await;

    info!("Shutdown complete.");

    Ok(())
}

/// JSON logs when `DISPENSATION_LOG_FORMAT=json`, pretty otherwise
fn init_logging() -> Result<()> {
    let log_format =
        std::env::var("DISPENSATION_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("dispensation=info"))
        .context("Failed to create env filter")?;

    match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .init(),
    }

    Ok(())
}
