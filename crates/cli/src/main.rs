//! Dispensation CLI - run the flag dispensation report once and print it

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

use dispensation_core::application::{
    Notification, NotificationRouter, ReportFormatter, ReportService, RoutingSettings,
};
use dispensation_core::config::AppConfig;
use dispensation_core::domain::{FormattedRow, ReportParams};
use dispensation_core::port::time_provider::SystemTimeProvider;
use dispensation_core::AppError;
use dispensation_infra_sqlite::{
    create_pool, ensure_database_dir, run_migrations, SqliteDispensationRepository,
};

#[derive(Parser)]
#[command(name = "dispensation")]
#[command(about = "Flag extension / dispensation approval report", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (TOML)
    #[arg(long, env = "DISPENSATION_CONFIG")]
    config: Option<String>,

    /// Database URL or path (overrides config)
    #[arg(long, env = "DISPENSATION_DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the report once
    Report {
        /// Lookback window in days (fractions allowed)
        #[arg(short, long)]
        lookback_days: Option<f64>,

        /// Job status label to match exactly (e.g. for_approval)
        #[arg(short, long)]
        job_status: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Print per-vessel notification plans instead of raw rows
        #[arg(long)]
        routing: bool,
    },

    /// Create the report tables in a local database
    Migrate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled)]
struct ReportTableRow {
    vessel_email: String,
    vessel_id: i64,
    vessel: String,
    job_id: i64,
    importance: String,
    title: String,
    dispensation_type: String,
    department: String,
    due_date: String,
    requested_on: String,
    created_at: String,
    status: String,
}

impl From<&FormattedRow> for ReportTableRow {
    fn from(row: &FormattedRow) -> Self {
        Self {
            vessel_email: row.vessel_email.clone().unwrap_or_default(),
            vessel_id: row.vessel_id,
            vessel: row.vessel.clone(),
            job_id: row.job_id,
            importance: row.importance.clone(),
            title: row.title.clone(),
            dispensation_type: row.dispensation_type.clone(),
            department: row.department.clone(),
            due_date: row.due_date.clone(),
            requested_on: row.requested_on.clone(),
            created_at: row.created_at.clone(),
            status: row.status.clone(),
        }
    }
}

/// Columns recipients see, in notification order
#[derive(Tabled)]
struct NotificationTableRow {
    title: String,
    dispensation_type: String,
    department: String,
    requested_on: String,
    due_date: String,
    created_at: String,
}

impl From<&FormattedRow> for NotificationTableRow {
    fn from(row: &FormattedRow) -> Self {
        Self {
            title: row.title.clone(),
            dispensation_type: row.dispensation_type.clone(),
            department: row.department.clone(),
            requested_on: row.requested_on.clone(),
            due_date: row.due_date.clone(),
            created_at: row.created_at.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dispensation=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    match cli.command {
        Commands::Report {
            lookback_days,
            job_status,
            format,
            routing,
        } => {
            // Validate before touching the database
            let params = ReportParams::new(
                lookback_days.unwrap_or(config.lookback_days),
                job_status.unwrap_or_else(|| config.job_status.clone()),
            )
            .map_err(AppError::from)
            .context("Invalid report parameters")?;
            let timezone = config
                .display_timezone()
                .context("Invalid display timezone")?;

            let pool = create_pool(&config.database_path())
                .await
                .context("Failed to open database")?;
            let service = ReportService::new(
                Arc::new(SqliteDispensationRepository::new(pool.clone())),
                Arc::new(SystemTimeProvider),
            );

            let report = service.run(&params).await.context("Report query failed")?;
            pool.close().await;

            let rows = ReportFormatter::new(timezone).format(&report);

            if routing {
                let notifications =
                    NotificationRouter::new(RoutingSettings::from(&config)).route(&rows);
                print_notifications(&notifications, format)?;
            } else {
                print_rows(&params, &rows, format)?;
            }
        }

        Commands::Migrate => {
            ensure_database_dir(&config.database_path())
                .context("Failed to create database directory")?;
            let pool = create_pool(&config.database_path())
                .await
                .context("Failed to open database")?;
            run_migrations(&pool).await.context("Migration failed")?;
            pool.close().await;

            println!("{}", "✓ Report schema is up to date".green().bold());
        }
    }

    Ok(())
}

fn print_rows(params: &ReportParams, rows: &[FormattedRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        }
        OutputFormat::Table => {
            println!(
                "{}",
                format!(
                    "Flag dispensations ({} = {}, last {} day(s))",
                    "status".bold(),
                    params.job_status(),
                    params.lookback_days()
                )
                .cyan()
            );
            println!();

            if rows.is_empty() {
                println!("{}", "No matching jobs".yellow());
            } else {
                let table_rows: Vec<ReportTableRow> = rows.iter().map(Into::into).collect();
                println!("{}", Table::new(table_rows));
                println!();
                println!("{} {}", "Rows:".bold(), rows.len());
            }
        }
    }
    Ok(())
}

fn print_notifications(notifications: &[Notification], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(notifications)?);
        }
        OutputFormat::Table => {
            if notifications.is_empty() {
                println!("{}", "No notifications".yellow());
            }

            for notification in notifications {
                println!("{}", notification.subject.cyan().bold());
                println!("  {} {}", "To:".bold(), notification.recipients.join(", "));
                println!("  {} {}", "CC:".bold(), notification.cc_recipients.join(", "));
                println!("  {} {}", "Company:".bold(), notification.company_name);

                let table_rows: Vec<NotificationTableRow> =
                    notification.rows.iter().map(Into::into).collect();
                println!("{}", Table::new(table_rows));

                for row in &notification.rows {
                    if let Some(url) = &row.url {
                        println!("  {} {}", "•".bold(), url);
                    }
                }
                println!();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report_args() {
        let cli = Cli::try_parse_from([
            "dispensation",
            "--database-url",
            "sqlite::memory:",
            "report",
            "--lookback-days",
            "2.5",
            "--job-status",
            "approved",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        match cli.command {
            Commands::Report {
                lookback_days,
                job_status,
                format,
                routing,
            } => {
                assert_eq!(lookback_days, Some(2.5));
                assert_eq!(job_status.as_deref(), Some("approved"));
                assert_eq!(format, OutputFormat::Json);
                assert!(!routing);
            }
            Commands::Migrate => panic!("expected report"),
        }
    }
}
