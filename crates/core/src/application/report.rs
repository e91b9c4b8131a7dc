// Report Use Case - validate, compute window, fetch

use crate::domain::{DispensationRow, ReportParams, REPORT_COLUMNS};
use crate::error::Result;
use crate::port::{DispensationRepository, TimeProvider};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a single report run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// Inclusive lower bound applied to `created_at`
    pub cutoff: DateTime<Utc>,
    pub params: ReportParams,
    pub rows: Vec<DispensationRow>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Runs the dispensation report against a repository
pub struct ReportService {
    repo: Arc<dyn DispensationRepository>,
    time_provider: Arc<dyn TimeProvider>,
}

impl ReportService {
    pub fn new(repo: Arc<dyn DispensationRepository>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            repo,
            time_provider,
        }
    }

    /// Execute the report once.
    ///
    /// Store errors are returned as-is; there is no retry here.
    pub async fn run(&self, params: &ReportParams) -> Result<Report> {
        let generated_at = self.time_provider.now();
        let cutoff = params.cutoff(generated_at);

        debug!(
            lookback_days = params.lookback_days(),
            job_status = %params.job_status(),
            cutoff = %cutoff,
            "Fetching dispensation report"
        );

        let rows = self.repo.fetch_report(cutoff, params.job_status()).await?;

        info!(
            rows = rows.len(),
            columns = REPORT_COLUMNS.len(),
            "Dispensation report fetched"
        );

        Ok(Report {
            generated_at,
            cutoff,
            params: params.clone(),
            rows,
        })
    }
}
