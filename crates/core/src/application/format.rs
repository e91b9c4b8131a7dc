// Display formatting for report rows

use crate::application::report::Report;
use crate::domain::{DispensationRow, FormattedRow};
use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::info;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders raw rows for humans: local creation time, plain dates, no nulls
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    timezone: Tz,
}

impl ReportFormatter {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Format every row still inside the report window.
    ///
    /// Rows older than `report.cutoff` are dropped; the store already filters
    /// them, so this only matters for repositories that do not.
    pub fn format(&self, report: &Report) -> Vec<FormattedRow> {
        let rows: Vec<FormattedRow> = report
            .rows
            .iter()
            .filter(|row| row.created_at >= report.cutoff)
            .map(|row| self.format_row(row))
            .collect();

        info!(
            rows = rows.len(),
            lookback_days = report.params.lookback_days(),
            "Formatted {} entr{} within lookback window",
            rows.len(),
            if rows.len() == 1 { "y" } else { "ies" }
        );

        rows
    }

    pub fn format_row(&self, row: &DispensationRow) -> FormattedRow {
        FormattedRow {
            vessel_email: row.vessel_email.clone(),
            vessel_id: row.vessel_id,
            vessel: row.vessel.clone(),
            job_id: row.job_id,
            importance: row.importance.clone().unwrap_or_default(),
            title: row.title.clone().unwrap_or_default(),
            dispensation_type: row.dispensation_type.clone().unwrap_or_default(),
            department: row.department.clone().unwrap_or_default(),
            due_date: format_date(row.due_date),
            requested_on: format_date(row.requested_on),
            created_at: row
                .created_at
                .with_timezone(&self.timezone)
                .format(DATETIME_FORMAT)
                .to_string(),
            status: row.status.clone(),
            url: None,
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
