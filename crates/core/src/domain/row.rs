// Report Row Models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Output column order of the report
pub const REPORT_COLUMNS: [&str; 12] = [
    "vessel_email",
    "vessel_id",
    "vessel",
    "job_id",
    "importance",
    "title",
    "dispensation_type",
    "department",
    "due_date",
    "requested_on",
    "created_at",
    "status",
];

/// One row of the dispensation report, as returned by the store.
///
/// A job with several vessels or flag extensions yields one row per
/// combination; rows are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispensationRow {
    pub vessel_email: Option<String>,
    pub vessel_id: i64,
    /// Vessel name
    pub vessel: String,
    pub job_id: i64,
    /// Importance name
    pub importance: Option<String>,
    pub title: Option<String>,
    /// Flag extension / dispensation type name
    pub dispensation_type: Option<String>,
    /// Main department name
    pub department: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub requested_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    /// Job status display name
    pub status: String,
}

/// Display-ready row: dates rendered, blanks filled, optional link attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedRow {
    pub vessel_email: Option<String>,
    pub vessel_id: i64,
    pub vessel: String,
    pub job_id: i64,
    pub importance: String,
    pub title: String,
    pub dispensation_type: String,
    pub department: String,
    pub due_date: String,
    pub requested_on: String,
    pub created_at: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FormattedRow {
    /// Key used by consumers to avoid notifying twice about the same row
    pub fn tracking_key(&self) -> String {
        format!("vessel_id_{}__job_id_{}", self.vessel_id, self.job_id)
    }
}
