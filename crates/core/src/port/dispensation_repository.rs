// Dispensation Repository Port (Interface)

use crate::domain::DispensationRow;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read-only access to pending flag-extension-dispensation jobs
#[async_trait]
pub trait DispensationRepository: Send + Sync {
    /// Fetch report rows for live jobs created at or after `created_since`
    /// whose status label equals `job_status` exactly.
    ///
    /// An unknown label is not an error; it simply matches nothing.
    async fn fetch_report(
        &self,
        created_since: DateTime<Utc>,
        job_status: &str,
    ) -> Result<Vec<DispensationRow>>;
}
