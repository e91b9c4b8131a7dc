// SQLite DispensationRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dispensation_core::domain::{DispensationRow, JOB_TYPE};
use dispensation_core::error::{AppError, Result};
use dispensation_core::port::DispensationRepository;
use sqlx::SqlitePool;
use tracing::debug;

const REPORT_QUERY: &str = include_str!("../queries/flag_dispensations.sql");

/// Format bound for the `created_at` lower bound (UTC)
const CUTOFF_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteDispensationRepository {
    pool: SqlitePool,
}

impl SqliteDispensationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DispensationRepository for SqliteDispensationRepository {
    async fn fetch_report(
        &self,
        created_since: DateTime<Utc>,
        job_status: &str,
    ) -> Result<Vec<DispensationRow>> {
        let cutoff = created_since.format(CUTOFF_FORMAT).to_string();

        let records: Vec<DispensationRecord> = sqlx::query_as(REPORT_QUERY)
            .bind(JOB_TYPE)
            .bind(&cutoff)
            .bind(job_status)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        debug!(
            cutoff = %cutoff,
            job_status = %job_status,
            records = records.len(),
            "Report query executed"
        );

        records.into_iter().map(DispensationRecord::into_row).collect()
    }
}

/// SQLite row representation (dates arrive as text)
#[derive(Debug, sqlx::FromRow)]
struct DispensationRecord {
    vessel_email: Option<String>,
    vessel_id: i64,
    vessel: String,
    job_id: i64,
    importance: Option<String>,
    title: Option<String>,
    dispensation_type: Option<String>,
    department: Option<String>,
    due_date: Option<String>,
    requested_on: Option<String>,
    created_at: String,
    status: String,
}

impl DispensationRecord {
    fn into_row(self) -> Result<DispensationRow> {
        let created_at = NaiveDateTime::parse_from_str(&self.created_at, CREATED_AT_FORMAT)
            .map_err(|e| {
                AppError::Database(format!(
                    "Malformed created_at {:?} for job {}: {}",
                    self.created_at, self.job_id, e
                ))
            })?
            .and_utc();

        Ok(DispensationRow {
            vessel_email: self.vessel_email,
            vessel_id: self.vessel_id,
            vessel: self.vessel,
            job_id: self.job_id,
            importance: self.importance,
            title: self.title,
            dispensation_type: self.dispensation_type,
            department: self.department,
            // date() already yields NULL for unparseable values
            due_date: parse_date(self.due_date.as_deref()),
            requested_on: parse_date(self.requested_on.as_deref()),
            created_at,
            status: self.status,
        })
    }
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v, DATE_FORMAT).ok())
}
