// Domain Layer - Report parameters and rows

pub mod error;
pub mod params;
pub mod row;

// Re-exports
pub use error::DomainError;
pub use params::{
    ReportParams, DEFAULT_JOB_STATUS, DEFAULT_LOOKBACK_DAYS, JOB_TYPE, RUN_FREQUENCY,
};
pub use row::{DispensationRow, FormattedRow, REPORT_COLUMNS};
