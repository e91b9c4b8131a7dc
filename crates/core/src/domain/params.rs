// Report Parameters & Scheduling Metadata

use super::error::{DomainError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::time::Duration;

/// Job type discriminator the report is restricted to
pub const JOB_TYPE: &str = "flag-extension-dispensation";

/// How often the report is expected to run (1 hour)
pub const RUN_FREQUENCY: Duration = Duration::from_secs(60 * 60);

/// Default lookback window (1 day)
pub const DEFAULT_LOOKBACK_DAYS: f64 = 1.0;

/// Default job status label filter
pub const DEFAULT_JOB_STATUS: &str = "for_approval";

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// 0001-01-01T00:00:00Z, the earliest instant SQL date functions accept
const EARLIEST_CUTOFF_SECS: i64 = -62_135_596_800;

/// Validated invocation parameters.
///
/// Only constructible through [`ReportParams::new`], so a value of this type
/// always carries a positive, finite lookback and a non-empty status label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportParams {
    lookback_days: f64,
    job_status: String,
}

impl ReportParams {
    pub fn new(lookback_days: f64, job_status: impl Into<String>) -> Result<Self> {
        if !lookback_days.is_finite() || lookback_days <= 0.0 {
            return Err(DomainError::InvalidParameter {
                name: "lookback_days",
                reason: format!("must be a positive number of days, got {}", lookback_days),
            });
        }

        let job_status = job_status.into();
        if job_status.trim().is_empty() {
            return Err(DomainError::InvalidParameter {
                name: "job_status",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            lookback_days,
            job_status,
        })
    }

    pub fn lookback_days(&self) -> f64 {
        self.lookback_days
    }

    pub fn job_status(&self) -> &str {
        &self.job_status
    }

    /// Inclusive lower bound for `created_at`: `now - lookback_days`.
    ///
    /// Windows reaching before year 1 clamp to 0001-01-01, which admits every job.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let earliest = earliest_cutoff();
        let millis = (self.lookback_days * MILLIS_PER_DAY).round();
        TimeDelta::try_milliseconds(millis as i64)
            .and_then(|window| now.checked_sub_signed(window))
            .filter(|cutoff| *cutoff >= earliest)
            .unwrap_or(earliest)
    }
}

fn earliest_cutoff() -> DateTime<Utc> {
    DateTime::from_timestamp(EARLIEST_CUTOFF_SECS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            job_status: DEFAULT_JOB_STATUS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rejects_non_positive_lookback() {
        for days in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = ReportParams::new(days, "for_approval").unwrap_err();
            assert!(matches!(
                err,
                DomainError::InvalidParameter {
                    name: "lookback_days",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_rejects_blank_status() {
        let err = ReportParams::new(1.0, "  ").unwrap_err();
        assert!(err.to_string().contains("job_status"));
    }

    #[test]
    fn test_defaults_match_schedule_metadata() {
        let params = ReportParams::default();
        assert_eq!(params.lookback_days(), 1.0);
        assert_eq!(params.job_status(), "for_approval");
        assert_eq!(RUN_FREQUENCY.as_secs(), 3600);
    }

    #[test]
    fn test_cutoff_supports_fractional_days() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let params = ReportParams::new(0.5, "for_approval").unwrap();
        assert_eq!(
            params.cutoff(now),
            Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_cutoff_clamps_huge_windows() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();

        let params = ReportParams::new(1e300, "for_approval").unwrap();
        assert_eq!(params.cutoff(now), expected);

        // ~2190 years back lands before year 1
        let params = ReportParams::new(800_000.0, "for_approval").unwrap();
        assert_eq!(params.cutoff(now), expected);
        assert_eq!(expected.format("%Y-%m-%d %H:%M:%S").to_string(), "0001-01-01 00:00:00");
    }
}
