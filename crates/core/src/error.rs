// Central Error Type for the Application

use crate::domain::DomainError;
use thiserror::Error;

/// Application-level error type
///
/// The variant names the failing phase: parameter problems surface as
/// `Validation` before any store access, store problems as `Database`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidParameter { .. } => AppError::Validation(err.to_string()),
            other => AppError::Domain(other),
        }
    }
}

impl From<::config::ConfigError> for AppError {
    fn from(err: ::config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by converting to AppError::Database(String)

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_maps_to_validation() {
        let err: AppError = DomainError::InvalidParameter {
            name: "lookback_days",
            reason: "must be a positive number of days, got 0".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation error: Invalid parameter `lookback_days`: must be a positive number of days, got 0"
        );
    }

    #[test]
    fn test_unknown_timezone_stays_domain() {
        let err: AppError = DomainError::UnknownTimezone("Mars/Olympus".to_string()).into();
        assert!(matches!(err, AppError::Domain(_)));
        assert_eq!(err.to_string(), "Domain error: Unknown timezone: Mars/Olympus");
    }
}
