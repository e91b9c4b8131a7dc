//! Application configuration
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults (`AppConfig::default`)
//! 2. Optional TOML file (`~/.dispensation/config.toml`, or `DISPENSATION_CONFIG`)
//! 3. `DISPENSATION_*` environment variables (`DISPENSATION_LOOKBACK_DAYS=2`, ...)

use crate::domain::{DomainError, ReportParams, DEFAULT_JOB_STATUS, DEFAULT_LOOKBACK_DAYS};
use crate::error::Result;
use chrono_tz::Tz;
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "~/.dispensation/config.toml";
pub const DEFAULT_DB_PATH: &str = "~/.dispensation/report.db";
pub const DEFAULT_TIMEZONE: &str = "Europe/Athens";
pub const ENV_PREFIX: &str = "DISPENSATION";

/// CC rule applied when the vessel email contains `domain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRule {
    pub domain: String,
    #[serde(default)]
    pub cc: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_url: String,
    pub run_migrations: bool,

    // Report parameters
    pub lookback_days: f64,
    pub job_status: String,
    pub interval_secs: u64,

    // Presentation
    pub timezone: String,
    pub enable_links: bool,
    pub base_url: String,
    pub url_path: String,

    // Routing (first matching rule wins)
    pub internal_recipients: Vec<String>,
    pub email_routing: Vec<RoutingRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DB_PATH.to_string(),
            run_migrations: false,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            job_status: DEFAULT_JOB_STATUS.to_string(),
            interval_secs: crate::domain::RUN_FREQUENCY.as_secs(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            enable_links: false,
            base_url: String::new(),
            url_path: "/jobs/flag-extension-dispensation/".to_string(),
            internal_recipients: Vec::new(),
            email_routing: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file + environment.
    ///
    /// A missing file is fine; a malformed one is a `Config` error.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .or_else(|| std::env::var(format!("{}_CONFIG", ENV_PREFIX)).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let path = shellexpand::tilde(&path).into_owned();

        let settings = Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("internal_recipients"),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        tracing::debug!(path = %path, "Configuration loaded");
        Ok(config)
    }

    /// Database URL with `~` expanded
    pub fn database_path(&self) -> String {
        shellexpand::tilde(&self.database_url).into_owned()
    }

    pub fn report_params(&self) -> Result<ReportParams> {
        Ok(ReportParams::new(self.lookback_days, self.job_status.clone())?)
    }

    pub fn display_timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| DomainError::UnknownTimezone(self.timezone.clone()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.interval_secs, 3600);
        assert_eq!(config.report_params().unwrap(), ReportParams::default());
        assert_eq!(config.display_timezone().unwrap(), chrono_tz::Europe::Athens);
    }

    #[test]
    fn test_unknown_timezone() {
        let config = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        let err = config.display_timezone().unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn test_invalid_lookback_is_validation_failure() {
        let config = AppConfig {
            lookback_days: 0.0,
            ..Default::default()
        };
        let err = config.report_params().unwrap_err();
        assert!(matches!(err, crate::error::AppError::Validation(_)));
    }

    #[test]
    fn test_load_from_toml_file() {
        let _guard = env_guard();
        let path = scratch_file("toml_file");
        std::fs::write(
            &path,
            r#"
lookback_days = 3
job_status = "approved"
enable_links = true
base_url = "https://example.test/"

[[email_routing]]
domain = "seatraders"
cc = ["ops@seatraders.test"]
"#,
        )
        .unwrap();

        let config = AppConfig::load(path.to_str()).unwrap();
        assert_eq!(config.lookback_days, 3.0);
        assert_eq!(config.job_status, "approved");
        assert!(config.enable_links);
        assert_eq!(config.email_routing.len(), 1);
        assert_eq!(config.email_routing[0].cc, vec!["ops@seatraders.test"]);
        // Untouched keys keep their defaults
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = env_guard();
        let path = scratch_file("env_overrides");
        std::fs::write(
            &path,
            r#"
lookback_days = 3
job_status = "approved"
run_migrations = false
internal_recipients = ["file@prominence.test"]
"#,
        )
        .unwrap();

        let vars = [
            ("DISPENSATION_LOOKBACK_DAYS", "0.5"),
            ("DISPENSATION_RUN_MIGRATIONS", "true"),
            ("DISPENSATION_JOB_STATUS", "for_approval"),
            (
                "DISPENSATION_INTERNAL_RECIPIENTS",
                "ops@prominence.test,fleet@prominence.test",
            ),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let loaded = AppConfig::load(path.to_str());

        for (key, _) in vars {
            std::env::remove_var(key);
        }
        let _ = std::fs::remove_file(path);

        let config = loaded.unwrap();
        assert_eq!(config.lookback_days, 0.5);
        assert!(config.run_migrations);
        assert_eq!(config.job_status, "for_approval");
        assert_eq!(
            config.internal_recipients,
            vec!["ops@prominence.test", "fleet@prominence.test"]
        );
        assert_eq!(config.interval_secs, 3600);
    }

    static ENV_GUARD: Mutex<()> = Mutex::new(());

    /// `load` reads the process environment, so tests that call it run one at a time
    fn env_guard() -> MutexGuard<'static, ()> {
        ENV_GUARD.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn scratch_file(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "dispensation_config_{}_{}.toml",
            name,
            std::process::id()
        ))
    }
}
