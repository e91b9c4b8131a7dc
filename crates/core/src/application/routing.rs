//! Notification routing
//!
//! Groups formatted rows per vessel and decides who should hear about them.
//! Nothing is sent from here; the resulting [`Notification`] plans are handed
//! to a [`crate::port::ReportSink`].

use crate::config::{AppConfig, RoutingRule};
use crate::domain::FormattedRow;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

pub const ALERT_TITLE: &str = "Flag Dispensations";

/// Columns shown to recipients, in order
pub const DISPLAY_COLUMNS: [&str; 6] = [
    "title",
    "dispensation_type",
    "department",
    "requested_on",
    "due_date",
    "created_at",
];

const DEFAULT_COMPANY: &str = "Prominence Maritime S.A.";
const COMPANY_BY_DOMAIN: [(&str, &str); 2] = [
    ("prominence", "Prominence Maritime S.A."),
    ("seatraders", "Sea Traders S.A."),
];

/// Routing inputs taken from [`AppConfig`]
#[derive(Debug, Clone, Default)]
pub struct RoutingSettings {
    pub email_routing: Vec<RoutingRule>,
    pub internal_recipients: Vec<String>,
    pub enable_links: bool,
    pub base_url: String,
    pub url_path: String,
}

impl From<&AppConfig> for RoutingSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            email_routing: config.email_routing.clone(),
            internal_recipients: config.internal_recipients.clone(),
            enable_links: config.enable_links,
            base_url: config.base_url.clone(),
            url_path: config.url_path.clone(),
        }
    }
}

/// One message worth of rows for a single vessel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub recipients: Vec<String>,
    pub cc_recipients: Vec<String>,
    pub subject: String,
    pub vessel_id: i64,
    pub vessel_name: String,
    pub company_name: String,
    pub alert_title: &'static str,
    pub display_columns: &'static [&'static str],
    pub rows: Vec<FormattedRow>,
}

impl Notification {
    pub fn tracking_keys(&self) -> Vec<String> {
        self.rows.iter().map(FormattedRow::tracking_key).collect()
    }
}

pub struct NotificationRouter {
    settings: RoutingSettings,
}

impl NotificationRouter {
    pub fn new(settings: RoutingSettings) -> Self {
        Self { settings }
    }

    /// Build one notification per (vessel email, vessel name), ordered by key.
    ///
    /// Rows without a vessel email cannot be addressed and are skipped.
    pub fn route(&self, rows: &[FormattedRow]) -> Vec<Notification> {
        let mut grouped: BTreeMap<(String, String), Vec<FormattedRow>> = BTreeMap::new();

        for row in rows {
            let Some(email) = row.vessel_email.as_deref().filter(|e| !e.is_empty()) else {
                warn!(
                    vessel_id = row.vessel_id,
                    job_id = row.job_id,
                    "Skipping row without vessel email"
                );
                continue;
            };

            let mut row = row.clone();
            row.url = self.link_for(row.job_id);
            grouped
                .entry((email.to_string(), row.vessel.clone()))
                .or_default()
                .push(row);
        }

        grouped
            .into_iter()
            .map(|((email, vessel_name), rows)| {
                let cc_recipients = self.cc_recipients(&email);
                let notification = Notification {
                    recipients: vec![email.clone()],
                    subject: subject_line(&vessel_name),
                    vessel_id: rows[0].vessel_id,
                    company_name: company_name(&email).to_string(),
                    alert_title: ALERT_TITLE,
                    display_columns: &DISPLAY_COLUMNS,
                    vessel_name,
                    cc_recipients,
                    rows,
                };

                info!(
                    vessel = %notification.vessel_name,
                    rows = notification.rows.len(),
                    to = %email,
                    cc = notification.cc_recipients.len(),
                    "Created notification"
                );

                notification
            })
            .collect()
    }

    /// CC list of the first rule whose domain occurs in the email, plus
    /// internal recipients. Deduplicated and sorted.
    pub fn cc_recipients(&self, vessel_email: &str) -> Vec<String> {
        let email = vessel_email.to_lowercase();

        let matched = self
            .settings
            .email_routing
            .iter()
            .find(|rule| email.contains(&rule.domain.to_lowercase()));

        if matched.is_none() {
            info!(
                vessel_email = %vessel_email,
                "No routing domain matched, using internal recipients only"
            );
        }

        matched
            .map(|rule| rule.cc.iter())
            .into_iter()
            .flatten()
            .chain(self.settings.internal_recipients.iter())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// `{base_url}{url_path}/{job_id}` when links are enabled
    pub fn link_for(&self, job_id: i64) -> Option<String> {
        if !self.settings.enable_links {
            return None;
        }

        let base_url = self.settings.base_url.trim_end_matches('/');
        let url_path = self.settings.url_path.trim_end_matches('/');
        Some(format!("{}{}/{}", base_url, url_path, job_id))
    }
}

pub fn company_name(vessel_email: &str) -> &'static str {
    let email = vessel_email.to_lowercase();
    COMPANY_BY_DOMAIN
        .iter()
        .find(|(needle, _)| email.contains(needle))
        .map(|(_, company)| *company)
        .unwrap_or(DEFAULT_COMPANY)
}

pub fn subject_line(vessel_name: &str) -> String {
    format!(
        "AlertDev | {} Flag Extensions-Dispensations",
        vessel_name.to_uppercase()
    )
}
