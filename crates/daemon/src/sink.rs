//! Log-based report sink
//!
//! Delivery (email, dashboards) is owned by another system; the daemon emits
//! each notification as a structured log event that such a system can pick up.

use async_trait::async_trait;
use dispensation_core::application::Notification;
use dispensation_core::error::Result;
use dispensation_core::port::ReportSink;
use tracing::info;

pub struct LogSink;

#[async_trait]
impl ReportSink for LogSink {
    async fn publish(&self, notifications: &[Notification]) -> Result<()> {
        for notification in notifications {
            let payload = serde_json::to_string(notification)?;
            info!(
                target: "dispensation::notification",
                vessel_id = notification.vessel_id,
                subject = %notification.subject,
                rows = notification.rows.len(),
                tracking_keys = ?notification.tracking_keys(),
                payload = %payload,
                "Notification ready"
            );
        }
        Ok(())
    }
}
