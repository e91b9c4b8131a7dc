//! Report Scheduler - runs the dispensation report on a fixed cadence
//!
//! Each tick: fetch -> format -> route -> publish. Ticks are sequential, so a
//! slow run delays the next one instead of overlapping it. A failed run is
//! logged and the loop carries on; there is no retry within a tick.

use crate::application::format::ReportFormatter;
use crate::application::report::ReportService;
use crate::application::routing::{Notification, NotificationRouter};
use crate::application::shutdown::ShutdownToken;
use crate::domain::ReportParams;
use crate::error::Result;
use crate::port::ReportSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// Shortest accepted interval between runs
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

pub struct ReportScheduler {
    service: Arc<ReportService>,
    formatter: ReportFormatter,
    router: NotificationRouter,
    sink: Arc<dyn ReportSink>,
    params: ReportParams,
    interval: Duration,
}

impl ReportScheduler {
    /// Create a new report scheduler
    ///
    /// # Arguments
    /// * `service` - Report use case
    /// * `formatter` - Display formatting
    /// * `router` - Per-vessel notification routing
    /// * `sink` - Receives the routed notifications
    /// * `params` - Validated report parameters
    /// * `interval` - Time between runs (clamped to `MIN_INTERVAL`)
    pub fn new(
        service: Arc<ReportService>,
        formatter: ReportFormatter,
        router: NotificationRouter,
        sink: Arc<dyn ReportSink>,
        params: ReportParams,
        interval: Duration,
    ) -> Self {
        Self {
            service,
            formatter,
            router,
            sink,
            params,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// Run the scheduling loop until `shutdown` fires.
    ///
    /// The first run happens immediately.
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            lookback_days = self.params.lookback_days(),
            job_status = %self.params.job_status(),
            "Report scheduler started"
        );

        let mut tick = interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tick.tick() => {}
                _ = shutdown.wait() => break,
            }

            match self.run_now().await {
                Ok(notifications) => {
                    info!(
                        notifications = notifications.len(),
                        rows = notifications.iter().map(|n| n.rows.len()).sum::<usize>(),
                        "Scheduled report completed"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Scheduled report failed");
                }
            }
        }

        info!("Report scheduler stopped");
    }

    /// Run the report once and publish the result
    pub async fn run_now(&self) -> Result<Vec<Notification>> {
        let report = self.service.run(&self.params).await?;
        let rows = self.formatter.format(&report);
        let notifications = self.router.route(&rows);

        if notifications.is_empty() {
            info!("Nothing to publish");
        } else {
            self.sink.publish(&notifications).await?;
        }

        Ok(notifications)
    }
}
