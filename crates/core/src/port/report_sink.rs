// Report Sink Port - where finished notification plans go

use crate::application::routing::Notification;
use crate::error::Result;
use async_trait::async_trait;

/// Consumer of routed notifications (delivery itself lives outside this crate)
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(&self, notifications: &[Notification]) -> Result<()>;
}
