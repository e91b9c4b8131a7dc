// Application Layer - Use Cases

pub mod format;
pub mod report;
pub mod routing;
pub mod scheduler;
pub mod shutdown;

// Re-exports
pub use format::ReportFormatter;
pub use report::{Report, ReportService};
pub use routing::{Notification, NotificationRouter, RoutingSettings};
pub use scheduler::ReportScheduler;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
