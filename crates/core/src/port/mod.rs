// Port Layer - Interfaces for external dependencies

pub mod dispensation_repository;
pub mod report_sink;
pub mod time_provider;

// Re-exports
pub use dispensation_repository::DispensationRepository;
pub use report_sink::ReportSink;
pub use time_provider::TimeProvider;
