// Dispensation Infrastructure - SQLite Adapter
// Implements: DispensationRepository

mod connection;
mod dispensation_repository;
mod error;
mod migration;

pub use connection::{create_pool, ensure_database_dir};
pub use dispensation_repository::SqliteDispensationRepository;
pub use migration::{run_migrations, schema_ready};

// Note: sqlx::Error conversion is handled by `error::map_sqlx_error`
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
