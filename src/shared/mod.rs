pub mod config;
pub mod error;

pub use config::{ApiConfig, AppConfig, DatabaseConfig, SyncConfig};
pub use error::{AppError, Result};
