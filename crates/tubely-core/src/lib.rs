//! Tubely Core Library
//!
//! Domain models, error types, configuration and constants shared by the
//! storage, processing, database and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, PipelineConfig, TubelyConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AspectClass, VideoRecord};
pub use storage_types::StorageBackend;
