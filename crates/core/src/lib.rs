//! semsearch core library
//!
//! Foundational utilities shared by every semsearch crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, EmbeddingConfig};
pub use error::{AppError, AppResult};
