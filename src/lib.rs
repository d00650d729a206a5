//! Paperwatch: an incremental monitor for journal publication indexes
//!
//! This crate implements a monitoring engine that periodically fetches a
//! publication index page, extracts paper records, deduplicates them against
//! a persisted catalog, and notifies a caller about newly appearing entries.

pub mod catalog;
pub mod config;
pub mod monitor;
pub mod notify;
pub mod paper;
pub mod state;

use thiserror::Error;

/// Main error type for Paperwatch operations
#[derive(Debug, Error)]
pub enum PaperwatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors produced by a single fetch attempt
///
/// The scheduler retries all of these up to the configured retry budget
/// before surfacing the error state.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },
}

/// Result type alias for Paperwatch operations
pub type Result<T> = std::result::Result<T, PaperwatchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use paper::{Fingerprint, Paper};
pub use state::RunState;
