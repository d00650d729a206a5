//! Configuration module for Paperwatch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use paperwatch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Watching: {}", config.monitor.target_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, MonitorConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

// Re-export validation (used when accepting a replacement config at runtime)
pub use validation::validate_monitor_config;
