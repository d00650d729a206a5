use serde::Deserialize;

/// Main configuration structure for Paperwatch
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub monitor: MonitorConfig,
    pub output: OutputConfig,
}

/// Monitoring engine configuration
///
/// The scheduler takes an immutable snapshot of this per cycle; replacing
/// it while running takes effect on the next scheduled tick.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// URL of the publication index page to watch
    #[serde(rename = "target-url")]
    pub target_url: String,

    /// Seconds between fetch cycles
    #[serde(rename = "check-interval-secs")]
    pub check_interval_secs: u64,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Additional fetch attempts after the first failure
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// User-Agent header sent on every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whether newly discovered papers are pushed to the notifier
    #[serde(rename = "notifications-enabled", default = "default_notifications")]
    pub notifications_enabled: bool,
}

fn default_notifications() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite catalog database
    #[serde(rename = "database-path")]
    pub database_path: String,
}
