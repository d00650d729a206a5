use crate::config::types::{Config, MonitorConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_monitor_config(&config.monitor)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates monitoring engine configuration
pub fn validate_monitor_config(config: &MonitorConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.target_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid target_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "target_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.check_interval_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "check_interval_secs must be >= 1, got {}",
            config.check_interval_secs
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    validate_user_agent(&config.user_agent)?;

    Ok(())
}

/// Validates the user agent string
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // Header values must stay on one line and within the ASCII visible range
    if !user_agent
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control())
    {
        return Err(ConfigError::Validation(format!(
            "user_agent must be printable ASCII, got '{}'",
            user_agent
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_monitor_config() -> MonitorConfig {
        MonitorConfig {
            target_url: "https://journal.example.edu/oa/Dlistnum.aspx".to_string(),
            check_interval_secs: 30,
            timeout_secs: 10,
            max_retries: 3,
            user_agent: "AcademicWatch/1.0".to_string(),
            notifications_enabled: true,
        }
    }

    #[test]
    fn test_valid_monitor_config() {
        assert!(validate_monitor_config(&valid_monitor_config()).is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = valid_monitor_config();
        config.check_interval_secs = 0;
        assert!(matches!(
            validate_monitor_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = valid_monitor_config();
        config.timeout_secs = 0;
        assert!(validate_monitor_config(&config).is_err());

        config.timeout_secs = 301;
        assert!(validate_monitor_config(&config).is_err());

        config.timeout_secs = 300;
        assert!(validate_monitor_config(&config).is_ok());
    }

    #[test]
    fn test_excessive_retries_rejected() {
        let mut config = valid_monitor_config();
        config.max_retries = 11;
        assert!(validate_monitor_config(&config).is_err());

        config.max_retries = 0;
        assert!(validate_monitor_config(&config).is_ok());
    }

    #[test]
    fn test_bad_target_url() {
        let mut config = valid_monitor_config();
        config.target_url = "not a url".to_string();
        assert!(matches!(
            validate_monitor_config(&config),
            Err(ConfigError::InvalidUrl(_))
        ));

        config.target_url = "ftp://journal.example.edu/index".to_string();
        assert!(matches!(
            validate_monitor_config(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_user_agent_rules() {
        assert!(validate_user_agent("AcademicWatch/1.0 (+https://example.com)").is_ok());

        assert!(validate_user_agent("").is_err());
        assert!(validate_user_agent("   ").is_err());
        assert!(validate_user_agent("bad\nagent").is_err());
        assert!(validate_user_agent("非ASCII代理").is_err());
    }
}
