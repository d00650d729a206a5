//! HTTP fetcher for the publication index page
//!
//! This module handles all HTTP requests for the monitoring engine:
//! - Building HTTP clients honoring the active config's user agent and timeout
//! - GET requests for the index page
//! - Error classification into timeout / network / HTTP status
//! - Retry with bounded exponential backoff

use crate::config::MonitorConfig;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;

/// Base delay before the first retry; doubles per attempt
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Ceiling on the backoff delay
const RETRY_MAX_DELAY: Duration = Duration::from_secs(5);

/// Builds an HTTP client from the active monitor configuration
///
/// A new client is built per cycle, so a replaced config's user agent and
/// timeout apply to every request of the following cycle.
pub fn build_http_client(config: &MonitorConfig) -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(|e| FetchError::Network {
            url: config.target_url.clone(),
            message: format!("failed to build HTTP client: {}", e),
        })
}

/// Fetches a URL and returns the response body
///
/// Failures are classified into the retryable [`FetchError`] kinds:
/// timeouts, transport errors, and non-2xx HTTP statuses.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| classify_error(url, e))
}

/// Fetches with retries: 1 initial attempt plus up to `max_retries` more
///
/// Every [`FetchError`] kind is retried; the delay between attempts grows
/// exponentially from [`RETRY_BASE_DELAY`] and is capped at
/// [`RETRY_MAX_DELAY`]. The last error is returned once the budget is
/// exhausted.
pub async fn fetch_with_retry(
    client: &Client,
    url: &str,
    max_retries: u32,
) -> Result<String, FetchError> {
    let mut attempt: u32 = 0;

    loop {
        match fetch_page(client, url).await {
            Ok(body) => return Ok(body),
            Err(e) if attempt < max_retries => {
                let delay = backoff_delay(attempt);
                tracing::warn!(
                    "Fetch attempt {}/{} for {} failed: {} (retrying in {:?})",
                    attempt + 1,
                    max_retries + 1,
                    url,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::warn!(
                    "Fetch attempt {}/{} for {} failed: {} (giving up)",
                    attempt + 1,
                    max_retries + 1,
                    url,
                    e
                );
                return Err(e);
            }
        }
    }
}

/// Classifies a reqwest error into a [`FetchError`]
fn classify_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

/// Backoff delay for the given zero-based attempt number
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 1u32 << attempt.min(5);
    RETRY_BASE_DELAY.saturating_mul(factor).min(RETRY_MAX_DELAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> MonitorConfig {
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
    fn test_build_http_client() {
        let client = build_http_client(&test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        assert_eq!(backoff_delay(0), Duration::from_millis(250));
        assert_eq!(backoff_delay(1), Duration::from_millis(500));
        assert_eq!(backoff_delay(2), Duration::from_secs(1));
        assert_eq!(backoff_delay(3), Duration::from_secs(2));
        assert_eq!(backoff_delay(4), Duration::from_secs(4));

        // Capped from here on
        assert_eq!(backoff_delay(5), RETRY_MAX_DELAY);
        assert_eq!(backoff_delay(20), RETRY_MAX_DELAY);
    }
}
