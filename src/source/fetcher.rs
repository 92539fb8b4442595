//! CSV download with retry.

use super::SourceError;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy for sheet downloads.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts after the first failure.
    pub retries: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            delay: Duration::from_secs(2),
        }
    }
}

impl From<&crate::config::SourceConfig> for RetryPolicy {
    fn from(config: &crate::config::SourceConfig) -> Self {
        Self {
            retries: config.retries,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Build the HTTP client used for sheet downloads.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SourceError::Client(e.to_string()))
}

/// Download `url` as text, retrying failed attempts.
///
/// A non-success HTTP status counts as a failed attempt.
pub async fn fetch_csv(
    client: &reqwest::Client,
    url: &str,
    policy: RetryPolicy,
) -> Result<String, SourceError> {
    let attempts = policy.retries + 1;
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        debug!("GET {} (attempt {}/{})", url, attempt, attempts);

        match try_fetch(client, url).await {
            Ok(body) => {
                debug!("Fetched {} bytes from {}", body.len(), url);
                return Ok(body);
            }
            Err(e) => {
                warn!("Download attempt {}/{} failed: {}", attempt, attempts, e);
                last_error = e;
            }
        }

        if attempt < attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    Err(SourceError::Fetch {
        url: url.to_string(),
        attempts,
        message: last_error,
    })
}

async fn try_fetch(client: &reqwest::Client, url: &str) -> Result<String, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ));
    }

    response.text().await.map_err(|e| e.to_string())
}
