use std::time::Duration;

use reqwest::{Client, Request, Response, StatusCode, header::RETRY_AFTER};
use tokio::time::sleep;

use crate::{config, error::TransportError};

/// Longest `Retry-After` hint that is waited out.
const MAX_RETRY_AFTER_SECS: f64 = 3600.0;

/// Retry settings for [`Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt before giving up.
    pub max_retries: u32,
    /// Added on top of the server's `Retry-After` hint.
    pub rate_limit_jitter: Duration,
    pub backoff_base: Duration,
    pub backoff_cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: config::DEFAULT_MAX_RETRIES,
            rate_limit_jitter: Duration::from_millis(250),
            backoff_base: Duration::from_millis(400),
            backoff_cap: Duration::from_millis(8000),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Wait before retrying a 429: `max(1, hint)` seconds plus the fixed jitter.
    ///
    /// Fractional hints are honoured. Hints that are not finite fall back to one
    /// second, and anything above an hour is capped.
    pub fn rate_limit_delay(&self, retry_after_secs: Option<f64>) -> Duration {
        let secs = retry_after_secs
            .filter(|s| s.is_finite())
            .unwrap_or(1.0)
            .clamp(1.0, MAX_RETRY_AFTER_SECS);
        Duration::from_secs_f64(secs) + self.rate_limit_jitter
    }

    /// Exponential backoff for the `attempt`-th retry (1-based), capped.
    pub fn server_error_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff_base
            .checked_mul(factor)
            .map_or(self.backoff_cap, |d| d.min(self.backoff_cap))
    }
}

fn is_transient(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn retry_after_secs(response: &Response) -> Option<f64> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok())
}

async fn body_text(response: Response) -> String {
    response.text().await.unwrap_or_default()
}

/// Sends requests with status-aware retries. Every call to the Web API goes
/// through [`Transport::send`], so the retry behaviour lives here only.
///
/// - `429` waits for `Retry-After` (plus jitter) and retries.
/// - `500`, `502`, `503`, `504` retry with exponential backoff.
/// - Any other failure status is returned immediately.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    policy: RetryPolicy,
}

impl Transport {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let mut attempt: u32 = 0;

        loop {
            let current = request
                .try_clone()
                .ok_or(TransportError::NotReplayable)?;
            tracing::debug!(method = %current.method(), url = %current.url(), attempt, "Sending request");

            let response = self.client.execute(current).await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let delay = self.policy.rate_limit_delay(retry_after_secs(&response));
                tracing::warn!(url = %request.url(), delay_ms = delay.as_millis() as u64, "Rate limited");
                sleep(delay).await;

                attempt += 1;
                if attempt > self.policy.max_retries {
                    return Err(TransportError::RateLimitExceeded {
                        body: body_text(response).await,
                    });
                }
                continue;
            }

            if is_transient(status) {
                attempt += 1;
                if attempt > self.policy.max_retries {
                    return Err(TransportError::ServerError {
                        status,
                        body: body_text(response).await,
                    });
                }
                let delay = self.policy.server_error_delay(attempt);
                tracing::warn!(url = %request.url(), %status, attempt, delay_ms = delay.as_millis() as u64, "Transient server error, backing off");
                sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                return Err(TransportError::RequestFailed {
                    status,
                    body: body_text(response).await,
                });
            }

            return Ok(response);
        }
    }
}
