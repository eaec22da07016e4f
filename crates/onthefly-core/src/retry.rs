use std::time::Duration;

use crate::error::AppError;
use crate::traits::Fetcher;

/// Retry configuration for upstream fetches.
///
/// Default schedule: 2 retries with 2s then 4s of backoff. Permanent
/// upstream statuses (403/404/410, see [`AppError::is_permanent`])
/// short-circuit the schedule: no sleep happens after a permanent
/// classification.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: vec![Duration::from_millis(2000), Duration::from_millis(4000)],
        }
    }
}

impl RetryPolicy {
    /// No retries at all; the single attempt's result is final.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: vec![],
        }
    }

    /// Backoff delay to sleep after a failed attempt (1-indexed).
    /// Attempts beyond the schedule reuse its last entry.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let index = attempt.saturating_sub(1) as usize;
        self.backoff
            .get(index)
            .or_else(|| self.backoff.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

/// Fetch a URL with bounded retries and exponential backoff.
///
/// Attempts run `1..=max_retries + 1`. A permanent failure is raised
/// immediately; a transient one (timeout, transport failure, other
/// non-2xx status) sleeps the scheduled backoff and retries while
/// attempts remain. The last error is returned once the budget is
/// exhausted.
pub async fn fetch_with_retry<F: Fetcher>(
    fetcher: &F,
    url: &str,
    policy: &RetryPolicy,
) -> Result<String, AppError> {
    let attempts = policy.max_retries + 1;

    let mut last_error = None;
    for attempt in 1..=attempts {
        match fetcher.fetch(url).await {
            Ok(body) => return Ok(body),
            Err(err) if err.is_permanent() => {
                tracing::warn!(%url, error = %err, "Permanent failure, not retrying");
                return Err(err);
            }
            Err(err) => {
                if attempt < attempts {
                    let delay = policy.delay_for_attempt(attempt);
                    tracing::warn!(
                        %url,
                        error = %err,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Transient failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_error = Some(err);
            }
        }
    }

    // attempts >= 1, so last_error is set on every failure path
    Err(last_error.unwrap_or_else(|| AppError::Generic("no fetch attempts made".into())))
}
