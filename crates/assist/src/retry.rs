//! Retry with exponential backoff for transient upstream failures.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AssistError;

/// Configuration for retry behavior. Delays are expressed in milliseconds
/// in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    #[serde(default = "RetryConfig::default_max_retries")]
    pub max_retries: u32,
    /// Base delay between retries (doubled each attempt).
    #[serde(with = "millis", default = "RetryConfig::default_base_delay")]
    pub base_delay: Duration,
    /// Upper bound on a single delay.
    #[serde(with = "millis", default = "RetryConfig::default_max_delay")]
    pub max_delay: Duration,
    /// Add 0-50% random jitter to each delay.
    #[serde(default = "RetryConfig::default_jitter")]
    pub jitter: bool,
}

impl RetryConfig {
    fn default_max_retries() -> u32 {
        2
    }

    fn default_base_delay() -> Duration {
        Duration::from_millis(200)
    }

    fn default_max_delay() -> Duration {
        Duration::from_secs(5)
    }

    fn default_jitter() -> bool {
        true
    }

    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: Self::default_max_retries(),
            base_delay: Self::default_base_delay(),
            max_delay: Self::default_max_delay(),
            jitter: Self::default_jitter(),
        }
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the retry budget is spent. Returns the last error on failure.
pub async fn execute_with_retry<T, F, Fut>(
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, AssistError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AssistError>>,
{
    let mut attempt = 0;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < config.max_retries => {
                let delay = calculate_delay(config, attempt);
                debug!(attempt, error = %err, delay_ms = delay.as_millis() as u64, "assist_retry");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn calculate_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config.base_delay.as_millis() as u64;
    let exponential = base.saturating_mul(2_u64.saturating_pow(attempt));
    let delay = exponential.min(config.max_delay.as_millis() as u64);

    if config.jitter {
        let jitter = fastrand::u64(0..=delay / 2);
        Duration::from_millis(delay + jitter)
    } else {
        Duration::from_millis(delay)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig::default()
            .with_base_delay(Duration::from_millis(1))
            .with_jitter(false)
    }

    #[tokio::test]
    async fn retries_transient_errors_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = execute_with_retry(&fast().with_max_retries(3), |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(AssistError::Http("timeout".into()))
                } else {
                    Ok("done")
                }
            }
        })
        .await;
        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = execute_with_retry(&fast().with_max_retries(2), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(AssistError::Status {
                    status: 503,
                    body: String::new(),
                })
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_fails_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = execute_with_retry(&fast(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(AssistError::Status {
                    status: 401,
                    body: "bad key".into(),
                })
            }
        })
        .await;
        assert!(matches!(result, Err(AssistError::Status { status: 401, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delay_is_capped() {
        let cfg = RetryConfig {
            max_retries: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(300),
            jitter: false,
        };
        assert_eq!(calculate_delay(&cfg, 0), Duration::from_millis(100));
        assert_eq!(calculate_delay(&cfg, 1), Duration::from_millis(200));
        assert_eq!(calculate_delay(&cfg, 5), Duration::from_millis(300));
    }

    #[test]
    fn config_reads_millis() {
        let cfg: RetryConfig =
            serde_json::from_str(r#"{ "max_retries": 1, "base_delay": 50 }"#).unwrap();
        assert_eq!(cfg.base_delay, Duration::from_millis(50));
        assert_eq!(cfg.max_delay, Duration::from_secs(5));
        assert!(cfg.jitter);
    }
}
