//! Retry with exponential backoff for provider I/O.

use crate::LoaderResult;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry policy for source-provider I/O.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Runs `op` up to `config.max_attempts` times, sleeping `base_delay * 2^n`
/// between attempts. Only transient errors are retried; a compile error
/// surfaces immediately.
pub async fn with_backoff<T, F, Fut>(
    op_name: &str,
    config: &RetryConfig,
    mut op: F,
) -> LoaderResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = LoaderResult<T>>,
{
    let mut delay = config.base_delay;
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < config.max_attempts => {
                warn!(
                    op = op_name,
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "source I/O failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LoaderError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn succeeds_first_try_without_retry() {
        let calls = AtomicU32::new(0);
        let result = with_backoff("op", &fast_config(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, LoaderError>(7) }
        })
        .await
        .unwrap();
        assert_eq!(result, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_errors_up_to_limit() {
        let calls = AtomicU32::new(0);
        let err = with_backoff("op", &fast_config(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(LoaderError::source_read("a/b", "io broken")) }
        })
        .await
        .unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn recovers_when_a_retry_succeeds() {
        let calls = AtomicU32::new(0);
        let result = with_backoff("op", &fast_config(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 1 {
                    Err(LoaderError::source_read("a/b", "flaky"))
                } else {
                    Ok(42)
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn compile_errors_never_retry() {
        let calls = AtomicU32::new(0);
        let err = with_backoff("op", &fast_config(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(LoaderError::compile("a/b", "bad json")) }
        })
        .await
        .unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!err.is_transient());
    }
}
