//! Bounded retry of operations that hit storage contention.

use std::future::Future;

use tracing::warn;

use folderhub_core::config::RetryConfig;
use folderhub_core::result::AppResult;

/// Runs `attempt` until it succeeds, fails terminally, or the policy's
/// attempts are used up.
///
/// Only retryable errors (`StorageConflict`) trigger another attempt.
/// Each attempt must open its own transaction; the closure is called
/// afresh every time.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryConfig,
    operation: &'static str,
    mut attempt: F,
) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut tried = 0;
    loop {
        tried += 1;
        match attempt().await {
            Err(e) if e.is_retryable() && tried < max_attempts => {
                let delay = policy.backoff_for(tried);
                warn!(
                    operation,
                    attempt = tried,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Storage conflict, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use folderhub_core::error::{AppError, ErrorKind};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_retries_storage_conflict_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = with_retry(&RetryConfig::default(), "test", move || async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(AppError::storage_conflict("database is locked"))
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.expect("third attempt succeeds"), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryConfig {
            max_attempts: 3,
            ..RetryConfig::default()
        };
        let counter = &calls;
        let result: AppResult<()> = with_retry(&policy, "test", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(AppError::storage_conflict("busy"))
        })
        .await;

        assert!(result.unwrap_err().is(ErrorKind::StorageConflict));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: AppResult<()> = with_retry(&RetryConfig::default(), "test", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(AppError::conflict("name taken"))
        })
        .await;

        assert!(result.unwrap_err().is(ErrorKind::Conflict));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
