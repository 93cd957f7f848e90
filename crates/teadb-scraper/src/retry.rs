//! Bounded retry for page requests.
//!
//! Transient failures (timeouts, refused connections, 429, 5xx) are retried up to
//! `max_retries` additional times with an optional fixed delay between
//! attempts. Everything else is returned on first occurrence.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` is worth another attempt.
///
/// A 404 or other 4xx will answer the same way again, and a body that
/// failed to parse is not going to change on a re-request. The same holds for
/// redirect loops, malformed URLs and body decode errors on the transport side.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ScraperError::RateLimited { .. } => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        ScraperError::NotFound { .. }
        | ScraperError::Parse { .. }
        | ScraperError::InvalidUrl { .. } => false,
    }
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// has been attempted `max_retries + 1` times. The last error is returned.
///
/// With `max_retries = 3` the operation is attempted at most 4 times total.
pub(crate) async fn retry_with_delay<T, F, Fut>(
    max_retries: u32,
    delay_ms: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        attempt += 1;
        tracing::debug!(
            attempt,
            max_retries,
            delay_ms,
            error = %err,
            "transient fetch error, retrying"
        );
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}
