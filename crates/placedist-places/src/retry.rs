//! Retry with exponential back-off and jitter for the places client.
//!
//! [`retry_with_backoff`] wraps a single request and retries on transient
//! errors. A continuation token that is not ready yet is not handled here;
//! the pagination loop owns that single, fixed-delay retry.

use std::future::Future;
use std::time::Duration;

use crate::error::PlacesError;

const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 5xx, rate limiting.
///
/// **Not retriable:** other API statuses, malformed bodies, a pending
/// continuation token, and client-side 4xx.
pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    match err {
        PlacesError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        PlacesError::UnexpectedStatus { status } => *status >= 500,
        PlacesError::RateLimited(_) => true,
        PlacesError::TokenNotReady
        | PlacesError::Api { .. }
        | PlacesError::Deserialize { .. }
        | PlacesError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// With the default settings (`backoff_base_ms = 500`, `max_retries = 2`) a
/// request that keeps failing is tried three times:
///
/// | Retry | Sleep before it           |
/// |-------|---------------------------|
/// | 1     | 375 – 625 ms              |
/// | 2     | 750 – 1 250 ms            |
///
/// Non-retriable errors are returned immediately. See [`backoff_delay`] for
/// the general formula.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    let mut retries_used = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retries_used == max_retries || !is_retriable(&err) {
            return Err(err);
        }
        retries_used += 1;

        let delay = backoff_delay(backoff_base_ms, retries_used);
        tracing::warn!(
            retry = retries_used,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient places search error, retrying after back-off"
        );
        tokio::time::sleep(delay).await;
    }
}

/// Sleep before retry number `retry` (1-based): `base × 2^(retry-1)`, capped
/// at 30 s, then scaled by a random factor in `[0.75, 1.25)`.
fn backoff_delay(backoff_base_ms: u64, retry: u32) -> Duration {
    let exponent = retry.saturating_sub(1).min(10);
    let nominal_ms = backoff_base_ms
        .saturating_mul(1u64 << exponent)
        .min(MAX_DELAY_MS);
    let jitter = 0.75 + rand::random::<f64>() * 0.5;
    #[allow(clippy::cast_precision_loss)]
    Duration::from_secs_f64(nominal_ms as f64 * jitter / 1_000.0)
}
