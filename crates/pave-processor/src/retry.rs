// SPDX-License-Identifier: Apache-2.0
//! Retry with exponential backoff for idempotency-keyed processor calls.
//!
//! Processor operations are not guaranteed idempotent on their own, so
//! the HTTP client never retries an unkeyed request. Requests that carry
//! an idempotency key replay safely; for those, transient transport
//! failures (connection faults, timeouts) are retried with backoff.
//! Non-2xx responses are never retried — the processor has already
//! made a decision.

use std::time::Duration;

/// Maximum retry attempts after the initial request.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries (doubles each attempt: 200ms, 400ms, 800ms).
const BASE_DELAY_MS: u64 = 200;

/// Send an idempotency-keyed request with backoff retry on transport
/// errors. The closure is called up to `MAX_RETRIES + 1` times; only
/// [`reqwest::Error`] transport failures trigger a retry.
pub(crate) async fn retry_send<F, Fut>(
    endpoint: &str,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..MAX_RETRIES {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                let delay = Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt));
                tracing::warn!(
                    endpoint,
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "keyed processor request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    // Final attempt, result returned as-is.
    f().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn exhausts_all_attempts_on_transport_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = retry_send("test", || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                // Guaranteed-closed port: connection refused.
                reqwest::Client::builder()
                    .timeout(Duration::from_millis(50))
                    .build()
                    .unwrap()
                    .get("http://127.0.0.1:1/")
                    .send()
                    .await
            }
        })
        .await;

        assert!(result.is_err(), "request to a closed port must fail");
        assert_eq!(calls.load(Ordering::SeqCst), MAX_RETRIES + 1);
    }
}
