use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry an async operation over a fixed schedule of delays.
///
/// The operation is attempted once, then once more after each delay in
/// `delays_secs`. Returns the first success, or the last error once the
/// schedule is exhausted.
pub async fn retry_with_backoff<F, Fut, T, E>(
    mut operation: F,
    delays_secs: &[u64],
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = delays_secs.len() + 1;

    for (i, delay) in delays_secs.iter().enumerate() {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                warn!(
                    "Request failed (attempt {}/{attempts}): {e}. Retrying after {delay}s...",
                    i + 1
                );
                sleep(Duration::from_secs(*delay)).await;
            }
        }
    }

    operation().await
}
