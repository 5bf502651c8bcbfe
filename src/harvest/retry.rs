use std::fmt::Display;
use std::future::Future;

/// Runs `operation` until it succeeds or `max_attempts` attempts have failed
///
/// Failures are logged and swallowed; exhausting every attempt yields `None`
/// so the caller can skip the item instead of aborting its batch. There is no
/// delay between attempts.
///
/// # Arguments
///
/// * `max_attempts` - Total number of attempts, first try included (at least 1)
/// * `label` - What is being attempted, used in log lines
/// * `operation` - Produces a fresh future for every attempt
pub async fn with_retry<T, E, F, Fut>(max_attempts: u32, label: &str, mut operation: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 0..max_attempts {
        if attempt > 0 {
            tracing::info!("retry number {} for {}", attempt, label);
        }

        match operation().await {
            Ok(value) => return Some(value),
            Err(e) => {
                tracing::warn!(
                    "attempt {}/{} failed for {}: {}",
                    attempt + 1,
                    max_attempts,
                    label,
                    e
                );
            }
        }
    }

    tracing::error!("giving up on {} after {} attempts", label, max_attempts);
    None
}
