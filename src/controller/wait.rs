use crate::error::DriverError;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// How long to wait for a document predicate, and how often to check it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl WaitPolicy {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("condition not met within {0:?}")]
    TimedOut(Duration),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Polls `probe` until it yields a value or the policy's timeout elapses
///
/// The probe is always evaluated at least once, so a zero timeout still
/// observes the current document state. A driver error from the probe ends
/// the wait immediately.
pub async fn poll_until<T, F, Fut>(policy: WaitPolicy, mut probe: F) -> Result<T, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, DriverError>>,
{
    let deadline = Instant::now() + policy.timeout;

    loop {
        if let Some(value) = probe().await? {
            return Ok(value);
        }

        if Instant::now() >= deadline {
            return Err(WaitError::TimedOut(policy.timeout));
        }

        tokio::time::sleep(policy.interval).await;
    }
}
