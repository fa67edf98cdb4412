//! Cancellable debounce timer

use std::time::Duration;

use tokio::time::{self, Instant};

/// Holds the latest scheduled value until it has been left alone for `period`.
///
/// Every `schedule` restarts the window. `settled` is cancel-safe, so it can
/// sit in a `select!` loop next to the input source.
#[derive(Debug)]
pub struct Debouncer<T> {
    period: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(period: Duration) -> Self {
        Self { period, pending: None }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Replace the pending value and restart the window
    pub fn schedule(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.period));
    }

    /// Drop the pending value without firing
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolve with the pending value once its window elapses; never resolves while idle
    pub async fn settled(&mut self) -> T {
        loop {
            let Some(deadline) = self.pending.as_ref().map(|(_, deadline)| *deadline) else {
                return std::future::pending().await;
            };
            time::sleep_until(deadline).await;
            if let Some((value, _)) = self.pending.take() {
                return value;
            }
        }
    }
}
