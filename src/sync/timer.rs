//! Periodic callback on the tokio runtime, cancelled when dropped.

use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};

const MIN_PERIOD: Duration = Duration::from_millis(10);

pub struct RefreshTimer {
    handle: Option<JoinHandle<()>>,
    period: Duration,
}

impl RefreshTimer {
    /// Runs `callback` every `period`, first after one full period.
    /// Must be called from inside a tokio runtime.
    pub fn start<F>(period: Duration, mut callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick fires at once; the caller has already rendered
            interval.tick().await;
            loop {
                interval.tick().await;
                callback();
            }
        });
        tracing::debug!(?period, "refresh timer started");
        Self { handle: Some(handle), period }
    }

    pub fn period(&self) -> Duration { self.period }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("refresh timer cancelled");
        }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) { self.cancel(); }
}
