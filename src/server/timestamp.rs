//! Periodic timestamp emitter
//!
//! With the in-process log backend, the server itself stamps the log every
//! ten seconds. The emitter shares the log facade with the connection
//! workers and holds its lock only for the duration of each append.

use crate::config::TimestampSettings;
use crate::log::SharedLog;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Duration, Instant};
use tracing::debug;

/// Appends one timestamp record per interval until shutdown.
pub struct TimestampEmitter {
    log: Arc<SharedLog>,
    enabled: bool,
    interval: Duration,
}

impl TimestampEmitter {
    /// Create an emitter over the shared log.
    pub fn new(log: Arc<SharedLog>, settings: &TimestampSettings) -> Self {
        Self {
            log,
            enabled: settings.enabled,
            interval: Duration::from_secs(settings.interval_secs),
        }
    }

    /// Run the emitter task. The first record lands one full interval after
    /// start; the task exits on the shutdown broadcast.
    pub async fn start_task(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        if !self.enabled {
            return;
        }

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.log.append_timestamp();
                    debug!("timestamp record appended");
                }
                _ = shutdown_rx.recv() => {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    fn settings(enabled: bool, interval_secs: u64) -> TimestampSettings {
        TimestampSettings {
            enabled,
            interval_secs,
        }
    }

    #[tokio::test]
    async fn disabled_emitter_returns_immediately() {
        let log = Arc::new(SharedLog::new(10));
        let emitter = TimestampEmitter::new(Arc::clone(&log), &settings(false, 1));
        let (_tx, rx) = broadcast::channel(1);

        timeout(Duration::from_secs(1), emitter.start_task(rx))
            .await
            .expect("disabled emitter must not block");
        assert_eq!(log.record_count(), 0);
    }

    #[tokio::test]
    async fn emitter_appends_then_honors_shutdown() {
        let log = Arc::new(SharedLog::new(10));
        let emitter = TimestampEmitter::new(Arc::clone(&log), &settings(true, 1));
        let (tx, rx) = broadcast::channel(1);

        let task = tokio::spawn(async move { emitter.start_task(rx).await });

        tokio::time::sleep(Duration::from_millis(1200)).await;
        let _ = tx.send(());
        timeout(Duration::from_secs(1), task)
            .await
            .expect("emitter must stop on shutdown")
            .unwrap();

        assert!(log.record_count() >= 1);
        assert!(log.snapshot_from(0).starts_with(b"timestamp:"));
    }

    #[tokio::test]
    async fn first_record_waits_a_full_interval() {
        let log = Arc::new(SharedLog::new(10));
        let emitter = TimestampEmitter::new(Arc::clone(&log), &settings(true, 5));
        let (tx, rx) = broadcast::channel(1);

        let task = tokio::spawn(async move { emitter.start_task(rx).await });
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(log.record_count(), 0, "no tick before the first interval");

        let _ = tx.send(());
        let _ = task.await;
    }
}
