//! Debounced view of a changing value.
//!
//! The output follows the source only once the source has stayed unchanged
//! for the whole delay. Each new source value restarts the timer, so only the
//! last value of a burst is ever emitted.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Handle to a debounced value; dropping it cancels any pending update
pub struct Debounced<T> {
    output: watch::Receiver<T>,
    task: JoinHandle<()>,
}

/// Debounce `source` by `delay`
///
/// The output starts at the source's current value. Must be called inside a
/// tokio runtime.
pub fn debounce<T>(mut source: watch::Receiver<T>, delay: Duration) -> Debounced<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let initial = source.borrow_and_update().clone();
    let (tx, output) = watch::channel(initial);

    let task = tokio::spawn(async move {
        while source.changed().await.is_ok() {
            loop {
                tokio::select! {
                    changed = source.changed() => {
                        if changed.is_err() {
                            // Source gone mid-burst: the pending value is dropped
                            return;
                        }
                    }
                    _ = sleep(delay) => break,
                }
            }

            let value = source.borrow_and_update().clone();
            tx.send_if_modified(|current| {
                if *current == value {
                    false
                } else {
                    *current = value;
                    true
                }
            });
        }
    });

    Debounced { output, task }
}

impl<T: Clone> Debounced<T> {
    /// Current debounced value
    pub fn get(&self) -> T {
        self.output.borrow().clone()
    }

    /// Wait for the next emitted value; `None` once the source is gone
    pub async fn changed(&mut self) -> Option<T> {
        self.output.changed().await.ok()?;
        Some(self.output.borrow_and_update().clone())
    }

    /// Additional reader of the debounced value
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Instant};

    const DELAY: Duration = Duration::from_millis(250);

    #[tokio::test(start_paused = true)]
    async fn test_initial_value_is_immediate() {
        let (_tx, rx) = watch::channel("a".to_string());
        let debounced = debounce(rx, DELAY);
        assert_eq!(debounced.get(), "a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_value_waits_for_quiet_period() {
        let (tx, rx) = watch::channel("a".to_string());
        let debounced = debounce(rx, Duration::from_millis(50));

        tx.send("b".to_string()).unwrap();
        sleep(Duration::from_millis(20)).await;
        assert_eq!(debounced.get(), "a");

        sleep(Duration::from_millis(40)).await;
        assert_eq!(debounced.get(), "b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_only_last_value() {
        let (tx, rx) = watch::channel(String::new());
        let mut debounced = debounce(rx, DELAY);
        let start = Instant::now();

        tx.send("n".to_string()).unwrap();
        sleep(Duration::from_millis(40)).await;
        tx.send("na".to_string()).unwrap();
        sleep(Duration::from_millis(40)).await;
        tx.send("nar".to_string()).unwrap();

        assert_eq!(debounced.changed().await.as_deref(), Some("nar"));
        assert!(start.elapsed() >= Duration::from_millis(80) + DELAY);

        // Nothing else from the same burst
        assert!(timeout(Duration::from_secs(1), debounced.changed()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_emit_each() {
        let (tx, rx) = watch::channel(0u32);
        let mut debounced = debounce(rx, DELAY);

        tx.send(1).unwrap();
        assert_eq!(debounced.changed().await, Some(1));

        tx.send(2).unwrap();
        sleep(Duration::from_millis(100)).await;
        tx.send(3).unwrap();
        assert_eq!(debounced.changed().await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returning_to_current_value_is_silent() {
        let (tx, rx) = watch::channel("a".to_string());
        let mut debounced = debounce(rx, DELAY);

        tx.send("b".to_string()).unwrap();
        sleep(Duration::from_millis(10)).await;
        tx.send("a".to_string()).unwrap();

        assert!(timeout(Duration::from_secs(1), debounced.changed()).await.is_err());
        assert_eq!(debounced.get(), "a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_update() {
        let (tx, rx) = watch::channel("a".to_string());
        let debounced = debounce(rx, DELAY);
        let observer = debounced.subscribe();

        tx.send("b".to_string()).unwrap();
        sleep(Duration::from_millis(10)).await;
        drop(debounced);

        sleep(DELAY * 2).await;
        assert_eq!(*observer.borrow(), "a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_closed_ends_stream() {
        let (tx, rx) = watch::channel(1u32);
        let mut debounced = debounce(rx, DELAY);

        tx.send(2).unwrap();
        drop(tx);

        assert_eq!(debounced.changed().await, None);
        assert_eq!(debounced.get(), 1);
    }
}
