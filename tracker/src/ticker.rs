use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::store::TrackerStore;

/// One-second wall-clock ticker driving [`TrackerStore::tick`].
///
/// The underlying task is aborted when the `Ticker` is dropped, so the
/// interval is released on every exit path and can never outlive the
/// store's owner.
pub struct Ticker {
    handle: tokio::task::JoinHandle<()>,
}

impl Ticker {
    pub fn spawn(store: Arc<Mutex<TrackerStore>>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick of a tokio interval completes immediately;
            // consume it so one second of elapsed time means one second of
            // wall-clock time.
            interval.tick().await;
            loop {
                interval.tick().await;
                store.lock().expect("tracker store lock poisoned").tick();
            }
        });
        Self { handle }
    }

    /// Explicit stop; dropping the ticker has the same effect.
    pub fn stop(self) {}
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewIssue;

    fn store_with_running_issue() -> Arc<Mutex<TrackerStore>> {
        let mut store = TrackerStore::new();
        store.start_tracking(NewIssue {
            id: 1,
            title: "A".to_string(),
            url: "https://github.com/acme/widgets/issues/1".to_string(),
        });
        Arc::new(Mutex::new(store))
    }

    fn elapsed(store: &Arc<Mutex<TrackerStore>>) -> u64 {
        store
            .lock()
            .unwrap()
            .active_issue()
            .unwrap()
            .elapsed_seconds
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_advances_once_per_second() {
        let store = store_with_running_issue();
        let _ticker = Ticker::spawn(store.clone());

        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(elapsed(&store), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_ticker_stops_the_clock() {
        let store = store_with_running_issue();
        let ticker = Ticker::spawn(store.clone());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        drop(ticker);
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(elapsed(&store), 2);
    }
}
