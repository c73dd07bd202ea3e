use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Event counter for one sampling window
///
/// Between two calls to [`take`](Self::take) the count only grows. `take`
/// swaps the count for zero in a single atomic step, so an increment racing
/// with it lands either in the value returned or in the next window.
#[derive(Debug)]
pub struct SampleWindow {
    count: AtomicU64,
    interval: Duration,
}

impl SampleWindow {
    pub fn new(interval: Duration) -> Self {
        Self {
            count: AtomicU64::new(0),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn record(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Read-and-clear
    pub fn take(&self) -> u64 {
        self.count.swap(0, Ordering::AcqRel)
    }

    /// Events recorded since the last `take`
    pub fn pending(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }
}

/// Handle given to event sources so they can count into a window
#[derive(Debug, Clone)]
pub struct EventRecorder {
    window: Arc<SampleWindow>,
}

impl EventRecorder {
    pub(crate) fn new(window: Arc<SampleWindow>) -> Self {
        Self { window }
    }

    #[inline]
    pub fn record_event(&self) {
        self.window.record();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_resets_count() {
        let window = SampleWindow::new(Duration::from_secs(1));
        window.record();
        window.record();
        assert_eq!(window.pending(), 2);
        assert_eq!(window.take(), 2);
        assert_eq!(window.pending(), 0);
        assert_eq!(window.take(), 0);
    }

    #[test]
    fn test_recorder_shares_window() {
        let window = Arc::new(SampleWindow::new(Duration::from_secs(1)));
        let a = EventRecorder::new(window.clone());
        let b = a.clone();
        a.record_event();
        b.record_event();
        b.record_event();
        assert_eq!(window.take(), 3);
    }
}
