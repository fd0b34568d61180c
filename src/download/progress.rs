//! Caller-owned progress handle for a single download.
//!
//! The stop flag is the only field meant for concurrent writes: it lives behind
//! an `Arc<AtomicBool>` that the caller hands out through [`StopHandle`]. The
//! percentage fields are plain data mutated by the download loop through the
//! `&mut DownloadProgress` it is given.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable, thread-safe handle used to request that a transfer stop.
///
/// Once requested, the stop stays requested; the download loop never clears it.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests a stop. Safe to call from any thread or task.
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns true once a stop has been requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Progress of one download attempt.
#[derive(Debug, Default)]
pub struct DownloadProgress {
    stop: StopHandle,
    /// Whether the response declared its total size.
    pub knows_percent: bool,
    /// Fraction complete in `[0, 1]`, rounded to two decimals.
    /// Only meaningful while `knows_percent` is true.
    pub percent: f64,
    /// Bytes relayed to disk so far.
    pub bytes_written: u64,
    /// Declared total size, when known.
    pub total_bytes: Option<u64>,
}

impl DownloadProgress {
    /// Creates a fresh progress handle with no stop requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a progress handle that observes an existing stop handle.
    #[must_use]
    pub fn with_stop_handle(stop: StopHandle) -> Self {
        Self {
            stop,
            ..Self::default()
        }
    }

    /// Returns a handle that can request a stop from another task or thread.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Returns true once a stop has been requested.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop.is_stop_requested()
    }

    /// Requests a stop on this transfer.
    pub fn request_stop(&self) {
        self.stop.request_stop();
    }

    /// Records `written` accumulated bytes against the declared total.
    ///
    /// Without a total, `knows_percent` is cleared and `percent` is left as is.
    pub(crate) fn record(&mut self, written: u64, total: Option<u64>) {
        self.bytes_written = written;
        self.total_bytes = total;
        match total {
            Some(total) => {
                self.knows_percent = true;
                self.percent = fraction_rounded(written, total);
            }
            None => self.knows_percent = false,
        }
    }
}

/// `written / total` clamped to `[0, 1]` and rounded to two decimals.
///
/// A zero total counts as complete.
#[allow(clippy::cast_precision_loss)]
fn fraction_rounded(written: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    let fraction = (written as f64 / total as f64).clamp(0.0, 1.0);
    (fraction * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_progress_has_no_stop_and_unknown_percent() {
        let progress = DownloadProgress::new();
        assert!(!progress.should_stop());
        assert!(!progress.knows_percent);
        assert!(progress.percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_stop_handle_is_shared() {
        let progress = DownloadProgress::new();
        let handle = progress.stop_handle();
        handle.request_stop();
        assert!(progress.should_stop());
        // Requesting twice is harmless and the flag stays set.
        handle.request_stop();
        assert!(progress.should_stop());
    }

    #[test]
    fn test_stop_handle_from_other_thread() {
        let progress = DownloadProgress::new();
        let handle = progress.stop_handle();
        std::thread::spawn(move || handle.request_stop())
            .join()
            .unwrap();
        assert!(progress.should_stop());
    }

    #[test]
    fn test_with_stop_handle_observes_existing_flag() {
        let stop = StopHandle::default();
        let progress = DownloadProgress::with_stop_handle(stop.clone());
        assert!(!progress.should_stop());
        stop.request_stop();
        assert!(progress.should_stop());
    }

    #[test]
    fn test_record_with_total_rounds_to_two_decimals() {
        let mut progress = DownloadProgress::new();
        progress.record(1, Some(3));
        assert!(progress.knows_percent);
        assert!((progress.percent - 0.33).abs() < 1e-9);
        assert_eq!(progress.bytes_written, 1);
        assert_eq!(progress.total_bytes, Some(3));
    }

    #[test]
    fn test_record_clamps_overshoot() {
        let mut progress = DownloadProgress::new();
        progress.record(150, Some(100));
        assert!((progress.percent - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_without_total_leaves_percent_unchanged() {
        let mut progress = DownloadProgress::new();
        progress.percent = 0.42;
        progress.knows_percent = true;
        progress.record(10, None);
        assert!(!progress.knows_percent);
        assert!((progress.percent - 0.42).abs() < f64::EPSILON);
        assert_eq!(progress.bytes_written, 10);
    }

    #[test]
    fn test_fraction_zero_total_is_complete() {
        assert!((fraction_rounded(0, 0) - 1.0).abs() < f64::EPSILON);
    }
}
