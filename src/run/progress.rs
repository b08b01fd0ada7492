//! Progress logging.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use log::info;

/// Logs how many domains have been probed so far and the current rate.
pub fn log_progress(start_time: Instant, completed: &AtomicUsize, failed: &AtomicUsize, total: usize) {
    let done = completed.load(Ordering::SeqCst) + failed.load(Ordering::SeqCst);
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        done as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Probed {}/{} domains ({} failed) in {:.2} seconds (~{:.2} domains/sec)",
        done,
        total,
        failed.load(Ordering::SeqCst),
        elapsed_secs,
        rate
    );
}
