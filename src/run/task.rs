//! Per-domain task processing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedSemaphorePermit;

use crate::config::DOMAIN_PROBE_TIMEOUT;
use crate::error_handling::ErrorType;
use crate::probe::Prober;

use super::render::render_tree;
use super::sink::{DomainReport, JsonlSink, ProbeStatus};
use super::source::DomainEntry;

/// Everything one spawned domain task needs.
pub struct DomainTaskParams {
    pub entry: DomainEntry,
    pub prober: Prober,
    pub sink: Arc<Mutex<JsonlSink>>,
    /// Semaphore permit (dropped when the task completes)
    pub permit: OwnedSemaphorePermit,
    pub completed: Arc<AtomicUsize>,
    pub failed: Arc<AtomicUsize>,
    pub print_tree: bool,
}

/// Probes one domain under `DOMAIN_PROBE_TIMEOUT` and writes its report.
pub async fn process_domain_task(params: DomainTaskParams) {
    let DomainTaskParams {
        entry,
        prober,
        sink,
        permit: _permit,
        completed,
        failed,
        print_tree,
    } = params;

    let domain = entry.full_name();
    let report = match tokio::time::timeout(DOMAIN_PROBE_TIMEOUT, prober.probe(&domain)).await {
        Ok(result) => {
            if print_tree {
                eprint!("{}", render_tree(&domain, &result));
            }
            DomainReport::from_probe(&entry, result)
        }
        Err(_) => {
            log::warn!(
                "Probe of {} timed out after {}s",
                domain,
                DOMAIN_PROBE_TIMEOUT.as_secs()
            );
            prober.stats().increment_error(ErrorType::DomainProbeTimeout);
            DomainReport::failed(&entry)
        }
    };

    match report.status {
        ProbeStatus::Success => completed.fetch_add(1, Ordering::SeqCst),
        ProbeStatus::Failure => failed.fetch_add(1, Ordering::SeqCst),
    };

    let mut sink = match sink.lock() {
        Ok(sink) => sink,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Err(e) = sink.write(&report) {
        log::error!("Failed to write result for {}: {}", domain, e);
    }
}
