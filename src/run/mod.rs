//! Probe run: domain source, worker pool and result sink.
//!
//! Reads the domain list, probes domains through a bounded worker pool and
//! writes one JSON line per domain.

mod progress;
mod render;
mod sink;
mod source;
mod task;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::config::{Config, LOGGING_INTERVAL};
use crate::error_handling::{print_error_statistics, ProcessingStats};
use crate::initialization::{init_prober, init_semaphore};

pub use progress::log_progress;
pub use render::render_tree;
pub use sink::{DomainReport, JsonlSink, ProbeStatus};
pub use source::{read_domains, DomainEntry};
pub use task::{process_domain_task, DomainTaskParams};

/// Summary of a completed probe run.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Number of domains probed
    pub total: usize,
    /// Domains for which at least one record type resolved
    pub succeeded: usize,
    /// Domains with no records or whose probe timed out
    pub failed: usize,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Runs a probe over every domain in `config.file`.
///
/// # Errors
///
/// Returns an error if the domain list or the output sink cannot be opened.
/// Failures of individual domains never abort the run.
///
/// # Example
///
/// ```no_run
/// use dns_probe::{run_probe, Config};
/// use std::path::PathBuf;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config {
///     file: PathBuf::from("domains.txt"),
///     ..Default::default()
/// };
/// let report = run_probe(config).await?;
/// println!("Probed {} domains", report.total);
/// # Ok(())
/// # }
/// ```
pub async fn run_probe(config: Config) -> Result<ProbeReport> {
    let domains = read_domains(&config.file)
        .await
        .context("Failed to read domain list")?;
    let total = domains.len();

    let sink = JsonlSink::create(config.output.as_deref()).context("Failed to open output")?;
    let sink = Arc::new(Mutex::new(sink));

    let error_stats = Arc::new(ProcessingStats::new());
    let prober = init_prober(&config, Arc::clone(&error_stats));
    let semaphore = init_semaphore(config.max_concurrency);

    let start_time = Instant::now();
    let completed = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let cancel = CancellationToken::new();
    let logging_task = {
        let cancel = cancel.child_token();
        let completed = Arc::clone(&completed);
        let failed = Arc::clone(&failed);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL));
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => log_progress(start_time, &completed, &failed, total),
                    _ = cancel.cancelled() => break,
                }
            }
        })
    };

    let mut tasks = FuturesUnordered::new();
    for entry in domains {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Semaphore closed, skipping domain: {}", entry.full_name());
                continue;
            }
        };

        tasks.push(tokio::spawn(process_domain_task(DomainTaskParams {
            entry,
            prober: prober.clone(),
            sink: Arc::clone(&sink),
            permit,
            completed: Arc::clone(&completed),
            failed: Arc::clone(&failed),
            print_tree: config.print_tree,
        })));
    }

    while let Some(task_result) = tasks.next().await {
        if let Err(join_error) = task_result {
            failed.fetch_add(1, Ordering::SeqCst);
            warn!("Domain task panicked: {:?}", join_error);
        }
    }

    cancel.cancel();
    if let Err(e) = logging_task.await {
        warn!("Progress logging task failed: {:?}", e);
    }
    log_progress(start_time, &completed, &failed, total);

    {
        let mut sink = match sink.lock() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };
        sink.flush().context("Failed to flush output")?;
    }

    print_error_statistics(&error_stats);

    let report = ProbeReport {
        total,
        succeeded: completed.load(Ordering::SeqCst),
        failed: failed.load(Ordering::SeqCst),
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    };
    info!(
        "Probe run finished: {} succeeded, {} failed",
        report.succeeded, report.failed
    );
    Ok(report)
}
