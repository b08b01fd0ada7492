//! Query orchestrator.
//!
//! Probing a domain spawns one task per entry of `RECORD_TYPES`. Each task
//! runs the recursive resolver at depth 0 and merges its outcome into an
//! [`Aggregation`] shared by the tasks of that probe only. A failing record
//! type is logged and contributes nothing; it never aborts its siblings.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{error, warn};
use serde::Serialize;

use crate::dns::RECORD_TYPES;
use crate::error_handling::ProcessingStats;
use crate::resolver::{RecursiveResolver, Resolution, ResolvedRecord};
use crate::stats::QueryStatistics;

/// Outcome of probing one domain.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProbeResult {
    /// Records keyed by each row's own type. Every type whose query
    /// succeeded has an entry, empty when it produced no rows of that type.
    pub by_type: BTreeMap<String, Vec<ResolvedRecord>>,
    /// Domain-level statistics merged across record types.
    pub stats: QueryStatistics,
}

impl ProbeResult {
    /// True when at least one record type produced records.
    pub fn has_records(&self) -> bool {
        self.by_type.values().any(|records| !records.is_empty())
    }

    /// Total number of top-level records across all types.
    pub fn record_count(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }
}

/// Merge point for the per-type tasks of one probe.
///
/// The result map and the statistics accumulator are updated together under
/// one lock so no task observes or writes a half-merged state.
#[derive(Default)]
pub struct Aggregation {
    state: Mutex<ProbeResult>,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds in the outcome of the `type_name` query.
    ///
    /// Rows are filed under their own type, so a CNAME row answering an A
    /// query lands in `by_type["CNAME"]`.
    pub fn record(&self, type_name: &str, resolution: Resolution) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.stats.merge(&resolution.statistics);
        state.by_type.entry(type_name.to_string()).or_default();
        for record in resolution.records {
            state
                .by_type
                .entry(record.record_type.clone())
                .or_default()
                .push(record);
        }
    }

    /// Takes the merged result, leaving an empty aggregation behind.
    pub fn take(&self) -> ProbeResult {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut *state)
    }
}

/// Shared resources handed to every probe.
#[derive(Clone)]
pub struct ProbeContext {
    pub resolver: Arc<RecursiveResolver>,
    pub stats: Arc<ProcessingStats>,
}

impl ProbeContext {
    pub fn new(resolver: Arc<RecursiveResolver>, stats: Arc<ProcessingStats>) -> Self {
        Self { resolver, stats }
    }
}

/// Probes domains across every configured record type.
#[derive(Clone)]
pub struct Prober {
    context: ProbeContext,
}

impl Prober {
    pub fn new(context: ProbeContext) -> Self {
        Self { context }
    }

    pub fn stats(&self) -> &Arc<ProcessingStats> {
        &self.context.stats
    }

    /// Probes `domain` and waits for every record type to finish.
    ///
    /// Never fails: query errors are logged, counted and leave their record
    /// type out of `by_type`. Tasks that panic are logged the same way.
    pub async fn probe(&self, domain: &str) -> ProbeResult {
        let aggregation = Arc::new(Aggregation::new());
        let mut tasks = FuturesUnordered::new();

        for spec in RECORD_TYPES {
            let resolver = Arc::clone(&self.context.resolver);
            let stats = Arc::clone(&self.context.stats);
            let aggregation = Arc::clone(&aggregation);
            let domain = domain.to_string();

            tasks.push(tokio::spawn(async move {
                match resolver.resolve(&domain, spec.record_type, 0).await {
                    Ok(resolution) => aggregation.record(spec.name, resolution),
                    Err(e) => {
                        warn!("{} query for {} failed: {}", spec.name, domain, e);
                        stats.increment_error(e.error_type());
                    }
                }
            }));
        }

        while let Some(task_result) = tasks.next().await {
            if let Err(join_error) = task_result {
                error!("Probe task for {} panicked: {:?}", domain, join_error);
            }
        }

        aggregation.take()
    }
}
