//! TTL and latency statistics.
//!
//! Pure aggregation logic with no I/O. A `QueryStatistics` summarises the
//! direct answer rows of one query; domain-level figures are obtained by
//! merging the per-record-type summaries.

use std::time::Duration;

use serde::Serialize;

use crate::utils::serialize_duration_micros;

/// Summary over the answer rows of one query (or, once merged, of one domain).
///
/// Durations serialize as integer microseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryStatistics {
    pub min_ttl: u32,
    pub max_ttl: u32,
    pub avg_ttl: f64,
    #[serde(serialize_with = "serialize_duration_micros")]
    pub min_latency: Duration,
    #[serde(serialize_with = "serialize_duration_micros")]
    pub max_latency: Duration,
    #[serde(serialize_with = "serialize_duration_micros")]
    pub avg_latency: Duration,
    /// Sum of per-row durations.
    #[serde(serialize_with = "serialize_duration_micros")]
    pub total_latency: Duration,
    /// Number of answer rows summarised.
    pub answers: usize,
    /// Raw TTL sum, carried so merged averages stay exact.
    pub ttl_sum: u64,
    /// Network round trip of the query (summed when merged).
    #[serde(serialize_with = "serialize_duration_micros")]
    pub round_trip: Duration,
}

impl QueryStatistics {
    /// Computes statistics from per-row TTLs and per-row durations.
    ///
    /// Empty input yields the zero value rather than an error.
    pub fn from_rows(ttls: &[u32], durations: &[Duration]) -> Self {
        let mut stats = QueryStatistics::default();

        if let (Some(&min_ttl), Some(&max_ttl)) = (ttls.iter().min(), ttls.iter().max()) {
            let ttl_sum: u64 = ttls.iter().map(|&ttl| u64::from(ttl)).sum();
            stats.min_ttl = min_ttl;
            stats.max_ttl = max_ttl;
            stats.ttl_sum = ttl_sum;
            stats.answers = ttls.len();
            stats.avg_ttl = ttl_sum as f64 / ttls.len() as f64;
        }

        if let (Some(&min_latency), Some(&max_latency)) =
            (durations.iter().min(), durations.iter().max())
        {
            let total: Duration = durations.iter().sum();
            stats.min_latency = min_latency;
            stats.max_latency = max_latency;
            stats.total_latency = total;
            stats.avg_latency = average(total, durations.len());
        }

        stats
    }

    /// Records the network round trip for this query.
    pub fn with_round_trip(mut self, round_trip: Duration) -> Self {
        self.round_trip = round_trip;
        self
    }

    /// True when no answer rows were summarised.
    pub fn is_empty(&self) -> bool {
        self.answers == 0
    }

    /// Folds another summary into this one.
    ///
    /// TTL extremes and latency extremes are taken across both sides; latency
    /// totals and round trips are additive. The TTL average is recomputed from
    /// the raw sums so that merging per-type averages loses no precision.
    /// Summaries with no answers only contribute their round trip.
    pub fn merge(&mut self, other: &QueryStatistics) {
        self.round_trip += other.round_trip;
        if other.is_empty() {
            return;
        }

        if self.is_empty() {
            self.min_ttl = other.min_ttl;
            self.max_ttl = other.max_ttl;
            self.min_latency = other.min_latency;
            self.max_latency = other.max_latency;
        } else {
            self.min_ttl = self.min_ttl.min(other.min_ttl);
            self.max_ttl = self.max_ttl.max(other.max_ttl);
            self.min_latency = self.min_latency.min(other.min_latency);
            self.max_latency = self.max_latency.max(other.max_latency);
        }

        self.answers += other.answers;
        self.ttl_sum += other.ttl_sum;
        self.total_latency += other.total_latency;
        self.avg_ttl = self.ttl_sum as f64 / self.answers as f64;
        self.avg_latency = average(self.total_latency, self.answers);
    }
}

fn average(total: Duration, count: usize) -> Duration {
    match u32::try_from(count) {
        Ok(0) => Duration::ZERO,
        Ok(count) => total / count,
        Err(_) => Duration::from_secs_f64(total.as_secs_f64() / count as f64),
    }
}
