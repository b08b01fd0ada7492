//! Recursive resolver.
//!
//! Issues one query per `(domain, record type)`, turns each answer row into a
//! [`ResolvedRecord`], enriches address rows and expands CNAME/MX/NS targets
//! with A and AAAA sub-queries one level deeper. Expansion stops once the
//! depth bound is exceeded.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use hickory_proto::rr::{Record, RecordType};
use log::{debug, trace};
use serde::Serialize;

use crate::dns::{extract_row_value, DnsQuery, DnsResponse, RowValue};
use crate::enrichment::{Enricher, Enrichment, ProviderType};
use crate::error_handling::{ErrorType, InfoType, ProcessingStats, QueryError};
use crate::stats::QueryStatistics;
use crate::utils::serialize_duration_micros;

/// Record types queried for every alias/referral target.
const EXPANSION_TYPES: [RecordType; 2] = [RecordType::A, RecordType::AAAA];

/// One DNS answer row, possibly expanded with the records of its target.
///
/// Geo fields, `provider_type` and `reverse_ptr` are only filled for A/AAAA
/// rows. `children` is only non-empty for CNAME, MX and NS rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
    pub ttl: u32,
    pub dnssec: bool,
    pub asn: String,
    pub country: String,
    pub city: String,
    pub isp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<ProviderType>,
    pub reverse_ptr: String,
    pub hijack_suspected: bool,
    /// Time spent processing this row, enrichment and expansion included.
    #[serde(serialize_with = "serialize_duration_micros")]
    pub query_duration: Duration,
    pub children: Vec<ResolvedRecord>,
}

impl ResolvedRecord {
    fn from_answer(answer: &Record, dnssec: bool) -> Self {
        Self {
            record_type: answer.record_type().to_string(),
            value: String::new(),
            ttl: answer.ttl(),
            dnssec,
            asn: String::new(),
            country: String::new(),
            city: String::new(),
            isp: String::new(),
            provider_type: None,
            reverse_ptr: String::new(),
            hijack_suspected: false,
            query_duration: Duration::ZERO,
            children: Vec::new(),
        }
    }

    fn apply_enrichment(&mut self, enrichment: Enrichment) {
        self.asn = enrichment.geo.asn;
        self.country = enrichment.geo.country;
        self.city = enrichment.geo.city;
        self.isp = enrichment.geo.isp;
        self.provider_type = Some(enrichment.provider_type);
        self.reverse_ptr = enrichment.reverse_ptr;
        self.hijack_suspected = enrichment.hijack_suspected;
    }

    /// Number of levels in this record's subtree, counting itself.
    pub fn tree_depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ResolvedRecord::tree_depth)
            .max()
            .unwrap_or(0)
    }
}

/// Records and statistics produced by one `resolve` call.
///
/// `statistics` only covers this call's direct answer rows, never children.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub records: Vec<ResolvedRecord>,
    pub statistics: QueryStatistics,
}

/// Depth-bounded resolver shared by every per-type task.
pub struct RecursiveResolver {
    client: Arc<dyn DnsQuery>,
    enricher: Arc<Enricher>,
    stats: Arc<ProcessingStats>,
    max_depth: usize,
}

impl RecursiveResolver {
    pub fn new(
        client: Arc<dyn DnsQuery>,
        enricher: Arc<Enricher>,
        stats: Arc<ProcessingStats>,
        max_depth: usize,
    ) -> Self {
        Self {
            client,
            enricher,
            stats,
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolves `domain` for `record_type` at recursion level `depth`.
    ///
    /// The root query runs at depth 0. Once `depth` exceeds the configured
    /// maximum the call returns an empty resolution without querying.
    ///
    /// # Errors
    ///
    /// Returns the `QueryError` of this call's own query. Failures of
    /// recursive sub-queries are absorbed: the affected children are omitted.
    pub fn resolve<'a>(
        &'a self,
        domain: &'a str,
        record_type: RecordType,
        depth: usize,
    ) -> BoxFuture<'a, Result<Resolution, QueryError>> {
        Box::pin(async move {
            if depth > self.max_depth {
                trace!(
                    "Depth limit reached for {} {} at depth {}",
                    domain,
                    record_type,
                    depth
                );
                self.stats.increment_info(InfoType::DepthLimitReached);
                return Ok(Resolution::default());
            }

            let started = Instant::now();
            let response = self.client.query(domain, record_type).await?;
            let round_trip = started.elapsed();

            let dnssec = response.has_signature();
            if dnssec {
                self.stats.increment_info(InfoType::DnssecSigned);
            }

            let mut records = Vec::with_capacity(response.answers.len());
            let mut ttls = Vec::with_capacity(response.answers.len());
            let mut durations = Vec::with_capacity(response.answers.len());

            for answer in &response.answers {
                let row_started = Instant::now();
                let record = self
                    .resolve_row(domain, answer, &response, dnssec, depth)
                    .await;
                let elapsed = row_started.elapsed();

                ttls.push(record.ttl);
                durations.push(elapsed);
                records.push(ResolvedRecord {
                    query_duration: elapsed,
                    ..record
                });
            }

            Ok(Resolution {
                records,
                statistics: QueryStatistics::from_rows(&ttls, &durations)
                    .with_round_trip(round_trip),
            })
        })
    }

    async fn resolve_row(
        &self,
        domain: &str,
        answer: &Record,
        response: &DnsResponse,
        dnssec: bool,
        depth: usize,
    ) -> ResolvedRecord {
        let mut record = ResolvedRecord::from_answer(answer, dnssec);
        let row = extract_row_value(answer);
        record.value = row.display_value();

        match row {
            RowValue::Address(ip) => {
                let enrichment = self.enricher.enrich(ip, record.ttl, response, domain).await;
                record.apply_enrichment(enrichment);
            }
            RowValue::Referral { target, .. } => {
                record.children = self.expand(&target, depth + 1).await;
            }
            RowValue::Text(_) => {}
        }

        record
    }

    /// Resolves A then AAAA for a referral target, one after the other.
    async fn expand(&self, target: &str, depth: usize) -> Vec<ResolvedRecord> {
        let mut children = Vec::new();
        for record_type in EXPANSION_TYPES {
            match self.resolve(target, record_type, depth).await {
                Ok(resolution) => children.extend(resolution.records),
                Err(e) => {
                    debug!(
                        "Omitting {} children of {} at depth {}: {}",
                        record_type, target, depth, e
                    );
                    self.stats.increment_error(ErrorType::RecursiveQueryError);
                }
            }
        }
        children
    }
}
