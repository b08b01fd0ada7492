// Shared stub collaborators for the integration tests.
//
// Nothing here touches the network: DNS answers, geo data and reverse names
// all come from in-memory tables.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::rdata::{A, CNAME};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use tokio::sync::Semaphore;

use dns_probe::dns::{DnsQuery, DnsResponse, ReverseLookup};
use dns_probe::enrichment::Enricher;
use dns_probe::error_handling::{ProcessingStats, QueryError};
use dns_probe::geoip::{AsnMatch, CityMatch, GeoLookup};
use dns_probe::{ProbeContext, Prober, RecursiveResolver};

enum Canned {
    Answer(Vec<Record>, ResponseCode),
    Fail,
}

/// DNS stub answering from a `(name, type)` table; unknown pairs get an
/// empty NOERROR response.
#[derive(Default)]
pub struct StubDns {
    answers: HashMap<(String, RecordType), Canned>,
    queried: Mutex<Vec<(String, RecordType)>>,
}

#[allow(dead_code)]
impl StubDns {
    pub fn answer(self, name: &str, record_type: RecordType, records: Vec<Record>) -> Self {
        self.answer_with_code(name, record_type, records, ResponseCode::NoError)
    }

    pub fn answer_with_code(
        mut self,
        name: &str,
        record_type: RecordType,
        records: Vec<Record>,
        code: ResponseCode,
    ) -> Self {
        self.answers
            .insert((name.to_string(), record_type), Canned::Answer(records, code));
        self
    }

    pub fn fail(mut self, name: &str, record_type: RecordType) -> Self {
        self.answers.insert((name.to_string(), record_type), Canned::Fail);
        self
    }

    pub fn queried(&self) -> Vec<(String, RecordType)> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsQuery for StubDns {
    async fn query(&self, name: &str, record_type: RecordType) -> Result<DnsResponse, QueryError> {
        let name = name.trim_end_matches('.').to_string();
        self.queried.lock().unwrap().push((name.clone(), record_type));
        match self.answers.get(&(name.clone(), record_type)) {
            Some(Canned::Answer(records, code)) => Ok(DnsResponse::new(records.clone(), *code)),
            Some(Canned::Fail) => Err(QueryError::Timeout {
                name,
                timeout: Duration::from_secs(3),
            }),
            None => Ok(DnsResponse::new(Vec::new(), ResponseCode::NoError)),
        }
    }
}

/// Geo stub that counts how often each database is consulted.
pub struct CountingGeo {
    pub organization: &'static str,
    pub lookups: AtomicUsize,
}

#[allow(dead_code)]
impl CountingGeo {
    pub fn new(organization: &'static str) -> Self {
        Self {
            organization,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl GeoLookup for CountingGeo {
    fn country(&self, _ip: IpAddr) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Some("United States".to_string())
    }

    fn city(&self, _ip: IpAddr) -> Option<CityMatch> {
        Some(CityMatch {
            city: Some("Norwell".to_string()),
            country: None,
        })
    }

    fn asn(&self, _ip: IpAddr) -> Option<AsnMatch> {
        Some(AsnMatch {
            number: 15133,
            organization: self.organization.to_string(),
        })
    }
}

/// Reverse stub that records how many lookups overlap in time.
pub struct TrackingReverse {
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl TrackingReverse {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReverseLookup for TrackingReverse {
    async fn reverse_lookup(&self, ip: IpAddr) -> Result<Vec<String>, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let host = ip.to_string().replace('.', "-");
        Ok(vec![
            format!("{host}.example.net."),
            format!("{host}.alias.example.net."),
        ])
    }
}

#[allow(dead_code)]
pub fn owner(name: &str) -> Name {
    Name::from_str(&format!("{name}.")).unwrap()
}

#[allow(dead_code)]
pub fn a_record(name: &str, ip: Ipv4Addr, ttl: u32) -> Record {
    Record::from_rdata(owner(name), ttl, RData::A(A(ip)))
}

#[allow(dead_code)]
pub fn cname_record(name: &str, target: &str, ttl: u32) -> Record {
    Record::from_rdata(owner(name), ttl, RData::CNAME(CNAME(owner(target))))
}

#[allow(dead_code)]
pub fn enricher(
    geo: Arc<dyn GeoLookup>,
    reverse: Arc<dyn ReverseLookup>,
    ptr_workers: usize,
) -> (Arc<Enricher>, Arc<ProcessingStats>) {
    let stats = Arc::new(ProcessingStats::new());
    let enricher = Arc::new(Enricher::new(
        geo,
        reverse,
        Arc::new(Semaphore::new(ptr_workers)),
        1024,
        Duration::from_secs(2),
        Arc::clone(&stats),
    ));
    (enricher, stats)
}

#[allow(dead_code)]
pub fn prober(
    dns: Arc<dyn DnsQuery>,
    geo: Arc<dyn GeoLookup>,
    reverse: Arc<dyn ReverseLookup>,
) -> (Prober, Arc<ProcessingStats>) {
    let (enricher, stats) = enricher(geo, reverse, 5);
    let resolver = Arc::new(RecursiveResolver::new(dns, enricher, Arc::clone(&stats), 2));
    (Prober::new(ProbeContext::new(resolver, Arc::clone(&stats))), stats)
}
