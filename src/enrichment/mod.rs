//! Enrichment pipeline for resolved addresses.
//!
//! Every A/AAAA row, at any recursion depth, passes through [`Enricher::enrich`]:
//! 1. Geo/ASN bundle lookup (cached per IP)
//! 2. CDN classification from the ASN label and the probed domain
//! 3. Reverse PTR lookup (cached per IP, gated by the PTR limiter)
//! 4. Hijack heuristic
//!
//! Lookup misses are never errors; they resolve to `"Unknown"` or an empty PTR.

pub mod cdn;
pub mod hijack;

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::cache::AddressCache;
use crate::dns::{DnsResponse, ReverseLookup};
use crate::error_handling::{ErrorType, InfoType, ProcessingStats};
use crate::geoip::{GeoBundle, GeoLookup};

pub use cdn::{classify, ProviderType, CDN_PROVIDERS};

/// Data attached to one resolved address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub geo: GeoBundle,
    pub provider_type: ProviderType,
    pub reverse_ptr: String,
    pub hijack_suspected: bool,
}

/// Shared enrichment state: lookup capabilities, the two address caches and
/// the reverse-lookup limiter.
///
/// One `Enricher` is shared by every probe task in the process; all methods
/// take `&self` and are safe to call concurrently.
pub struct Enricher {
    geo: Arc<dyn GeoLookup>,
    reverse: Arc<dyn ReverseLookup>,
    geo_cache: AddressCache<String, GeoBundle>,
    ptr_cache: AddressCache<String, String>,
    ptr_limiter: Arc<Semaphore>,
    timeout: Duration,
    stats: Arc<ProcessingStats>,
}

impl Enricher {
    /// Creates an enricher.
    ///
    /// # Arguments
    ///
    /// * `geo` - Geo/ASN capability
    /// * `reverse` - Reverse-name capability
    /// * `ptr_limiter` - Semaphore bounding reverse lookups in flight
    /// * `cache_capacity` - Entries kept per address cache
    /// * `timeout` - Per reverse lookup timeout
    /// * `stats` - Counters for cache hits, lookup failures and hijack flags
    pub fn new(
        geo: Arc<dyn GeoLookup>,
        reverse: Arc<dyn ReverseLookup>,
        ptr_limiter: Arc<Semaphore>,
        cache_capacity: usize,
        timeout: Duration,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            geo,
            reverse,
            geo_cache: AddressCache::new(cache_capacity),
            ptr_cache: AddressCache::new(cache_capacity),
            ptr_limiter,
            timeout,
            stats,
        }
    }

    /// Returns the geo bundle for `ip`, consulting the databases only on a cache miss.
    pub fn geo(&self, ip: IpAddr) -> GeoBundle {
        let key = ip.to_string();
        if let Some(bundle) = self.geo_cache.get(&key) {
            log::trace!("Geo cache hit for {}", key);
            self.stats.increment_info(InfoType::GeoCacheHit);
            return bundle;
        }

        let bundle = GeoBundle::lookup(self.geo.as_ref(), ip);
        self.geo_cache.insert_if_absent(key, bundle)
    }

    /// Returns the comma-joined PTR names for `ip`.
    ///
    /// On a cache miss, waits for a limiter slot and performs the reverse
    /// lookup under the configured timeout. Failures and empty answers yield
    /// an empty string, which is cached like any other result.
    pub async fn reverse_ptr(&self, ip: IpAddr) -> String {
        let key = ip.to_string();
        if let Some(ptr) = self.ptr_cache.get(&key) {
            log::trace!("PTR cache hit for {}", key);
            self.stats.increment_info(InfoType::PtrCacheHit);
            return ptr;
        }

        let ptr = {
            let _permit = match self.ptr_limiter.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    log::warn!("PTR limiter closed, skipping reverse lookup for {}: {}", key, e);
                    return String::new();
                }
            };

            match tokio::time::timeout(self.timeout, self.reverse.reverse_lookup(ip)).await {
                Ok(Ok(names)) => names.join(","),
                Ok(Err(e)) => {
                    log::debug!("Reverse lookup for {} failed: {}", key, e);
                    self.stats.increment_error(ErrorType::ReverseLookupError);
                    String::new()
                }
                Err(_) => {
                    log::debug!("Reverse lookup for {} timed out after {:?}", key, self.timeout);
                    self.stats.increment_error(ErrorType::ReverseLookupError);
                    String::new()
                }
            }
        };

        self.ptr_cache.insert_if_absent(key, ptr)
    }

    /// Runs the full pipeline for one address row.
    ///
    /// `response` is the message the row came from; its response code and
    /// answer count feed the hijack heuristic.
    pub async fn enrich(
        &self,
        ip: IpAddr,
        ttl: u32,
        response: &DnsResponse,
        domain: &str,
    ) -> Enrichment {
        let geo = self.geo(ip);
        let provider_type = classify(&geo.asn, domain);
        let reverse_ptr = self.reverse_ptr(ip).await;
        let hijack_suspected =
            hijack::is_suspected(ip, response.response_code, response.answers.len(), ttl);
        if hijack_suspected {
            log::debug!("Possible hijack: {} resolved to {} (ttl {})", domain, ip, ttl);
            self.stats.increment_info(InfoType::HijackSuspected);
        }

        Enrichment {
            geo,
            provider_type,
            reverse_ptr,
            hijack_suspected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::QueryError;
    use crate::geoip::{AsnMatch, CityMatch};
    use async_trait::async_trait;
    use hickory_proto::op::ResponseCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CloudflareGeo;

    impl GeoLookup for CloudflareGeo {
        fn country(&self, _ip: IpAddr) -> Option<String> {
            Some("United States".to_string())
        }
        fn city(&self, _ip: IpAddr) -> Option<CityMatch> {
            None
        }
        fn asn(&self, _ip: IpAddr) -> Option<AsnMatch> {
            Some(AsnMatch {
                number: 13335,
                organization: "Cloudflare, Inc.".to_string(),
            })
        }
    }

    struct FailingReverse {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReverseLookup for FailingReverse {
        async fn reverse_lookup(&self, ip: IpAddr) -> Result<Vec<String>, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(QueryError::Resolve {
                target: ip.to_string(),
                message: "no records found".to_string(),
            })
        }
    }

    struct SlowReverse;

    #[async_trait]
    impl ReverseLookup for SlowReverse {
        async fn reverse_lookup(&self, _ip: IpAddr) -> Result<Vec<String>, QueryError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec!["late.example.".to_string()])
        }
    }

    fn enricher(reverse: Arc<dyn ReverseLookup>, timeout: Duration) -> (Enricher, Arc<ProcessingStats>) {
        let stats = Arc::new(ProcessingStats::new());
        let enricher = Enricher::new(
            Arc::new(CloudflareGeo),
            reverse,
            Arc::new(Semaphore::new(5)),
            16,
            timeout,
            Arc::clone(&stats),
        );
        (enricher, stats)
    }

    #[tokio::test]
    async fn test_failed_reverse_lookup_caches_empty_string() {
        let reverse = Arc::new(FailingReverse {
            calls: AtomicUsize::new(0),
        });
        let (enricher, stats) = enricher(reverse.clone(), Duration::from_secs(1));
        let ip: IpAddr = "1.1.1.1".parse().unwrap();

        assert_eq!(enricher.reverse_ptr(ip).await, "");
        assert_eq!(enricher.reverse_ptr(ip).await, "");
        assert_eq!(reverse.calls.load(Ordering::SeqCst), 1);
        assert_eq!(stats.get_error_count(ErrorType::ReverseLookupError), 1);
        assert_eq!(stats.get_info_count(InfoType::PtrCacheHit), 1);
    }

    #[tokio::test]
    async fn test_reverse_lookup_timeout_yields_empty() {
        let (enricher, stats) = enricher(Arc::new(SlowReverse), Duration::from_millis(100));
        let ip: IpAddr = "1.1.1.1".parse().unwrap();

        assert_eq!(enricher.reverse_ptr(ip).await, "");
        assert_eq!(stats.get_error_count(ErrorType::ReverseLookupError), 1);
    }

    #[tokio::test]
    async fn test_enrich_classifies_cdn_and_flags_private() {
        let reverse = Arc::new(FailingReverse {
            calls: AtomicUsize::new(0),
        });
        let (enricher, stats) = enricher(reverse, Duration::from_secs(1));
        let response = DnsResponse::new(Vec::new(), ResponseCode::NoError);

        let enrichment = enricher
            .enrich("10.1.2.3".parse().unwrap(), 300, &response, "example.com")
            .await;

        assert_eq!(enrichment.provider_type, ProviderType::Cdn);
        assert_eq!(enrichment.geo.asn, "AS13335 (Cloudflare, Inc.)");
        assert_eq!(enrichment.geo.isp, "Cloudflare, Inc.");
        assert_eq!(enrichment.geo.city, "Unknown");
        assert!(enrichment.hijack_suspected);
        assert_eq!(stats.get_info_count(InfoType::HijackSuspected), 1);
    }
}
