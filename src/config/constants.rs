//! Configuration constants.
//!
//! This module defines the operational parameters used throughout the probe engine,
//! including recursion bounds, concurrency limits and network timeouts.

use std::time::Duration;

/// Maximum recursion depth beyond the root query for CNAME/MX/NS chains.
///
/// The root query runs at depth 0, so alias targets are followed at depths 1 and 2.
pub const MAX_RECURSION_DEPTH: usize = 2;

/// Maximum number of reverse (PTR) lookups in flight at any instant.
pub const PTR_WORKERS: usize = 5;

/// EDNS(0) UDP payload size advertised on every query.
pub const EDNS_BUFFER_SIZE: u16 = 4096;

/// Timeout for each individual network operation, in seconds.
///
/// Applies independently to the forward query send/receive and to reverse lookups.
pub const DNS_TIMEOUT_SECS: u64 = 3;

/// Resolver used when none is configured.
pub const DEFAULT_RESOLVER: &str = "8.8.8.8:53";

/// Number of domains probed in parallel when not configured.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Entries kept per address cache before least-recently-used eviction kicks in.
pub const DEFAULT_CACHE_CAPACITY: usize = 65_536;

/// Upper bound on a single domain's probe.
///
/// Eight record types with up to two levels of A/AAAA expansion each, every step
/// bounded by `DNS_TIMEOUT_SECS`, plus reverse lookups queued behind the PTR limiter.
pub const DOMAIN_PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Progress logging interval in seconds.
pub const LOGGING_INTERVAL: u64 = 5;

/// Environment variable pointing at the GeoLite2 database directory.
pub const GEOLITE2_PATH_ENV: &str = "GEOLITE2_PATH";

/// GeoLite2 database file names, looked up inside the configured directory.
pub const GEOLITE2_COUNTRY_DB: &str = "GeoLite2-Country.mmdb";
pub const GEOLITE2_CITY_DB: &str = "GeoLite2-City.mmdb";
pub const GEOLITE2_ASN_DB: &str = "GeoLite2-ASN.mmdb";

/// Label used for any geo/ASN field the databases cannot answer.
pub const UNKNOWN_LABEL: &str = "Unknown";
