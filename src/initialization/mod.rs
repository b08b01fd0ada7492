//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - Logger
//! - Semaphores for the domain worker pool and the PTR limiter
//! - Reverse resolver, GeoIP databases and the probe pipeline built on them

mod logger;
mod resolver;

use std::sync::Arc;
use std::time::Duration;

use log::info;
use tokio::sync::Semaphore;

use crate::config::{Config, GEOLITE2_PATH_ENV};
use crate::dns::{HickoryReverseLookup, UdpDnsClient};
use crate::enrichment::Enricher;
use crate::error_handling::ProcessingStats;
use crate::geoip::MaxMindGeoLookup;
use crate::probe::{ProbeContext, Prober};
use crate::resolver::RecursiveResolver;

// Re-export public API
pub use logger::init_logger_with;
pub use resolver::init_reverse_resolver;

/// Initializes a semaphore for controlling concurrency.
///
/// Used both for the domain worker pool and for the reverse-lookup limiter.
/// A count of zero is raised to one so the gate can never deadlock.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count.max(1)))
}

/// Opens the GeoLite2 databases from `config.geoip_dir`, if configured.
pub fn init_geoip(config: &Config) -> MaxMindGeoLookup {
    match config.geoip_dir.as_deref() {
        Some(dir) => {
            let geo = MaxMindGeoLookup::open(dir);
            if !geo.is_enabled() {
                log::warn!(
                    "No GeoLite2 database could be loaded from {}; geo fields will be Unknown",
                    dir.display()
                );
            }
            geo
        }
        None => {
            info!(
                "No GeoLite2 directory configured (--geoip-dir or {}); geo fields will be Unknown",
                GEOLITE2_PATH_ENV
            );
            MaxMindGeoLookup::disabled()
        }
    }
}

/// Builds the full probe pipeline from configuration.
///
/// Wires the UDP query client, the hickory-backed reverse lookup, the GeoIP
/// databases, the enricher (with its caches and PTR limiter) and the
/// recursive resolver into one `Prober`.
pub fn init_prober(config: &Config, stats: Arc<ProcessingStats>) -> Prober {
    let timeout = Duration::from_secs(config.dns_timeout_secs);

    let client = Arc::new(UdpDnsClient::new(config.resolver, timeout));
    let reverse = Arc::new(HickoryReverseLookup::new(init_reverse_resolver(timeout)));
    let geo = Arc::new(init_geoip(config));

    let enricher = Arc::new(Enricher::new(
        geo,
        reverse,
        init_semaphore(config.ptr_concurrency),
        config.cache_capacity,
        timeout,
        Arc::clone(&stats),
    ));
    let resolver = Arc::new(RecursiveResolver::new(
        client,
        enricher,
        Arc::clone(&stats),
        config.max_depth,
    ));

    info!(
        "Probing via {} (max depth {}, {} PTR workers, {}s timeout)",
        config.resolver, config.max_depth, config.ptr_concurrency, config.dns_timeout_secs
    );

    Prober::new(ProbeContext::new(resolver, stats))
}
