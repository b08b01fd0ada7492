//! dns_probe library: DNS probe and analysis engine
//!
//! For every domain the engine queries A, AAAA, MX, NS, TXT, CNAME, SOA and CAA
//! records concurrently, follows CNAME/MX/NS targets under a depth bound,
//! enriches every resolved address with geolocation, ASN, CDN classification,
//! reverse PTR and a hijack heuristic, and aggregates TTL/latency statistics.
//!
//! # Example
//!
//! ```no_run
//! use dns_probe::{run_probe, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("domains.txt"),
//!     max_concurrency: 20,
//!     ..Default::default()
//! };
//!
//! let report = run_probe(config).await?;
//! println!("Probed {} domains: {} succeeded, {} failed",
//!          report.total, report.succeeded, report.failed);
//! # Ok(())
//! # }
//! ```
//!
//! The engine itself is available without the run loop: build a
//! [`probe::Prober`] from your own [`dns::DnsQuery`], [`geoip::GeoLookup`] and
//! [`dns::ReverseLookup`] implementations and call `probe(domain)`.
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod cache;
pub mod config;
pub mod dns;
pub mod enrichment;
pub mod error_handling;
pub mod geoip;
pub mod initialization;
pub mod probe;
pub mod resolver;
pub mod run;
pub mod stats;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use probe::{ProbeContext, ProbeResult, Prober};
pub use resolver::{RecursiveResolver, ResolvedRecord};
pub use run::{run_probe, ProbeReport};
pub use stats::QueryStatistics;
