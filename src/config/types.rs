//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_CONCURRENCY, DEFAULT_RESOLVER, DNS_TIMEOUT_SECS,
    MAX_RECURSION_DEPTH, PTR_WORKERS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use dns_probe::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("domains.txt"),
///     max_concurrency: 20,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read domains from (`-` for stdin)
    pub file: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Resolver endpoint every query is sent to
    pub resolver: SocketAddr,

    /// Maximum number of domains probed in parallel
    pub max_concurrency: usize,

    /// Recursion bound for CNAME/MX/NS expansion (beyond the root query)
    pub max_depth: usize,

    /// Maximum number of reverse lookups in flight
    pub ptr_concurrency: usize,

    /// Per-operation network timeout in seconds
    pub dns_timeout_secs: u64,

    /// Capacity of each address cache
    pub cache_capacity: usize,

    /// Directory holding the GeoLite2 Country/City/ASN databases
    pub geoip_dir: Option<PathBuf>,

    /// JSON Lines output path (stdout when `None`)
    pub output: Option<PathBuf>,

    /// Print a human-readable record tree per domain to stderr
    pub print_tree: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("domains.txt"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            resolver: DEFAULT_RESOLVER
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([8, 8, 8, 8], 53))),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_depth: MAX_RECURSION_DEPTH,
            ptr_concurrency: PTR_WORKERS,
            dns_timeout_secs: DNS_TIMEOUT_SECS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            geoip_dir: None,
            output: None,
            print_tree: false,
        }
    }
}

/// Command-line options.
///
/// ```bash
/// dns_probe domains.txt --resolver 1.1.1.1:53 --geoip-dir ./geolite2 --output results.jsonl
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "dns_probe",
    about = "Probes domains for DNS health and records enriched results."
)]
pub struct Opt {
    /// Domain list (`name` or `name,prefix` per line; `-` reads stdin)
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Resolver address (ip:port)
    #[arg(long, default_value = DEFAULT_RESOLVER)]
    pub resolver: SocketAddr,

    /// Maximum number of domains probed in parallel
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Maximum recursion depth for CNAME/MX/NS targets
    #[arg(long, default_value_t = MAX_RECURSION_DEPTH)]
    pub max_depth: usize,

    /// Maximum number of reverse (PTR) lookups in flight
    #[arg(long, default_value_t = PTR_WORKERS)]
    pub ptr_concurrency: usize,

    /// Per-operation DNS timeout in seconds
    #[arg(long, default_value_t = DNS_TIMEOUT_SECS)]
    pub dns_timeout_secs: u64,

    /// Entries kept per address cache (geo and PTR)
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,

    /// Directory containing GeoLite2-Country/City/ASN .mmdb files
    ///
    /// Falls back to the GEOLITE2_PATH environment variable. Without either,
    /// every geo and ASN field is reported as "Unknown".
    #[arg(long, env = "GEOLITE2_PATH")]
    pub geoip_dir: Option<PathBuf>,

    /// Write JSON Lines results here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print each domain's record tree to stderr
    #[arg(long)]
    pub print_tree: bool,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            file: opt.file,
            log_level: opt.log_level,
            log_format: opt.log_format,
            resolver: opt.resolver,
            max_concurrency: opt.max_concurrency,
            max_depth: opt.max_depth,
            ptr_concurrency: opt.ptr_concurrency,
            dns_timeout_secs: opt.dns_timeout_secs,
            cache_capacity: opt.cache_capacity,
            geoip_dir: opt.geoip_dir,
            output: opt.output,
            print_tree: opt.print_tree,
        }
    }
}
