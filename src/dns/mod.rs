//! DNS query capabilities and answer parsing.
//!
//! This module provides:
//! - The forward query capability (`DnsQuery`) and its UDP implementation
//! - The reverse lookup capability (`ReverseLookup`) backed by `hickory-resolver`
//! - The static table of record types probed per domain
//! - Value extraction for individual answer rows

mod query;
mod record_types;
mod reverse;
mod values;

// Re-export public API
pub use query::{DnsQuery, DnsResponse, UdpDnsClient};
pub use record_types::{RecordTypeSpec, RECORD_TYPES};
pub use reverse::{HickoryReverseLookup, ReverseLookup};
pub use values::{extract_row_value, RowValue};
