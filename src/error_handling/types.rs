//! Error type definitions.
//!
//! This module defines the error and info types used throughout the probe engine.

use std::net::SocketAddr;
use std::time::Duration;

use hickory_proto::error::ProtoError;
use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error opening a GeoLite2 database.
    #[error("GeoIP initialization error: {0}")]
    GeoIpError(String),

    /// Error opening the domain list or output sink.
    #[error("Input/output initialization error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Transport or protocol failure for a single query.
///
/// A `QueryError` only ever affects the record type (or recursive sub-query)
/// that produced it; callers log it and treat the query as having no answers.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The name could not be turned into a DNS name.
    #[error("invalid query name '{name}': {source}")]
    InvalidName {
        name: String,
        #[source]
        source: ProtoError,
    },

    /// The query message could not be serialized.
    #[error("failed to encode query for '{name}': {source}")]
    Encode {
        name: String,
        #[source]
        source: ProtoError,
    },

    /// Socket-level failure talking to the resolver.
    #[error("network error talking to {server}: {source}")]
    Io {
        server: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// No answer arrived within the per-operation timeout.
    #[error("query for '{name}' timed out after {timeout:?}")]
    Timeout { name: String, timeout: Duration },

    /// The resolver replied with bytes that are not a DNS message.
    #[error("malformed response from {server}: {source}")]
    Decode {
        server: SocketAddr,
        #[source]
        source: ProtoError,
    },

    /// A higher-level lookup (reverse resolution) failed.
    #[error("lookup for '{target}' failed: {message}")]
    Resolve { target: String, message: String },
}

impl QueryError {
    /// Maps the error to its statistics bucket.
    pub fn error_type(&self) -> ErrorType {
        match self {
            QueryError::Timeout { .. } => ErrorType::DnsQueryTimeout,
            QueryError::Resolve { .. } => ErrorType::ReverseLookupError,
            _ => ErrorType::DnsQueryError,
        }
    }
}

/// Types of errors that can occur while probing a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// Top-level record type query failed (transport or protocol)
    DnsQueryError,
    /// Top-level record type query timed out
    DnsQueryTimeout,
    /// A CNAME/MX/NS target sub-query failed and was omitted
    RecursiveQueryError,
    /// Reverse lookup failed (recorded as an empty PTR)
    ReverseLookupError,
    /// Whole-domain probe exceeded its time budget
    DomainProbeTimeout,
}

/// Informational metrics collected while probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// Recursion stopped at the depth bound
    DepthLimitReached,
    /// An address row was flagged by the hijack heuristic
    HijackSuspected,
    /// A response carried RRSIG records
    DnssecSigned,
    /// Geo bundle served from cache
    GeoCacheHit,
    /// PTR string served from cache
    PtrCacheHit,
}
