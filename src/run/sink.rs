//! JSON Lines result sink.
//!
//! One `DomainReport` per line, written to a file or to stdout.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error_handling::InitializationError;
use crate::probe::ProbeResult;
use crate::resolver::ResolvedRecord;
use crate::stats::QueryStatistics;

use super::source::DomainEntry;

/// Overall outcome for one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// At least one record type produced records
    Success,
    /// Nothing resolved, or the probe timed out
    Failure,
}

/// Serialized result for one domain.
#[derive(Debug, Clone, Serialize)]
pub struct DomainReport {
    pub name: String,
    pub prefix: String,
    pub status: ProbeStatus,
    /// RFC 3339 UTC timestamp of when the probe finished
    pub observed_at: String,
    pub records: BTreeMap<String, Vec<ResolvedRecord>>,
    pub stats: QueryStatistics,
}

impl DomainReport {
    pub fn from_probe(entry: &DomainEntry, result: ProbeResult) -> Self {
        let status = if result.has_records() {
            ProbeStatus::Success
        } else {
            ProbeStatus::Failure
        };
        Self {
            name: entry.name.clone(),
            prefix: entry.prefix.clone(),
            status,
            observed_at: now_rfc3339(),
            records: result.by_type,
            stats: result.stats,
        }
    }

    /// Report for a domain whose probe never completed.
    pub fn failed(entry: &DomainEntry) -> Self {
        Self {
            name: entry.name.clone(),
            prefix: entry.prefix.clone(),
            status: ProbeStatus::Failure,
            observed_at: now_rfc3339(),
            records: BTreeMap::new(),
            stats: QueryStatistics::default(),
        }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Writes one JSON document per line.
pub struct JsonlSink {
    writer: Box<dyn Write + Send>,
}

impl JsonlSink {
    /// Opens `path` for writing (truncating it), or stdout when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::IoError` if the file cannot be created.
    pub fn create(path: Option<&Path>) -> Result<Self, InitializationError> {
        let writer: Box<dyn Write + Send> = match path {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(BufWriter::new(io::stdout())),
        };
        Ok(Self { writer })
    }

    pub fn write(&mut self, report: &DomainReport) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, report)?;
        self.writer.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
