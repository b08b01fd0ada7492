//! Domain list input.
//!
//! One domain per line, either `name` or `name,prefix`. The probed name is
//! `prefix` followed by `name`, so `example.com,www.` probes `www.example.com`.
//! Blank lines and lines starting with `#` are skipped.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// One entry of the domain list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub name: String,
    pub prefix: String,
}

impl DomainEntry {
    /// Parses one input line, returning `None` for blanks and comments.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let (name, prefix) = match trimmed.split_once(',') {
            Some((name, prefix)) => (name.trim(), prefix.trim()),
            None => (trimmed, ""),
        };
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
        })
    }

    /// The name actually queried: prefix followed by the domain.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.prefix, self.name)
    }
}

/// Reads the domain list from `path`, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened. Unreadable lines are
/// logged and skipped.
pub async fn read_domains(path: &Path) -> Result<Vec<DomainEntry>> {
    let domains = if path.as_os_str() == "-" {
        info!("Reading domains from stdin");
        read_entries(BufReader::new(tokio::io::stdin())).await
    } else {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open domain list {}", path.display()))?;
        read_entries(BufReader::new(file)).await
    };

    info!("Total domains in input: {}", domains.len());
    Ok(domains)
}

async fn read_entries<R>(reader: R) -> Vec<DomainEntry>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut entries = Vec::new();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match DomainEntry::parse(&line) {
                Some(entry) => entries.push(entry),
                None => debug!("Skipping line: {:?}", line),
            },
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read line from input: {e}");
                break;
            }
        }
    }
    entries
}
