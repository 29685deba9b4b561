//! Shared helpers for command handlers.

use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tracing::warn;

use wifisafe_core::{NetworkObservation, ScanSource};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Batch files ─────────────────────────────────────────────────────

/// Provenance block of a batch file. Freshness is always recomputed from
/// `captured_at`; a file cannot vouch for its own age.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchMetadata {
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub source: ScanSource,
}

/// Either a bare list of observations or a list with metadata.
///
/// Entries stay untyped here so one unreadable observation cannot sink
/// the whole file; see [`ParsedBatch`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BatchFile {
    WithMetadata {
        #[serde(default)]
        metadata: Option<BatchMetadata>,
        observations: Vec<serde_json::Value>,
    },
    Bare(Vec<serde_json::Value>),
}

/// A batch entry that could not be read as an observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEntry {
    pub ssid: String,
    pub bssid: String,
    pub reason: String,
}

/// A batch file with every entry typed individually, in file order.
#[derive(Debug, Clone)]
pub struct ParsedBatch {
    pub metadata: Option<BatchMetadata>,
    pub entries: Vec<Result<NetworkObservation, MalformedEntry>>,
}

impl ParsedBatch {
    /// Readable observations, the number of unreadable entries, and the
    /// metadata block.
    pub fn into_parts(self) -> (Vec<NetworkObservation>, usize, Option<BatchMetadata>) {
        let mut observations = Vec::with_capacity(self.entries.len());
        let mut malformed = 0;
        for entry in self.entries {
            match entry {
                Ok(observation) => observations.push(observation),
                Err(_) => malformed += 1,
            }
        }
        (observations, malformed, self.metadata)
    }
}

impl From<BatchFile> for ParsedBatch {
    fn from(file: BatchFile) -> Self {
        let (metadata, raw) = match file {
            BatchFile::WithMetadata {
                metadata,
                observations,
            } => (metadata, observations),
            BatchFile::Bare(observations) => (None, observations),
        };
        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(index, value)| parse_entry(index, value))
            .collect();
        Self { metadata, entries }
    }
}

fn parse_entry(index: usize, value: serde_json::Value) -> Result<NetworkObservation, MalformedEntry> {
    let field = |name: &str| {
        value
            .get(name)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };
    let (ssid, bssid) = (field("ssid"), field("bssid"));
    serde_json::from_value(value).map_err(|e| {
        warn!(index, %bssid, error = %e, "skipping unreadable observation");
        MalformedEntry {
            ssid,
            bssid,
            reason: format!("unreadable observation: {e}"),
        }
    })
}

/// Read a batch file, choosing YAML for `.yaml`/`.yml` and JSON otherwise.
/// Only a file that is not a batch at all is an error.
pub fn read_batch(path: &Path) -> Result<ParsedBatch, CliError> {
    let input_err = |reason: String| CliError::Input {
        path: path.display().to_string(),
        reason,
    };
    let contents = std::fs::read_to_string(path).map_err(|e| input_err(e.to_string()))?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let file: BatchFile = if is_yaml {
        serde_yaml::from_str(&contents).map_err(|e| input_err(e.to_string()))?
    } else {
        serde_json::from_str(&contents).map_err(|e| input_err(e.to_string()))?
    };
    Ok(file.into())
}

// ── Time arguments ──────────────────────────────────────────────────

/// Parse an RFC 3339 instant given for `field`.
pub fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CliError::Validation {
            field: field.into(),
            reason: format!("'{raw}' is not an RFC 3339 timestamp: {e}"),
        })
}

/// Parse a human duration ("90s", "10m", "1h 30m") given for `field`.
pub fn parse_duration(field: &str, raw: &str) -> Result<TimeDelta, CliError> {
    let invalid = |reason: String| CliError::Validation {
        field: field.into(),
        reason,
    };
    let std = humantime::parse_duration(raw).map_err(|e| invalid(format!("'{raw}': {e}")))?;
    TimeDelta::from_std(std).map_err(|_| invalid(format!("'{raw}' is out of range")))
}

/// The evaluation instant: `--now` when given, else the system clock.
pub fn now(global: &GlobalOpts) -> Result<DateTime<Utc>, CliError> {
    global
        .now
        .as_deref()
        .map_or_else(|| Ok(Utc::now()), |raw| parse_instant("now", raw))
}
