//! Feature registry
//!
//! Maps normalized systemd option names to their support status in rustysd.
//! The registry is built once at startup and only read afterwards; which
//! entries were actually matched during a run is tracked separately by a
//! [`UsageTracker`] owned by that run.

mod builtin;

use crate::error::{FeatCmpError, Result};
use crate::extract::normalize;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Support status of a systemd option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupportStatus {
    /// Fully implemented
    Supported,
    /// Implemented with restrictions, or behind a cargo feature
    Partial,
    /// Not known to be implemented
    Unknown,
    /// Definitely not implemented
    Absent,
}

impl SupportStatus {
    pub const ALL: [SupportStatus; 4] = [
        SupportStatus::Supported,
        SupportStatus::Partial,
        SupportStatus::Unknown,
        SupportStatus::Absent,
    ];

    /// Icon rendered in the report's "Supported" column
    pub fn icon(&self) -> &'static str {
        match self {
            SupportStatus::Supported => "✅",
            SupportStatus::Partial => "⚠️",
            SupportStatus::Unknown => "❓",
            SupportStatus::Absent => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SupportStatus::Supported => "supported",
            SupportStatus::Partial => "partial",
            SupportStatus::Unknown => "unknown",
            SupportStatus::Absent => "absent",
        }
    }
}

impl std::fmt::Display for SupportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry record for one option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportRecord {
    pub status: SupportStatus,
    #[serde(default)]
    pub note: String,
}

impl SupportRecord {
    pub fn new(status: SupportStatus, note: impl Into<String>) -> Self {
        Self {
            status,
            note: note.into(),
        }
    }

    pub fn supported(note: impl Into<String>) -> Self {
        Self::new(SupportStatus::Supported, note)
    }

    pub fn partial(note: impl Into<String>) -> Self {
        Self::new(SupportStatus::Partial, note)
    }

    pub fn icon(&self) -> &'static str {
        self.status.icon()
    }
}

/// Immutable lookup table from normalized option name to support record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureRegistry {
    entries: BTreeMap<String, SupportRecord>,
}

impl FeatureRegistry {
    /// The table describing what rustysd implements
    pub fn builtin() -> Self {
        builtin::entries().into_iter().collect()
    }

    /// Parse a registry from JSON of the form
    /// `{"ExecStart=": {"status": "supported", "note": "..."}}`
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, SupportRecord> = serde_json::from_str(json)?;
        Ok(raw.into_iter().collect())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| FeatCmpError::RegistryIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Look up a normalized term
    pub fn status_of(&self, key: &str) -> Option<&SupportRecord> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SupportRecord)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entry count per status tier
    pub fn summary(&self) -> BTreeMap<SupportStatus, usize> {
        let mut counts = BTreeMap::new();
        for record in self.entries.values() {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        counts
    }
}

impl<K: AsRef<str>> FromIterator<(K, SupportRecord)> for FeatureRegistry {
    fn from_iter<I: IntoIterator<Item = (K, SupportRecord)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(key, record)| (normalize(key.as_ref()).to_string(), record))
            .collect();
        Self { entries }
    }
}

/// Which registry keys were matched during one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageTracker {
    used: BTreeSet<String>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_used(&mut self, key: &str) {
        if !self.used.contains(key) {
            self.used.insert(key.to_string());
        }
    }

    pub fn was_used(&self, key: &str) -> bool {
        self.used.contains(key)
    }

    /// Registry entries never marked used, in key order
    pub fn unused<'r>(
        &'r self,
        registry: &'r FeatureRegistry,
    ) -> impl Iterator<Item = (&'r str, &'r SupportRecord)> + 'r {
        registry.iter().filter(move |(key, _)| !self.was_used(key))
    }
}
