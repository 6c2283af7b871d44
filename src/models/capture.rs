//! Capture text geometry, normalized mappings, and transit statistics

use crate::types::SkewDirection;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;

/// Caller-supplied geometry of one capture tool's text output
///
/// Column indices are 0-based over whitespace-split tokens. Capture tools
/// vary, so nothing here is hard-coded; the defaults match `tcpdump -tttt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Token index holding the HH:MM:SS.ffffff time-of-day
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: usize,

    /// Token index holding (or embedding) the sequence identifier
    #[serde(default = "default_sequence_column")]
    pub sequence_column: usize,

    /// Secondary delimiter splitting the sequence token, if any
    #[serde(default = "default_sequence_split")]
    pub sequence_split: Option<String>,

    /// Which sub-part of the split token is the sequence key
    #[serde(default = "default_sequence_split_index")]
    pub sequence_split_index: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            timestamp_column: default_timestamp_column(),
            sequence_column: default_sequence_column(),
            sequence_split: default_sequence_split(),
            sequence_split_index: default_sequence_split_index(),
        }
    }
}

impl ColumnLayout {
    /// Layout that takes the whole sequence token as the key, no splitting
    pub fn whole_token(timestamp_column: usize, sequence_column: usize) -> Self {
        Self {
            timestamp_column,
            sequence_column,
            sequence_split: None,
            sequence_split_index: 0,
        }
    }
}

/// Per-line normalization decision
///
/// A truncated trailer line is an expected shape of capture text, so it is
/// an explicit outcome rather than a caught fault.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// The line yielded a sequence key and a timestamp
    Parsed { key: String, timestamp: NaiveTime },
    /// The line had too few tokens for the configured sequence column
    Skipped,
}

/// Mapping from sequence key to observation timestamp for one capture point
///
/// Built fresh per analysis run and discarded after the join; repeated keys
/// overwrite so the last line in temporal order wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapturedMapping {
    entries: HashMap<String, NaiveTime>,
}

impl CapturedMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the timestamp for a sequence key
    pub fn insert(&mut self, key: String, timestamp: NaiveTime) {
        self.entries.insert(key, timestamp);
    }

    /// Look up the timestamp observed for a sequence key
    pub fn get(&self, key: &str) -> Option<&NaiveTime> {
        self.entries.get(key)
    }

    /// Number of distinct sequence keys observed
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no well-formed line was observed at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (key, timestamp) pairs in arbitrary order
    pub fn iter(&self) -> hash_map::Iter<'_, String, NaiveTime> {
        self.entries.iter()
    }
}

impl FromIterator<(String, NaiveTime)> for CapturedMapping {
    fn from_iter<I: IntoIterator<Item = (String, NaiveTime)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Statistical summary of per-packet transit deltas
///
/// All latencies are signed milliseconds; a negative value means the vif
/// observed the packet before the pif, which carries real information about
/// clock skew or capture inversion and is never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitStatistics {
    /// Arithmetic mean of the deltas (milliseconds)
    pub average_ms: f64,

    /// Smallest delta (milliseconds)
    pub minimum_ms: f64,

    /// Largest delta (milliseconds)
    pub maximum_ms: f64,

    /// Population standard deviation of the deltas (milliseconds)
    pub std_dev_ms: f64,

    /// Number of sequence keys matched across both captures
    pub sample_count: usize,

    /// Reference-side keys that had no counterpart in the other capture
    pub unmatched_keys: usize,
}

impl TransitStatistics {
    /// Which capture point saw packets first, judged from the average
    pub fn skew_direction(&self) -> SkewDirection {
        SkewDirection::from_average(self.average_ms)
    }

    /// Format average delta for display
    pub fn format_average(&self) -> String {
        format!("{:.3}ms", self.average_ms)
    }

    /// Fraction of reference keys that matched, as a percentage
    pub fn match_rate(&self) -> f64 {
        let reference_total = self.sample_count + self.unmatched_keys;
        if reference_total == 0 {
            0.0
        } else {
            (self.sample_count as f64 / reference_total as f64) * 100.0
        }
    }
}

// Default value functions for serde
fn default_timestamp_column() -> usize {
    crate::defaults::DEFAULT_TIMESTAMP_COLUMN
}

fn default_sequence_column() -> usize {
    crate::defaults::DEFAULT_SEQUENCE_COLUMN
}

fn default_sequence_split() -> Option<String> {
    Some(crate::defaults::DEFAULT_SEQUENCE_SPLIT.to_string())
}

fn default_sequence_split_index() -> usize {
    crate::defaults::DEFAULT_SEQUENCE_SPLIT_INDEX
}
