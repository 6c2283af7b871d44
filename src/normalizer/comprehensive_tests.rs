//! Property-based tests for capture line normalization
//!
//! Covers determinism, the last-write-wins overwrite law, and the rule
//! that malformed lines never change the resulting mapping.

use super::{normalize_lines, TIMESTAMP_FORMAT};
use crate::models::capture::ColumnLayout;
use chrono::NaiveTime;
use proptest::prelude::*;
use std::collections::HashMap;

/// Property-based test generators
mod generators {
    use super::*;

    /// Generate a valid HH:MM:SS.ffffff timestamp string
    pub fn timestamp() -> impl Strategy<Value = String> {
        (0u32..24, 0u32..60, 0u32..60, 0u32..1_000_000)
            .prop_map(|(h, m, s, us)| format!("{:02}:{:02}:{:02}.{:06}", h, m, s, us))
    }

    /// Generate a well-formed tcpdump-shaped capture line for a sequence number
    pub fn capture_line(seq: u64, ts: &str) -> String {
        format!(
            "2015-03-07 {} IP 10.0.0.5.2048 > 10.0.0.9.0: S {}:{}(0) win 512",
            ts, seq, seq
        )
    }

    /// Generate a batch of (sequence, timestamp) pairs, duplicates allowed
    pub fn line_batch() -> impl Strategy<Value = Vec<(u64, String)>> {
        prop::collection::vec((0u64..50, timestamp()), 1..200)
    }

    /// Generate a truncated line: too few tokens to reach the sequence column
    pub fn short_line() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z]{1,8}", 0..7).prop_map(|tokens| tokens.join(" "))
    }
}

fn parse_time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
}

proptest! {
    /// Normalization is deterministic: the same input yields the same mapping
    #[test]
    fn normalize_is_idempotent(batch in generators::line_batch()) {
        let layout = ColumnLayout::default();
        let lines: Vec<String> = batch
            .iter()
            .map(|(seq, ts)| generators::capture_line(*seq, ts))
            .collect();

        let first = normalize_lines(&lines, &layout).unwrap();
        let second = normalize_lines(&lines, &layout).unwrap();
        prop_assert_eq!(first, second);
    }

    /// The mapping holds the timestamp of the LAST well-formed line per key
    #[test]
    fn last_write_wins(batch in generators::line_batch()) {
        let layout = ColumnLayout::default();
        let lines: Vec<String> = batch
            .iter()
            .map(|(seq, ts)| generators::capture_line(*seq, ts))
            .collect();

        let mapping = normalize_lines(&lines, &layout).unwrap();

        // Replaying the batch through a plain map reproduces the winners
        let mut expected: HashMap<String, NaiveTime> = HashMap::new();
        for (seq, ts) in &batch {
            expected.insert(seq.to_string(), parse_time(ts));
        }

        prop_assert_eq!(mapping.len(), expected.len());
        for (key, ts) in &expected {
            prop_assert_eq!(mapping.get(key), Some(ts));
        }
    }

    /// Inserting a short line anywhere leaves the mapping unchanged
    #[test]
    fn skip_law(
        batch in generators::line_batch(),
        position in 0usize..200,
        junk in generators::short_line(),
    ) {
        let layout = ColumnLayout::default();
        let clean: Vec<String> = batch
            .iter()
            .map(|(seq, ts)| generators::capture_line(*seq, ts))
            .collect();

        let mut noisy = clean.clone();
        noisy.insert(position.min(clean.len()), junk);

        prop_assert_eq!(
            normalize_lines(&clean, &layout).unwrap(),
            normalize_lines(&noisy, &layout).unwrap()
        );
    }
}
