//! Capture line normalization
//!
//! Turns one capture point's raw text into a mapping from sequence key to
//! observation timestamp. Capture files are noisy: truncated trailer lines
//! are skipped per line, while a timestamp token that fails to parse aborts
//! the whole pass, since that indicates the wrong column index or capture
//! tool rather than a one-off bad line.

use crate::{
    error::{AppError, Result},
    models::capture::{CapturedMapping, ColumnLayout, LineOutcome},
};
use chrono::NaiveTime;
use std::path::Path;

/// Time-of-day format printed by `tcpdump -tttt` style tools
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.f";

/// Normalize a sequence of capture lines into a key-to-timestamp mapping
///
/// Later lines overwrite earlier ones for a repeated key, matching the
/// temporal order of the capture log.
pub fn normalize_lines<I, S>(lines: I, layout: &ColumnLayout) -> Result<CapturedMapping>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut mapping = CapturedMapping::new();
    let mut skipped = 0usize;

    for line in lines {
        match parse_line(line.as_ref(), layout)? {
            LineOutcome::Parsed { key, timestamp } => mapping.insert(key, timestamp),
            LineOutcome::Skipped => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("normalization skipped {} malformed line(s)", skipped);
    }

    Ok(mapping)
}

/// Normalize a capture file already retrieved to local storage
pub fn normalize_file<P: AsRef<Path>>(path: P, layout: &ColumnLayout) -> Result<CapturedMapping> {
    let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        AppError::io(format!(
            "Failed to read capture file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    normalize_lines(text.lines(), layout)
}

/// Decide what a single capture line contributes
pub fn parse_line(line: &str, layout: &ColumnLayout) -> Result<LineOutcome> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    // A line too short for the sequence column is a truncated or trailer
    // line; skip it without failing the pass.
    let Some(sequence_token) = tokens.get(layout.sequence_column) else {
        return Ok(LineOutcome::Skipped);
    };

    let key = extract_key(sequence_token, layout)?;

    let timestamp_token = tokens.get(layout.timestamp_column).ok_or_else(|| {
        AppError::timestamp_format(format!("<missing column {}>", layout.timestamp_column))
    })?;

    let timestamp = NaiveTime::parse_from_str(timestamp_token, TIMESTAMP_FORMAT)
        .map_err(|_| AppError::timestamp_format(*timestamp_token))?;

    Ok(LineOutcome::Parsed { key, timestamp })
}

/// Extract the sequence key from the raw sequence token
///
/// An out-of-range split index is a caller configuration error, not a
/// per-line condition, and fails the whole pass.
fn extract_key(sequence_token: &str, layout: &ColumnLayout) -> Result<String> {
    match &layout.sequence_split {
        Some(delimiter) => sequence_token
            .split(delimiter.as_str())
            .nth(layout.sequence_split_index)
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::config(format!(
                    "Sequence split index {} out of range for token '{}'",
                    layout.sequence_split_index, sequence_token
                ))
            }),
        None => Ok(sequence_token.to_string()),
    }
}

#[cfg(test)]
mod comprehensive_tests;
