//! Delta and statistics engine
//!
//! Joins the two normalized mappings by shared sequence key, computes the
//! per-key transit delta `vif - pif` in milliseconds, and reduces the delta
//! multiset to summary statistics. Deltas are signed: a negative value means
//! the vif saw the packet first, which is the measurement's whole point and
//! must never be clamped.

use crate::{
    error::{AppError, Result},
    models::capture::{CapturedMapping, TransitStatistics},
};
use chrono::Duration;

/// Convert a signed time delta to milliseconds, preserving the fraction
///
/// Works on the structured components of the delta rather than a single
/// integer so the sub-millisecond part is never truncated.
pub fn duration_to_millis(delta: Duration) -> f64 {
    let days = delta.num_days();
    let remainder = delta - Duration::days(days);
    let seconds = remainder.num_seconds();
    let microseconds = (remainder - Duration::seconds(seconds))
        .num_microseconds()
        .unwrap_or(0);

    (days * 86_400_000) as f64 + (seconds * 1_000) as f64 + microseconds as f64 / 1_000.0
}

/// Join two captures and reduce the matched deltas to summary statistics
///
/// The pif mapping is the reference side: the physical interface is expected
/// to be the superset for arrival timing. Keys present in only one mapping
/// are excluded without error (packet drops and capture misalignment are
/// expected) and reported through `unmatched_keys`.
pub fn compute_statistics(
    vif: &CapturedMapping,
    pif: &CapturedMapping,
) -> Result<TransitStatistics> {
    let mut deltas = Vec::with_capacity(pif.len());
    let mut unmatched = 0usize;

    for (key, pif_timestamp) in pif.iter() {
        match vif.get(key) {
            Some(vif_timestamp) => {
                let delta = vif_timestamp.signed_duration_since(*pif_timestamp);
                deltas.push(duration_to_millis(delta));
            }
            None => unmatched += 1,
        }
    }

    if deltas.is_empty() {
        return Err(AppError::EmptyIntersection);
    }

    if unmatched > 0 {
        log::debug!(
            "{} reference key(s) had no counterpart in the vif capture",
            unmatched
        );
    }

    Ok(reduce(&deltas, unmatched))
}

/// Reduce a non-empty delta multiset to {mean, min, max, population stdev}
fn reduce(deltas: &[f64], unmatched: usize) -> TransitStatistics {
    let count = deltas.len();
    let average = deltas.iter().sum::<f64>() / count as f64;
    let minimum = deltas.iter().cloned().fold(f64::INFINITY, f64::min);
    let maximum = deltas.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    // Population standard deviation: divisor is n, not n-1.
    let variance = deltas
        .iter()
        .map(|delta| (delta - average).powi(2))
        .sum::<f64>()
        / count as f64;

    TransitStatistics {
        average_ms: average,
        minimum_ms: minimum,
        maximum_ms: maximum,
        std_dev_ms: variance.sqrt(),
        sample_count: count,
        unmatched_keys: unmatched,
    }
}
