//! Output formatting for transit statistics
//!
//! A small trait seam so the app can render either plain or colored text
//! from the same statistics record; JSON rendering goes through serde.

pub mod colored;

pub use self::colored::ColoredFormatter;

use crate::models::TransitStatistics;
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> String;

    /// Format the statistics record as a report table
    fn format_statistics(&self, stats: &TransitStatistics) -> String;

    /// Format error messages
    fn format_error(&self, message: &str) -> String;

    /// Format warning messages
    fn format_warning(&self, message: &str) -> String;
}

/// Plain text formatter without any terminal styling
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> String {
        format!("{}\n{}", title, "=".repeat(title.len()))
    }

    fn format_statistics(&self, stats: &TransitStatistics) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "  average   {:>12.3} ms", stats.average_ms);
        let _ = writeln!(out, "  minimum   {:>12.3} ms", stats.minimum_ms);
        let _ = writeln!(out, "  maximum   {:>12.3} ms", stats.maximum_ms);
        let _ = writeln!(out, "  stdev     {:>12.3} ms", stats.std_dev_ms);
        let _ = writeln!(
            out,
            "  samples   {:>12}    ({} unmatched, {:.1}% matched)",
            stats.sample_count,
            stats.unmatched_keys,
            stats.match_rate()
        );
        let _ = write!(out, "  {}", stats.skew_direction().describe());

        out
    }

    fn format_error(&self, message: &str) -> String {
        format!("error: {}", message)
    }

    fn format_warning(&self, message: &str) -> String {
        format!("warning: {}", message)
    }
}

/// Factory for picking a formatter based on terminal capabilities
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create the right formatter for the color setting
    pub fn create_formatter(enable_color: bool) -> Box<dyn OutputFormatter> {
        if enable_color {
            Box::new(ColoredFormatter::new())
        } else {
            Box::new(PlainFormatter)
        }
    }
}
