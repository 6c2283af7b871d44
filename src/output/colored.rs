//! Colored terminal output formatter

use super::OutputFormatter;
use crate::models::TransitStatistics;
use crate::types::SkewDirection;
use colored::Colorize;
use std::fmt::Write as _;

/// Formatter that styles the report for color terminals
pub struct ColoredFormatter;

impl ColoredFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Style the average according to what it says about the measurement
    fn styled_average(&self, stats: &TransitStatistics) -> String {
        let value = format!("{:>12.3}", stats.average_ms);
        match stats.skew_direction() {
            SkewDirection::VifLagsPif => value.green().to_string(),
            // Negative averages mean clock skew or inverted capture order,
            // worth catching the eye.
            SkewDirection::VifLeadsPif => value.yellow().to_string(),
            SkewDirection::Aligned => value.normal().to_string(),
        }
    }
}

impl Default for ColoredFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> String {
        format!(
            "{}\n{}",
            title.bold(),
            "=".repeat(title.len()).bright_black()
        )
    }

    fn format_statistics(&self, stats: &TransitStatistics) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "  {}   {} ms", "average".bold(), self.styled_average(stats));
        let _ = writeln!(out, "  {}   {:>12.3} ms", "minimum".bold(), stats.minimum_ms);
        let _ = writeln!(out, "  {}   {:>12.3} ms", "maximum".bold(), stats.maximum_ms);
        let _ = writeln!(out, "  {}     {:>12.3} ms", "stdev".bold(), stats.std_dev_ms);
        let _ = writeln!(
            out,
            "  {}   {:>12}    ({} unmatched, {:.1}% matched)",
            "samples".bold(),
            stats.sample_count,
            stats.unmatched_keys,
            stats.match_rate()
        );
        let _ = write!(out, "  {}", stats.skew_direction().describe().italic());

        out
    }

    fn format_error(&self, message: &str) -> String {
        format!("{} {}", "error:".red().bold(), message.red())
    }

    fn format_warning(&self, message: &str) -> String {
        format!("{} {}", "warning:".yellow().bold(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stats(average_ms: f64) -> TransitStatistics {
        TransitStatistics {
            average_ms,
            minimum_ms: -1.0,
            maximum_ms: 3.0,
            std_dev_ms: 0.5,
            sample_count: 100,
            unmatched_keys: 0,
        }
    }

    #[test]
    fn test_colored_statistics_keeps_values() {
        let output = ColoredFormatter::new().format_statistics(&sample_stats(1.5));
        assert!(output.contains("1.500"));
        assert!(output.contains("samples"));
    }

    #[test]
    fn test_negative_average_still_rendered() {
        // The sign must survive styling untouched
        let output = ColoredFormatter::new().format_statistics(&sample_stats(-2.25));
        assert!(output.contains("-2.250"));
    }

    #[test]
    fn test_error_and_warning_prefixes() {
        let formatter = ColoredFormatter::new();
        assert!(formatter.format_error("boom").contains("boom"));
        assert!(formatter.format_warning("odd").contains("odd"));
    }
}
