//! Post-parse configuration checks that warn rather than fail

use crate::error::Result;
use crate::models::Config;

/// A non-fatal configuration concern worth telling the user about
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWarning {
    pub message: String,
}

impl ConfigWarning {
    fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Format the warning for console display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            use colored::Colorize;
            format!("{} {}", "warning:".yellow().bold(), self.message)
        } else {
            format!("warning: {}", self.message)
        }
    }
}

/// Validate a parsed configuration, returning warnings for odd but legal setups
pub fn validate_config(config: &Config) -> Result<Vec<ConfigWarning>> {
    let mut warnings = Vec::new();

    if config.is_offline() {
        return Ok(warnings);
    }

    if config.packet_count > 10_000 {
        warnings.push(ConfigWarning::new(format!(
            "{} packets will make each capture run for several minutes",
            config.packet_count
        )));
    }

    if config.source_ip == config.destination_ip {
        warnings.push(ConfigWarning::new(
            "source and destination IP are identical; the capture filter will match nothing useful",
        ));
    }

    if config.destination_ip == config.hypervisor_ip {
        warnings.push(ConfigWarning::new(
            "destination guest IP equals the hypervisor IP; check that the guest address was intended",
        ));
    }

    // The timestamp column sits left of the sequence column in every layout
    // produced by tcpdump; the inverse usually means swapped flags.
    if config.layout.timestamp_column > config.layout.sequence_column {
        warnings.push(ConfigWarning::new(
            "timestamp column is right of the sequence column; verify the column flags are not swapped",
        ));
    }

    Ok(warnings)
}
