//! Command-line interface module

use clap::Parser;
use std::path::PathBuf;

/// NetWeaver - measures one-way guest-to-hypervisor latency from packet captures
#[derive(Parser, Debug, Clone)]
#[command(name = "netweaver")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// IP address of the traffic-generating source host
    #[arg(short = 's', long)]
    pub source_ip: Option<String>,

    /// IP address of the destination guest
    #[arg(short = 'd', long)]
    pub destination_ip: Option<String>,

    /// IP address of the hypervisor hosting the destination guest
    #[arg(long = "hv")]
    pub hypervisor_ip: Option<String>,

    /// XenServer name-label of the destination guest
    #[arg(short = 'n', long)]
    pub name_label: Option<String>,

    /// Which of the guest's vifs to capture on
    #[arg(long, default_value_t = crate::defaults::DEFAULT_VIF_NUMBER)]
    pub vif_number: u32,

    /// Physical interface on the hypervisor carrying the traffic
    #[arg(short = 'i', long, default_value = crate::defaults::DEFAULT_HOST_INTERFACE)]
    pub host_interface: String,

    /// Path to the ssh private key used for both sessions
    #[arg(short = 'k', long)]
    pub key_path: Option<String>,

    /// Packets to generate; also bounds both capture durations
    #[arg(short = 'c', long, value_parser = parse_packet_count, default_value_t = crate::defaults::DEFAULT_PACKET_COUNT)]
    pub count: u32,

    /// Analyze a pre-retrieved vif capture file instead of running remotely
    #[arg(long, requires = "pif_file")]
    pub vif_file: Option<PathBuf>,

    /// Analyze a pre-retrieved pif capture file instead of running remotely
    #[arg(long, requires = "vif_file")]
    pub pif_file: Option<PathBuf>,

    /// 0-indexed capture column holding the HH:MM:SS.ffffff timestamp
    #[arg(long, default_value_t = crate::defaults::DEFAULT_TIMESTAMP_COLUMN)]
    pub timestamp_column: usize,

    /// 0-indexed capture column holding the sequence token
    #[arg(long = "seq-column", default_value_t = crate::defaults::DEFAULT_SEQUENCE_COLUMN)]
    pub sequence_column: usize,

    /// Secondary delimiter splitting the sequence token ("none" to disable)
    #[arg(long = "seq-split", default_value = crate::defaults::DEFAULT_SEQUENCE_SPLIT)]
    pub sequence_split: String,

    /// Which sub-part of the split sequence token is the key
    #[arg(long = "seq-split-index", default_value_t = crate::defaults::DEFAULT_SEQUENCE_SPLIT_INDEX)]
    pub sequence_split_index: usize,

    /// Render the statistics record as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        // Offline analysis needs no remote coordinates at all
        if self.is_offline() {
            return Ok(());
        }

        let missing: Vec<&str> = [
            ("--source-ip", self.source_ip.is_none()),
            ("--destination-ip", self.destination_ip.is_none()),
            ("--hv", self.hypervisor_ip.is_none()),
            ("--name-label", self.name_label.is_none()),
            ("--key-path", self.key_path.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(flag, _)| *flag)
        .collect();

        if !missing.is_empty() {
            return Err(format!(
                "Missing required arguments for a remote run: {} (or pass --vif-file/--pif-file for offline analysis)",
                missing.join(", ")
            ));
        }

        Ok(())
    }

    /// Whether this invocation analyzes already-retrieved capture files
    pub fn is_offline(&self) -> bool {
        self.vif_file.is_some() && self.pif_file.is_some()
    }

    /// The sequence-split delimiter, with "none" meaning whole-token keys
    pub fn sequence_split(&self) -> Option<String> {
        if self.sequence_split.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(self.sequence_split.clone())
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }
}

/// Parse and bound the packet count
fn parse_packet_count(s: &str) -> Result<u32, String> {
    s.parse::<u32>()
        .map_err(|_| format!("Invalid packet count: {}", s))
        .and_then(|count| {
            if count == 0 {
                Err("Packet count must be greater than 0".to_string())
            } else if count > 100_000 {
                Err("Packet count cannot exceed 100000".to_string())
            } else {
                Ok(count)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    true
}
