//! Configuration data model and validation

use crate::models::capture::ColumnLayout;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IP address of the traffic-generating source host
    #[serde(default)]
    pub source_ip: String,

    /// IP address of the destination guest
    #[serde(default)]
    pub destination_ip: String,

    /// IP address of the hypervisor hosting the destination guest
    #[serde(default)]
    pub hypervisor_ip: String,

    /// XenServer name-label of the destination guest
    #[serde(default)]
    pub name_label: String,

    /// Which of the guest's vifs to capture on
    #[serde(default = "default_vif_number")]
    pub vif_number: u32,

    /// Physical interface on the hypervisor carrying the traffic
    #[serde(default = "default_host_interface")]
    pub host_interface: String,

    /// Path to the ssh private key used for both sessions
    #[serde(default)]
    pub key_path: String,

    /// Packets to generate; bounds both capture durations by count
    #[serde(default = "default_packet_count")]
    pub packet_count: u32,

    /// Directory on the hypervisor where capture files are written
    #[serde(default = "default_remote_capture_dir")]
    pub remote_capture_dir: String,

    /// Seconds to wait after capture completion for output to flush
    #[serde(default = "default_settle_seconds")]
    pub settle_seconds: u64,

    /// Capture text geometry shared by both capture points
    #[serde(default)]
    pub layout: ColumnLayout,

    /// Pre-retrieved vif capture file; with `pif_file`, skips orchestration
    #[serde(default)]
    pub vif_file: Option<PathBuf>,

    /// Pre-retrieved pif capture file; with `vif_file`, skips orchestration
    #[serde(default)]
    pub pif_file: Option<PathBuf>,

    /// Render the statistics record as JSON instead of a table
    #[serde(default)]
    pub json: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_ip: String::new(),
            destination_ip: String::new(),
            hypervisor_ip: String::new(),
            name_label: String::new(),
            vif_number: default_vif_number(),
            host_interface: default_host_interface(),
            key_path: String::new(),
            packet_count: default_packet_count(),
            remote_capture_dir: default_remote_capture_dir(),
            settle_seconds: default_settle_seconds(),
            layout: ColumnLayout::default(),
            vif_file: None,
            pif_file: None,
            json: false,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this run analyzes already-retrieved capture files only
    pub fn is_offline(&self) -> bool {
        self.vif_file.is_some() && self.pif_file.is_some()
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        // A lone capture file is ambiguous: the user either wants a full
        // remote run or a two-file analysis, never half of each.
        if self.vif_file.is_some() != self.pif_file.is_some() {
            return Err(AppError::config(
                "Offline analysis requires both --vif-file and --pif-file",
            ));
        }

        if self.is_offline() {
            return Ok(());
        }

        for (label, value) in [
            ("source IP", &self.source_ip),
            ("destination IP", &self.destination_ip),
            ("hypervisor IP", &self.hypervisor_ip),
        ] {
            if value.is_empty() {
                return Err(AppError::config(format!("Missing {}", label)));
            }
            if IpAddr::from_str(value).is_err() {
                return Err(AppError::config(format!(
                    "Invalid {} address: {}",
                    label, value
                )));
            }
        }

        if self.name_label.is_empty() {
            return Err(AppError::config("Missing destination guest name-label"));
        }

        if self.key_path.is_empty() {
            return Err(AppError::config("Missing ssh key path"));
        }

        if self.host_interface.is_empty() {
            return Err(AppError::config("Host interface cannot be empty"));
        }

        if self.packet_count == 0 {
            return Err(AppError::config("Packet count must be greater than 0"));
        }

        if self.packet_count > 100_000 {
            return Err(AppError::config("Packet count cannot exceed 100000"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(source_ip) = std::env::var("NETWEAVER_SOURCE_IP") {
            self.source_ip = source_ip;
        }

        if let Ok(destination_ip) = std::env::var("NETWEAVER_DESTINATION_IP") {
            self.destination_ip = destination_ip;
        }

        if let Ok(hypervisor_ip) = std::env::var("NETWEAVER_HYPERVISOR_IP") {
            self.hypervisor_ip = hypervisor_ip;
        }

        if let Ok(name_label) = std::env::var("NETWEAVER_NAME_LABEL") {
            self.name_label = name_label;
        }

        if let Ok(host_interface) = std::env::var("NETWEAVER_HOST_INTERFACE") {
            self.host_interface = host_interface;
        }

        if let Ok(key_path) = std::env::var("NETWEAVER_KEY_PATH") {
            self.key_path = key_path;
        }

        if let Ok(packet_count) = std::env::var("NETWEAVER_PACKET_COUNT") {
            self.packet_count = packet_count.parse().map_err(|e| {
                AppError::config(format!(
                    "Invalid NETWEAVER_PACKET_COUNT value '{}': {}",
                    packet_count, e
                ))
            })?;
        }

        if let Ok(capture_dir) = std::env::var("NETWEAVER_CAPTURE_DIR") {
            self.remote_capture_dir = capture_dir;
        }

        if let Ok(enable_color) = std::env::var("NETWEAVER_ENABLE_COLOR") {
            self.enable_color = enable_color.parse().map_err(|e| {
                AppError::config(format!(
                    "Invalid NETWEAVER_ENABLE_COLOR value '{}': {}",
                    enable_color, e
                ))
            })?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_vif_number() -> u32 {
    crate::defaults::DEFAULT_VIF_NUMBER
}

fn default_host_interface() -> String {
    crate::defaults::DEFAULT_HOST_INTERFACE.to_string()
}

fn default_packet_count() -> u32 {
    crate::defaults::DEFAULT_PACKET_COUNT
}

fn default_remote_capture_dir() -> String {
    crate::defaults::DEFAULT_REMOTE_CAPTURE_DIR.to_string()
}

fn default_settle_seconds() -> u64 {
    crate::defaults::DEFAULT_SETTLE_SECONDS
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
