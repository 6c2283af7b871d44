//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::{capture::ColumnLayout, Config},
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // Start with default configuration
        let mut config = Config::default();

        // Load from environment file if it exists
        EnvManager::load_env_file(self.cli.debug)?;

        // Merge environment variables into config
        config.merge_from_env()?;

        // Override with CLI arguments
        self.apply_cli_overrides(&mut config);

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref source_ip) = self.cli.source_ip {
            config.source_ip = source_ip.clone();
        }

        if let Some(ref destination_ip) = self.cli.destination_ip {
            config.destination_ip = destination_ip.clone();
        }

        if let Some(ref hypervisor_ip) = self.cli.hypervisor_ip {
            config.hypervisor_ip = hypervisor_ip.clone();
        }

        if let Some(ref name_label) = self.cli.name_label {
            config.name_label = name_label.clone();
        }

        if let Some(ref key_path) = self.cli.key_path {
            config.key_path = key_path.clone();
        }

        if self.cli.host_interface != crate::defaults::DEFAULT_HOST_INTERFACE {
            config.host_interface = self.cli.host_interface.clone();
        }

        if self.cli.count != crate::defaults::DEFAULT_PACKET_COUNT {
            config.packet_count = self.cli.count;
        }

        config.vif_number = self.cli.vif_number;
        config.vif_file = self.cli.vif_file.clone();
        config.pif_file = self.cli.pif_file.clone();

        config.layout = ColumnLayout {
            timestamp_column: self.cli.timestamp_column,
            sequence_column: self.cli.sequence_column,
            sequence_split: self.cli.sequence_split(),
            sequence_split_index: self.cli.sequence_split_index,
        };

        if self.cli.no_color {
            config.enable_color = false;
        } else if self.cli.color {
            config.enable_color = true;
        }

        // These are CLI-only flags
        config.json = self.cli.json;
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    if config.is_offline() {
        summary.push("Mode: offline analysis".to_string());
        if let (Some(vif), Some(pif)) = (&config.vif_file, &config.pif_file) {
            summary.push(format!("Vif capture: {}", vif.display()));
            summary.push(format!("Pif capture: {}", pif.display()));
        }
    } else {
        summary.push("Mode: remote capture + analysis".to_string());
        summary.push(format!("Source: {}", config.source_ip));
        summary.push(format!("Destination: {}", config.destination_ip));
        summary.push(format!("Hypervisor: {}", config.hypervisor_ip));
        summary.push(format!("Guest: {}", config.name_label));
        summary.push(format!("Host interface: {}", config.host_interface));
        summary.push(format!("Packet count: {}", config.packet_count));
    }

    summary.push(format!(
        "Layout: timestamp col {}, sequence col {}, split {:?} index {}",
        config.layout.timestamp_column,
        config.layout.sequence_column,
        config.layout.sequence_split,
        config.layout.sequence_split_index
    ));
    summary.push(format!("Color output: {}", config.enable_color));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("netweaver").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_offline_config_from_cli() {
        let config = load_config(cli(&["--vif-file", "a_vif", "--pif-file", "a_pif"])).unwrap();
        assert!(config.is_offline());
        assert_eq!(config.layout.sequence_column, 7);
    }

    #[test]
    fn test_cli_overrides_layout() {
        let config = load_config(cli(&[
            "--vif-file",
            "a_vif",
            "--pif-file",
            "a_pif",
            "--timestamp-column",
            "0",
            "--seq-column",
            "3",
            "--seq-split",
            "none",
        ]))
        .unwrap();

        assert_eq!(config.layout.timestamp_column, 0);
        assert_eq!(config.layout.sequence_column, 3);
        assert!(config.layout.sequence_split.is_none());
    }

    #[test]
    fn test_cli_overrides_remote_coordinates() {
        let config = load_config(cli(&[
            "-s", "10.0.0.1", "-d", "10.0.0.2", "--hv", "10.0.0.3", "-n", "guest-vm", "-k",
            "/key", "-c", "500",
        ]))
        .unwrap();

        assert_eq!(config.source_ip, "10.0.0.1");
        assert_eq!(config.packet_count, 500);
        assert!(!config.is_offline());
    }

    #[test]
    fn test_no_color_override() {
        let config = load_config(cli(&[
            "--vif-file", "a", "--pif-file", "b", "--no-color",
        ]))
        .unwrap();
        assert!(!config.enable_color);
    }

    #[test]
    fn test_incomplete_remote_config_fails_validation() {
        let result = load_config(cli(&["-s", "10.0.0.1"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_mentions_mode() {
        let config = load_config(cli(&["--vif-file", "a", "--pif-file", "b"])).unwrap();
        let summary = display_config_summary(&config);
        assert!(summary.contains("offline analysis"));
        assert!(summary.contains("sequence col 7"));
    }
}
