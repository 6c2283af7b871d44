//! Main application orchestration and execution

use crate::{
    capture::{generate_and_record, pull_captures, resolve_vif_device, CapturePlan},
    cli::Cli,
    config::{display_config_summary, load_config, validate_config},
    error::{AppError, Result},
    models::{CapturedMapping, Config},
    normalizer::normalize_file,
    output::OutputFormatterFactory,
    session::RemoteSession,
    stats::compute_statistics,
};
use std::sync::Arc;
use std::time::Duration;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        Ok(Self { cli })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        let config = load_config(self.cli)?;
        let warnings = validate_config(&config)?;

        if config.debug {
            println!("Configuration Summary:");
            println!("{}", display_config_summary(&config));
            println!();
        }

        for warning in &warnings {
            eprintln!("{}", warning.format(config.enable_color));
        }

        let (vif_mapping, pif_mapping) = if config.is_offline() {
            Self::analyze_local(&config)?
        } else {
            Self::capture_and_retrieve(&config).await?
        };

        log::info!(
            "normalized {} vif key(s) and {} pif key(s)",
            vif_mapping.len(),
            pif_mapping.len()
        );

        let stats = compute_statistics(&vif_mapping, &pif_mapping)?;

        if config.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            let formatter = OutputFormatterFactory::create_formatter(config.enable_color);
            println!("{}", formatter.format_header("One-way transit latency (vif - pif)"));
            println!("{}", formatter.format_statistics(&stats));
        }

        Ok(())
    }

    /// Normalize two already-retrieved capture files
    fn analyze_local(config: &Config) -> Result<(CapturedMapping, CapturedMapping)> {
        let vif_path = config
            .vif_file
            .as_ref()
            .ok_or_else(|| AppError::config("Missing vif capture file"))?;
        let pif_path = config
            .pif_file
            .as_ref()
            .ok_or_else(|| AppError::config("Missing pif capture file"))?;

        let vif_mapping = normalize_file(vif_path, &config.layout)?;
        let pif_mapping = normalize_file(pif_path, &config.layout)?;
        Ok((vif_mapping, pif_mapping))
    }

    /// Run the full remote pipeline: verify, capture, retrieve, normalize
    async fn capture_and_retrieve(config: &Config) -> Result<(CapturedMapping, CapturedMapping)> {
        let source = Arc::new(RemoteSession::new(&config.source_ip, &config.key_path));
        let destination = Arc::new(RemoteSession::new(&config.hypervisor_ip, &config.key_path));

        let (source_alive, destination_alive) =
            futures::future::join(source.verify(), destination.verify()).await;
        if !source_alive {
            return Err(AppError::session(format!(
                "Source host {} is not reachable over ssh",
                config.source_ip
            )));
        }
        if !destination_alive {
            return Err(AppError::session(format!(
                "Hypervisor {} is not reachable over ssh",
                config.hypervisor_ip
            )));
        }

        let vif_device =
            resolve_vif_device(destination.as_ref(), &config.name_label, config.vif_number)
                .await?;
        log::info!("capturing on {} and {}", vif_device, config.host_interface);

        let plan = CapturePlan::new(config, &vif_device);

        println!("Spawning packet captures...");
        generate_and_record(Arc::clone(&source), Arc::clone(&destination), &plan).await?;

        println!("Captures finished, waiting for files to flush.");
        tokio::time::sleep(Duration::from_secs(config.settle_seconds)).await;

        println!("Transferring files...");
        let local_dir = std::env::current_dir()?;
        let (vif_local, pif_local) = pull_captures(&destination, &plan, &local_dir).await?;

        let vif_mapping = normalize_file(&vif_local, &config.layout)?;
        let pif_mapping = normalize_file(&pif_local, &config.layout)?;
        Ok((vif_mapping, pif_mapping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write as _;

    fn capture_line(ts: &str, seq: u64) -> String {
        format!(
            "2015-03-07 {} IP 10.0.0.5.2048 > 10.0.0.9.0: S {}:{}(0) win 512",
            ts, seq, seq
        )
    }

    fn write_fixture(lines: &[String]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[tokio::test]
    async fn test_offline_run_end_to_end() {
        let vif = write_fixture(&[
            capture_line("10:00:00.001000", 1),
            capture_line("10:00:01.002000", 2),
        ]);
        let pif = write_fixture(&[
            capture_line("10:00:00.000000", 1),
            capture_line("10:00:01.000000", 2),
        ]);

        let cli = Cli::try_parse_from([
            "netweaver",
            "--vif-file",
            vif.path().to_str().unwrap(),
            "--pif-file",
            pif.path().to_str().unwrap(),
            "--no-color",
        ])
        .unwrap();

        let app = App::new(cli).unwrap();
        assert!(app.run().await.is_ok());
    }

    #[tokio::test]
    async fn test_offline_run_with_disjoint_captures_fails() {
        let vif = write_fixture(&[capture_line("10:00:00.001000", 1)]);
        let pif = write_fixture(&[capture_line("10:00:00.000000", 2)]);

        let cli = Cli::try_parse_from([
            "netweaver",
            "--vif-file",
            vif.path().to_str().unwrap(),
            "--pif-file",
            pif.path().to_str().unwrap(),
        ])
        .unwrap();

        let error = App::new(cli).unwrap().run().await.unwrap_err();
        assert!(matches!(error, AppError::EmptyIntersection));
    }
}
