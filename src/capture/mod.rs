//! Capture orchestration
//!
//! Builds the synthetic traffic and capture commands, resolves the guest's
//! vif device name on the hypervisor, and runs the source and destination
//! command streams as two concurrent tasks that are both joined before any
//! file is retrieved. The analysis core never sees partial capture output.

use crate::{
    error::{AppError, Result},
    models::Config,
    session::{RemoteExecutor, RemoteSession},
    types::CapturePoint,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Everything one measurement run needs to know about its capture commands
#[derive(Debug, Clone)]
pub struct CapturePlan {
    /// vif-side capture file name (no directory)
    pub vif_filename: String,
    /// pif-side capture file name (no directory)
    pub pif_filename: String,
    /// hping3 invocation run on the traffic source
    pub traffic_command: String,
    /// Combined dual-capture invocation run on the hypervisor
    pub destination_command: String,
    /// Directory on the hypervisor holding both capture files
    pub remote_dir: String,
}

impl CapturePlan {
    /// Build the plan for one run against a resolved vif device
    ///
    /// Capture file names carry a fresh UUID so concurrent or repeated runs
    /// against the same guest never collide.
    pub fn new(config: &Config, vif_device: &str) -> Self {
        let trace_id = Uuid::new_v4();
        let vif_filename = format!(
            "{}{}{}",
            config.name_label,
            trace_id,
            CapturePoint::Vif.file_suffix()
        );
        let pif_filename = format!(
            "{}{}{}",
            config.name_label,
            trace_id,
            CapturePoint::Pif.file_suffix()
        );

        let pif_command = build_capture_command(
            &config.host_interface,
            config,
            &config.remote_capture_dir,
            &pif_filename,
        );
        let vif_command = build_capture_command(
            vif_device,
            config,
            &config.remote_capture_dir,
            &vif_filename,
        );

        Self {
            vif_filename,
            pif_filename,
            traffic_command: build_traffic_command(config),
            // The vif capture runs backgrounded next to the pif capture so
            // both observe the same packets; each stops at the packet count.
            destination_command: format!("{} & {}", vif_command, pif_command),
            remote_dir: config.remote_capture_dir.clone(),
        }
    }

    /// Remote path of one capture file
    pub fn remote_path(&self, point: CapturePoint) -> String {
        let filename = match point {
            CapturePoint::Vif => &self.vif_filename,
            CapturePoint::Pif => &self.pif_filename,
        };
        format!("{}/{}", self.remote_dir.trim_end_matches('/'), filename)
    }
}

/// hping3 invocation generating the bounded synthetic SYN stream
fn build_traffic_command(config: &Config) -> String {
    format!(
        "hping3 -c {} -S -L 0 -Q --fast {}",
        config.packet_count, config.destination_ip
    )
}

/// tcpdump invocation for one interface, teeing output to a capture file
fn build_capture_command(interface: &str, config: &Config, dir: &str, filename: &str) -> String {
    format!(
        "tcpdump -tttt -nnni {} -c {} src host {} and dst host {} | tee {}/{}",
        interface,
        config.packet_count,
        config.source_ip,
        config.destination_ip,
        dir.trim_end_matches('/'),
        filename
    )
}

/// Ask the hypervisor which vif device belongs to the guest
///
/// XenServer names vifs `vif<dom-id>.<interface-number>`; the dom-id is
/// queried by the guest's name-label.
pub async fn resolve_vif_device<E: RemoteExecutor + ?Sized>(
    executor: &E,
    name_label: &str,
    vif_number: u32,
) -> Result<String> {
    let command = format!(
        "xe vm-list name-label={} params=dom-id --minimal",
        name_label
    );
    let lines = executor.run_command(&command).await?;

    let dom_id = lines
        .first()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .ok_or_else(|| {
            AppError::capture(format!(
                "Hypervisor returned no dom-id for guest '{}'",
                name_label
            ))
        })?;

    Ok(format!("vif{}.{}", dom_id, vif_number))
}

/// Run traffic generation and the dual capture concurrently, joining both
///
/// The destination side starts first so the captures are listening before
/// the first packet leaves the source. Either stream failing fails the run;
/// nothing is retrieved until BOTH have completed.
pub async fn generate_and_record<E>(
    source: Arc<E>,
    destination: Arc<E>,
    plan: &CapturePlan,
) -> Result<()>
where
    E: RemoteExecutor + 'static,
{
    let capture_command = plan.destination_command.clone();
    let destination_task =
        tokio::spawn(async move { destination.run_command(&capture_command).await });

    let traffic_command = plan.traffic_command.clone();
    let source_task = tokio::spawn(async move { source.run_command(&traffic_command).await });

    let (capture_result, traffic_result) = tokio::join!(destination_task, source_task);

    capture_result??;
    traffic_result??;

    Ok(())
}

/// Retrieve both capture files once the run has settled
pub async fn pull_captures(
    destination: &RemoteSession,
    plan: &CapturePlan,
    local_dir: &Path,
) -> Result<(PathBuf, PathBuf)> {
    let vif_local = local_dir.join(&plan.vif_filename);
    let pif_local = local_dir.join(&plan.pif_filename);

    destination
        .pull_file(&plan.remote_path(CapturePoint::Vif), &vif_local)
        .await?;
    destination
        .pull_file(&plan.remote_path(CapturePoint::Pif), &pif_local)
        .await?;

    Ok((vif_local, pif_local))
}
