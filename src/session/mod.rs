//! Remote command sessions over the system ssh tooling
//!
//! Both observation hosts are driven through plain `ssh`/`scp` processes;
//! the `RemoteExecutor` trait is the seam the capture orchestration uses so
//! tests can substitute a scripted executor.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Runs a shell command on a remote host and returns captured stdout lines
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn run_command(&self, command: &str) -> Result<Vec<String>>;
}

/// An authenticated session against a single remote host
#[derive(Debug, Clone)]
pub struct RemoteSession {
    pub host: String,
    pub user: String,
    pub key_path: String,
}

impl RemoteSession {
    /// Create a session for `root@host` authenticated by a private key
    pub fn new<H: Into<String>, K: Into<String>>(host: H, key_path: K) -> Self {
        Self {
            host: host.into(),
            user: crate::defaults::DEFAULT_REMOTE_USER.to_string(),
            key_path: key_path.into(),
        }
    }

    /// Override the remote user
    pub fn with_user<U: Into<String>>(mut self, user: U) -> Self {
        self.user = user.into();
        self
    }

    /// Argument vector for running a command over ssh
    fn ssh_args(&self, command: &str) -> Vec<String> {
        vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-i".to_string(),
            self.key_path.clone(),
            format!("{}@{}", self.user, self.host),
            command.to_string(),
        ]
    }

    /// Argument vector for copying a remote file to local storage
    fn scp_args(&self, remote_path: &str, local_path: &Path) -> Vec<String> {
        vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-i".to_string(),
            self.key_path.clone(),
            format!("{}@{}:{}", self.user, self.host, remote_path),
            local_path.display().to_string(),
        ]
    }

    /// Cheap liveness probe: can we run anything on the host at all?
    pub async fn verify(&self) -> bool {
        match self.run_command("hostname").await {
            Ok(lines) => !lines.is_empty(),
            Err(error) => {
                log::warn!("liveness probe against {} failed: {}", self.host, error);
                false
            }
        }
    }

    /// Copy a file from the remote host to local storage
    pub async fn pull_file(&self, remote_path: &str, local_path: &Path) -> Result<()> {
        let output = Command::new("scp")
            .args(self.scp_args(remote_path, local_path))
            .output()
            .await
            .map_err(|e| AppError::transfer(format!("Failed to spawn scp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::transfer(format!(
                "scp {}:{} failed: {}",
                self.host,
                remote_path,
                stderr.trim()
            )));
        }

        log::debug!("retrieved {}:{}", self.host, remote_path);
        Ok(())
    }
}

#[async_trait]
impl RemoteExecutor for RemoteSession {
    async fn run_command(&self, command: &str) -> Result<Vec<String>> {
        log::debug!("[{}] {}", self.host, command);

        let output = Command::new("ssh")
            .args(self.ssh_args(command))
            .output()
            .await
            .map_err(|e| AppError::session(format!("Failed to spawn ssh: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::session(format!(
                "Command on {} exited with {}: {}",
                self.host,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_session_defaults_to_root() {
        let session = RemoteSession::new("10.0.0.3", "/root/.ssh/id_rsa");
        assert_eq!(session.user, "root");
        assert_eq!(session.host, "10.0.0.3");
    }

    #[test]
    fn test_with_user_override() {
        let session = RemoteSession::new("10.0.0.3", "/key").with_user("operator");
        assert_eq!(session.user, "operator");
    }

    #[test]
    fn test_ssh_args_shape() {
        let session = RemoteSession::new("10.0.0.3", "/root/.ssh/id_rsa");
        let args = session.ssh_args("hostname");

        assert!(args.contains(&"BatchMode=yes".to_string()));
        assert!(args.contains(&"/root/.ssh/id_rsa".to_string()));
        assert!(args.contains(&"root@10.0.0.3".to_string()));
        assert_eq!(args.last(), Some(&"hostname".to_string()));
    }

    #[test]
    fn test_scp_args_shape() {
        let session = RemoteSession::new("10.0.0.3", "/key");
        let args = session.scp_args("/tmp/guest_pif", &PathBuf::from("./guest_pif"));

        assert!(args.contains(&"root@10.0.0.3:/tmp/guest_pif".to_string()));
        assert_eq!(args.last(), Some(&"./guest_pif".to_string()));
    }

    #[tokio::test]
    async fn test_run_command_spawn_failure_is_session_error() {
        // An unresolvable key path makes ssh itself fail fast in BatchMode
        let session = RemoteSession::new("256.256.256.256", "/nonexistent/key");
        let result = session.run_command("hostname").await;

        // Either ssh is missing (spawn error) or it exits non-zero; both
        // must surface as a SESSION error, never a panic.
        if let Err(error) = result {
            assert_eq!(error.category(), "SESSION");
        }
    }
}
