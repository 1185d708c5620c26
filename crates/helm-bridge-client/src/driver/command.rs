//! Subprocess driver for the `helm` executable

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{HelmDriver, HelmInvocation, HelmOutput, command_failed};
use crate::config::HelmConfig;
use crate::error::{HelmError, Result};

/// Runs helm as a child process
///
/// The child is killed if the invocation's timeout plus the configured grace
/// period elapses.
#[derive(Debug, Clone)]
pub struct CommandDriver {
    config: HelmConfig,
}

impl CommandDriver {
    /// Create a driver for the given configuration
    pub fn new(config: HelmConfig) -> Self {
        Self { config }
    }

    fn command(&self, invocation: &HelmInvocation) -> Command {
        let mut cmd = Command::new(&self.config.helm_bin);
        cmd.args(&invocation.args)
            .args(self.config.global_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl HelmDriver for CommandDriver {
    async fn run(&self, invocation: HelmInvocation) -> Result<HelmOutput> {
        debug!(command = %invocation.command(), "running helm");

        let child = self.command(&invocation).output();

        let output = match invocation.timeout {
            Some(timeout) => {
                let deadline = timeout + self.config.timeout_grace;
                match tokio::time::timeout(deadline, child).await {
                    Ok(output) => output,
                    Err(_) => {
                        return Err(HelmError::Timeout {
                            command: invocation.command(),
                            after: deadline,
                        });
                    }
                }
            }
            None => child.await,
        }
        .map_err(|source| HelmError::Spawn {
            binary: self.config.helm_bin.to_string_lossy().to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(command_failed(&invocation, &stderr, output.status.code()));
        }

        Ok(HelmOutput { stdout, stderr })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::time::Duration;

    fn script(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("helm");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn driver(helm_bin: std::path::PathBuf) -> CommandDriver {
        CommandDriver::new(HelmConfig {
            helm_bin,
            timeout_grace: Duration::from_millis(200),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "echo \"$@\"");

        let out = driver(bin)
            .run(HelmInvocation::new(["list", "--output", "json"]))
            .await
            .unwrap();
        assert_eq!(out.stdout.trim(), "list --output json");
    }

    #[tokio::test]
    async fn test_failure_uses_error_line() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(
            dir.path(),
            "echo 'debug noise' >&2\necho 'Error: uninstall: Release not loaded: demo: release: not found' >&2\nexit 1",
        );

        let err = driver(bin)
            .run(HelmInvocation::new(["uninstall", "demo"]))
            .await
            .unwrap_err();
        match err {
            HelmError::CommandFailed {
                command,
                message,
                stderr,
            } => {
                assert_eq!(command, "uninstall");
                assert_eq!(message, "uninstall: Release not loaded: demo: release: not found");
                assert!(stderr.starts_with("debug noise\n"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "sleep 5");

        let err = driver(bin)
            .run(HelmInvocation::new(["install", "slow", "chart"]).with_timeout(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, HelmError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let err = driver("/nonexistent/helm-bridge/helm".into())
            .run(HelmInvocation::new(["version"]))
            .await
            .unwrap_err();
        assert!(matches!(err, HelmError::Spawn { .. }));
    }
}
