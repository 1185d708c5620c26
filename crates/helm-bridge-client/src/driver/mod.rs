//! Drivers that execute Helm commands
//!
//! helm-bridge talks to Helm through the [`HelmDriver`] seam:
//! - **Command** (default): runs the `helm` executable as a subprocess
//! - **Mock**: answers from memory, for tests without a cluster

mod command;
mod mock;

pub use command::CommandDriver;
pub use mock::{HELM_LIST_DEFAULT_MAX, MOCK_LAST_DEPLOYED, MOCK_UPDATED, MockDriver};

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{HelmError, Result};

/// One helm command line (without the executable)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmInvocation {
    /// Arguments, starting with the subcommand
    pub args: Vec<String>,

    /// Helm's own timeout; the driver adds its grace period on top
    pub timeout: Option<Duration>,
}

impl HelmInvocation {
    /// Create an invocation from arguments
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            timeout: None,
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a flag with its value
    pub fn flag(mut self, flag: &str, value: impl Into<String>) -> Self {
        self.args.push(flag.to_string());
        self.args.push(value.into());
        self
    }

    /// Bound the invocation
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Human-readable subcommand (`install`, `repo add`, ...)
    pub fn command(&self) -> String {
        match self.args.first().map(String::as_str) {
            Some(group @ ("repo" | "show")) => match self.args.get(1) {
                Some(sub) => format!("{} {}", group, sub),
                None => group.to_string(),
            },
            Some(first) => first.to_string(),
            None => String::new(),
        }
    }

    /// Value following `flag`, if present
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|idx| self.args.get(idx + 1))
            .map(String::as_str)
    }

    /// Check if `flag` is present
    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }
}

/// Captured output of a successful helm command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelmOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes helm commands
///
/// Implementations must be Send + Sync; a fresh client may be built on any thread.
#[async_trait]
pub trait HelmDriver: Send + Sync {
    /// Run one command; a non-zero exit is reported as [`HelmError::CommandFailed`]
    async fn run(&self, invocation: HelmInvocation) -> Result<HelmOutput>;
}

/// Extract the failure description from Helm's stderr
///
/// Helm reports fatal errors on a line starting with `Error: `; debug lines
/// may precede it. Falls back to the whole trimmed stderr.
pub fn failure_message(stderr: &str, status: Option<i32>) -> String {
    if let Some(line) = stderr
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix("Error: "))
    {
        return line.trim().to_string();
    }

    let trimmed = stderr.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    match status {
        Some(code) => format!("helm exited with status {}", code),
        None => "helm was terminated by a signal".to_string(),
    }
}

/// Build the error for a failed invocation
pub(crate) fn command_failed(invocation: &HelmInvocation, stderr: &str, status: Option<i32>) -> HelmError {
    HelmError::CommandFailed {
        command: invocation.command(),
        message: failure_message(stderr, status),
        stderr: stderr.to_string(),
    }
}
