//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use helm_bridge_client::HelmError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Helm ran and failed
    #[error("{message}")]
    #[diagnostic(code(helm_bridge::cli::helm))]
    Helm {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The release does not exist
    #[error("{message}")]
    #[diagnostic(code(helm_bridge::cli::not_found))]
    NotFound { message: String },

    /// Helm was killed after the install timeout
    #[error("{message}")]
    #[diagnostic(
        code(helm_bridge::cli::timeout),
        help("Installs wait up to 10 minutes for resources to become ready")
    )]
    Timeout { message: String },

    /// Invalid arguments or request
    #[error("Invalid input: {message}")]
    #[diagnostic(code(helm_bridge::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (values file unreadable, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(helm_bridge::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(helm_bridge::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Helm { .. } => exit_codes::HELM_ERROR,
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::Timeout { .. } => exit_codes::TIMEOUT,
            CliError::Input { .. } => exit_codes::USAGE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an input error (user provided invalid input)
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: None,
        }
    }

    /// Create an input error with help text
    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<HelmError> for CliError {
    fn from(err: HelmError) -> Self {
        let message = err.to_string();
        match err {
            HelmError::Timeout { .. } => CliError::Timeout { message },
            HelmError::InvalidInput(e) => CliError::input(e.to_string()),
            HelmError::InvalidConfig(e) => CliError::input(e),
            HelmError::ReleaseAlreadyInstalled { name, .. } => CliError::input_with_help(
                message,
                format!("Run 'helm-bridge uninstall {}' first", name),
            ),
            HelmError::Spawn { .. } => CliError::Helm {
                message,
                help: Some(
                    "Set --helm-bin or HELM_BRIDGE_HELM_BIN to the helm executable".to_string(),
                ),
            },
            HelmError::Io(_) => CliError::Io { message },
            HelmError::Runtime(_) => CliError::internal(message),
            ref e if e.is_not_found() => CliError::NotFound { message },
            _ => CliError::Helm {
                message,
                help: None,
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_exit_codes_from_helm_errors() {
        let not_found: CliError = HelmError::CommandFailed {
            command: "uninstall".to_string(),
            message: "uninstall: Release not loaded: demo: release: not found".to_string(),
            stderr: String::new(),
        }
        .into();
        assert_eq!(not_found.exit_code(), exit_codes::NOT_FOUND);

        let timeout: CliError = HelmError::Timeout {
            command: "install".to_string(),
            after: Duration::from_secs(630),
        }
        .into();
        assert_eq!(timeout.exit_code(), exit_codes::TIMEOUT);
        assert_eq!(timeout.to_string(), "helm install timed out after 630s");

        let conflict: CliError = HelmError::ReleaseAlreadyInstalled {
            name: "web".to_string(),
            current_version: "1.0.0".to_string(),
            requested_version: "1.2.3".to_string(),
        }
        .into();
        assert_eq!(conflict.exit_code(), exit_codes::USAGE_ERROR);

        let failed: CliError = HelmError::CommandFailed {
            command: "install".to_string(),
            message: "INSTALLATION FAILED: cannot re-use a name that is still in use".to_string(),
            stderr: String::new(),
        }
        .into();
        assert_eq!(failed.exit_code(), exit_codes::HELM_ERROR);

        let kubeconfig: CliError = HelmError::CommandFailed {
            command: "status".to_string(),
            message: "kubeconfig file \"/nope/config\" not found".to_string(),
            stderr: String::new(),
        }
        .into();
        assert_eq!(kubeconfig.exit_code(), exit_codes::HELM_ERROR);

        let invalid_name: CliError = HelmError::from(helm_bridge_core::CoreError::InvalidReleaseName {
            name: "--help".to_string(),
            reason: "must start and end with a lowercase letter or digit".to_string(),
        })
        .into();
        assert_eq!(invalid_name.exit_code(), exit_codes::USAGE_ERROR);
    }
}
