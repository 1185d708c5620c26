//! Error types for helm-bridge-client

use std::time::Duration;

use thiserror::Error;

/// Suffix of Helm's error when a release lookup finds nothing
const RELEASE_NOT_FOUND: &str = "release: not found";

/// Result type for helm-bridge-client operations
pub type Result<T> = std::result::Result<T, HelmError>;

/// Errors that can occur while driving Helm
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HelmError {
    /// The helm executable could not be started
    #[error("failed to run '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// Helm ran and reported a failure
    ///
    /// `message` is Helm's `Error:` line; `stderr` keeps everything Helm
    /// wrote, debug trace included.
    #[error("{message}")]
    CommandFailed {
        command: String,
        message: String,
        stderr: String,
    },

    /// Helm did not finish in time and was killed
    #[error("helm {command} timed out after {}s", .after.as_secs())]
    Timeout { command: String, after: Duration },

    /// Request rejected before reaching Helm
    #[error("invalid request: {0}")]
    InvalidInput(#[from] helm_bridge_core::CoreError),

    /// Invalid client configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Helm produced output we could not decode
    #[error("failed to decode helm output: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (CRDs, repository index) could not be decoded
    #[error("failed to decode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Kubernetes API error while upgrading CRDs
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Kubernetes client configuration error
    #[error("Kubernetes configuration error: {0}")]
    KubeConfig(String),

    /// HTTP error while fetching a repository index
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Async runtime could not be created
    #[error("failed to start async runtime: {0}")]
    Runtime(String),

    /// Release was expected but could not be found
    #[error("failed to find release {name}")]
    NoSuchRelease { name: String },

    /// Release is installed at a different version than requested
    #[error("release {name} ({current_version}) already installed, skipping requested version {requested_version}")]
    ReleaseAlreadyInstalled {
        name: String,
        current_version: String,
        requested_version: String,
    },
}

impl HelmError {
    /// Check if Helm reported that the target release does not exist
    ///
    /// Only Helm's release lookup error counts; missing kubeconfig files,
    /// charts or repositories are real failures.
    pub fn is_not_found(&self) -> bool {
        match self {
            HelmError::CommandFailed { message, .. } => message.ends_with(RELEASE_NOT_FOUND),
            HelmError::NoSuchRelease { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(message: &str) -> HelmError {
        HelmError::CommandFailed {
            command: "status".to_string(),
            message: message.to_string(),
            stderr: format!("Error: {}\n", message),
        }
    }

    #[test]
    fn test_not_found_only_for_missing_release() {
        assert!(failed("release: not found").is_not_found());
        assert!(failed("uninstall: Release not loaded: demo: release: not found").is_not_found());
        assert!(HelmError::NoSuchRelease { name: "demo".to_string() }.is_not_found());

        assert!(!failed("kubeconfig file \"/nope/config\" not found").is_not_found());
        assert!(!failed("INSTALLATION FAILED: repo stable not found").is_not_found());
        assert!(!failed("Kubernetes cluster unreachable").is_not_found());
    }
}
