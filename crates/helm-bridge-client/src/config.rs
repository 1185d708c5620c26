//! Client configuration
//!
//! Read from the environment once per client so concurrent callers never
//! observe each other's settings.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{HelmError, Result};

/// Environment variable naming the helm executable
pub const ENV_HELM_BIN: &str = "HELM_BRIDGE_HELM_BIN";
/// Environment variable naming the kubeconfig file (falls back to `KUBECONFIG`)
pub const ENV_KUBECONFIG: &str = "HELM_BRIDGE_KUBECONFIG";
/// Environment variable naming the kubeconfig context
pub const ENV_KUBE_CONTEXT: &str = "HELM_BRIDGE_KUBE_CONTEXT";
/// Environment variable overriding Helm's repositories file
pub const ENV_REPOSITORY_CONFIG: &str = "HELM_REPOSITORY_CONFIG";
/// Environment variable overriding Helm's repository cache directory
pub const ENV_REPOSITORY_CACHE: &str = "HELM_REPOSITORY_CACHE";
/// Environment variable setting the extra seconds granted past a helm timeout
pub const ENV_TIMEOUT_GRACE: &str = "HELM_BRIDGE_TIMEOUT_GRACE_SECS";

/// Default grace period past Helm's own `--timeout` before the process is killed
pub const DEFAULT_TIMEOUT_GRACE: Duration = Duration::from_secs(30);

/// How to reach Helm and the cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmConfig {
    /// helm executable (name on `PATH` or absolute path)
    pub helm_bin: PathBuf,

    /// kubeconfig file; `None` lets Helm and kube pick the default
    pub kubeconfig: Option<PathBuf>,

    /// kubeconfig context; `None` means the current context
    pub kube_context: Option<String>,

    /// Helm repositories file
    pub repository_config: Option<PathBuf>,

    /// Helm repository cache directory
    pub repository_cache: Option<PathBuf>,

    /// Extra time granted past Helm's own timeout
    pub timeout_grace: Duration,
}

impl Default for HelmConfig {
    fn default() -> Self {
        Self {
            helm_bin: PathBuf::from("helm"),
            kubeconfig: None,
            kube_context: None,
            repository_config: None,
            repository_cache: None,
            timeout_grace: DEFAULT_TIMEOUT_GRACE,
        }
    }
}

impl HelmConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();

        if let Some(bin) = non_empty(ENV_HELM_BIN) {
            config.helm_bin = PathBuf::from(bin);
        }
        config.kubeconfig = non_empty(ENV_KUBECONFIG)
            .or_else(|| non_empty("KUBECONFIG"))
            .map(PathBuf::from);
        config.kube_context = non_empty(ENV_KUBE_CONTEXT);
        config.repository_config = non_empty(ENV_REPOSITORY_CONFIG).map(PathBuf::from);
        config.repository_cache = non_empty(ENV_REPOSITORY_CACHE).map(PathBuf::from);

        if let Some(grace) = non_empty(ENV_TIMEOUT_GRACE) {
            let secs: u64 = grace.trim().parse().map_err(|_| {
                HelmError::InvalidConfig(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT_GRACE, grace
                ))
            })?;
            config.timeout_grace = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Flags prepended to every helm invocation
    pub fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(path) = &self.kubeconfig {
            args.push("--kubeconfig".to_string());
            args.push(path.to_string_lossy().to_string());
        }
        if let Some(context) = &self.kube_context {
            args.push("--kube-context".to_string());
            args.push(context.clone());
        }
        if let Some(path) = &self.repository_config {
            args.push("--repository-config".to_string());
            args.push(path.to_string_lossy().to_string());
        }
        if let Some(path) = &self.repository_cache {
            args.push("--repository-cache".to_string());
            args.push(path.to_string_lossy().to_string());
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HelmConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, HelmConfig::default());
        assert!(config.global_args().is_empty());
    }

    #[test]
    fn test_kubeconfig_fallback() {
        let config = HelmConfig::from_lookup(lookup(&[("KUBECONFIG", "/tmp/kc")])).unwrap();
        assert_eq!(config.kubeconfig, Some(PathBuf::from("/tmp/kc")));

        let config = HelmConfig::from_lookup(lookup(&[
            ("KUBECONFIG", "/tmp/kc"),
            (ENV_KUBECONFIG, "/tmp/bridge"),
        ]))
        .unwrap();
        assert_eq!(config.kubeconfig, Some(PathBuf::from("/tmp/bridge")));
    }

    #[test]
    fn test_global_args() {
        let config = HelmConfig::from_lookup(lookup(&[
            (ENV_HELM_BIN, "/opt/helm"),
            (ENV_KUBE_CONTEXT, "kind-dev"),
            (ENV_REPOSITORY_CONFIG, "/tmp/repos.yaml"),
        ]))
        .unwrap();

        assert_eq!(config.helm_bin, PathBuf::from("/opt/helm"));
        assert_eq!(
            config.global_args(),
            vec![
                "--kube-context",
                "kind-dev",
                "--repository-config",
                "/tmp/repos.yaml"
            ]
        );
    }

    #[test]
    fn test_invalid_grace() {
        let err = HelmConfig::from_lookup(lookup(&[(ENV_TIMEOUT_GRACE, "soon")])).unwrap_err();
        assert!(matches!(err, HelmError::InvalidConfig(_)));
    }
}
