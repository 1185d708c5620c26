//! Install request and operational policy

use std::time::Duration;

use crate::error::{CoreError, Result};
use crate::release::validate_release_name;

/// Timeout applied to every install made through the C ABI (10 minutes)
pub const DEFAULT_INSTALL_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Operational policy applied to an install
///
/// The C ABI always uses [`InstallPolicy::default`]; only in-process callers
/// can pick something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallPolicy {
    /// Upgrade custom resource definitions shipped by the chart before install
    pub upgrade_crds: bool,

    /// Wait for the release's resources to become ready
    pub wait: bool,

    /// Upper bound for the whole operation
    pub timeout: Duration,
}

impl Default for InstallPolicy {
    fn default() -> Self {
        Self {
            upgrade_crds: true,
            wait: true,
            timeout: DEFAULT_INSTALL_TIMEOUT,
        }
    }
}

impl InstallPolicy {
    /// Timeout rendered the way the helm CLI expects it (`600s`)
    pub fn timeout_flag(&self) -> String {
        format!("{}s", self.timeout.as_secs().max(1))
    }
}

/// A single chart installation request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSpec {
    /// Release name
    pub release_name: String,

    /// Chart reference (`repo/chart`, a path, or an OCI reference)
    pub chart_name: String,

    /// Chart version; empty means "latest"
    pub version: String,

    /// Values override document, passed through as-is
    pub values_yaml: String,

    /// Target namespace
    pub namespace: String,

    /// Operational policy
    pub policy: InstallPolicy,
}

impl ChartSpec {
    /// Create a request with the fixed install policy
    pub fn new(
        release_name: impl Into<String>,
        chart_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            release_name: release_name.into(),
            chart_name: chart_name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Pin the chart version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Attach a values document
    pub fn with_values(mut self, values_yaml: impl Into<String>) -> Self {
        self.values_yaml = values_yaml.into();
        self
    }

    /// Override the operational policy
    pub fn with_policy(mut self, policy: InstallPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check if a values document was supplied
    pub fn has_values(&self) -> bool {
        !self.values_yaml.trim().is_empty()
    }

    /// Check if a specific version was requested
    pub fn has_version(&self) -> bool {
        !self.version.trim().is_empty()
    }

    /// Validate the request before anything is sent to Helm
    pub fn validate(&self) -> Result<()> {
        validate_release_name(&self.release_name)?;
        if self.chart_name.trim().is_empty() {
            return Err(CoreError::MissingField { field: "chart name" });
        }
        if self.chart_name.starts_with('-') {
            return Err(CoreError::InvalidChartRef {
                chart: self.chart_name.clone(),
            });
        }
        if self.namespace.trim().is_empty() {
            return Err(CoreError::MissingField { field: "namespace" });
        }
        if self.has_values() {
            serde_yaml::from_str::<serde_yaml::Value>(&self.values_yaml)?;
        }
        Ok(())
    }
}
