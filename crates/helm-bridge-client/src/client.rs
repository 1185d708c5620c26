//! Namespace-scoped Helm client
//!
//! A [`HelmClient`] is cheap to build and holds no state between calls; the
//! C ABI builds a fresh one for every operation.

use std::io::Write;
use std::sync::Arc;

use helm_bridge_core::{
    ChartSpec, ReleaseSummary, RepoEntry, split_chart_label, validate_release_name,
};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::HelmConfig;
use crate::crds::{CrdApplier, KubeCrdApplier, parse_crds};
use crate::driver::{CommandDriver, HelmDriver, HelmInvocation, HelmOutput};
use crate::error::{HelmError, Result};
use crate::log::{DiscardSink, LogSink};

/// Which releases a listing includes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StateMask {
    /// Every release regardless of state (includes pending installs)
    #[default]
    All,
    Deployed,
    Failed,
    Pending,
    Superseded,
    Uninstalled,
    Uninstalling,
}

impl StateMask {
    fn flag(&self) -> &'static str {
        match self {
            Self::All => "--all",
            Self::Deployed => "--deployed",
            Self::Failed => "--failed",
            Self::Pending => "--pending",
            Self::Superseded => "--superseded",
            Self::Uninstalled => "--uninstalled",
            Self::Uninstalling => "--uninstalling",
        }
    }
}

/// Options for building a client
#[derive(Clone)]
pub struct ClientOptions {
    /// Namespace every release operation is scoped to
    pub namespace: String,

    /// Where Helm's debug output goes
    pub sink: Arc<dyn LogSink>,
}

impl ClientOptions {
    /// Options for `namespace` with output discarded
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            sink: Arc::new(DiscardSink),
        }
    }

    /// Route Helm's debug output to `sink`
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("namespace", &self.namespace)
            .field("debug", &self.sink.enabled())
            .finish()
    }
}

/// `helm list -o json` element
#[derive(Debug, Deserialize)]
struct ListedRelease {
    name: String,
    namespace: String,
    #[serde(default)]
    updated: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    chart: String,
}

/// `helm status -o json` document (only the fields we project)
#[derive(Debug, Deserialize)]
struct StatusDocument {
    name: String,
    namespace: String,
    #[serde(default)]
    info: StatusInfo,
    #[serde(default)]
    chart: Option<StatusChart>,
}

#[derive(Debug, Default, Deserialize)]
struct StatusInfo {
    #[serde(default)]
    status: String,
    #[serde(default)]
    last_deployed: String,
}

#[derive(Debug, Deserialize)]
struct StatusChart {
    metadata: StatusChartMetadata,
}

#[derive(Debug, Deserialize)]
struct StatusChartMetadata {
    #[serde(default)]
    version: String,
}

impl From<ListedRelease> for ReleaseSummary {
    fn from(listed: ListedRelease) -> Self {
        let (_, version) = split_chart_label(&listed.chart);
        Self {
            version: version.to_string(),
            name: listed.name,
            namespace: listed.namespace,
            status: listed.status,
            last_updated: listed.updated,
        }
    }
}

impl From<StatusDocument> for ReleaseSummary {
    fn from(doc: StatusDocument) -> Self {
        Self {
            name: doc.name,
            version: doc.chart.map(|c| c.metadata.version).unwrap_or_default(),
            namespace: doc.namespace,
            status: doc.info.status,
            last_updated: doc.info.last_deployed,
        }
    }
}

/// Helm client scoped to one namespace
pub struct HelmClient {
    namespace: String,
    sink: Arc<dyn LogSink>,
    driver: Arc<dyn HelmDriver>,
    crd_applier: Arc<dyn CrdApplier>,
}

impl HelmClient {
    /// Create a client that runs the helm executable configured in the environment
    pub fn new(options: ClientOptions) -> Result<Self> {
        let config = HelmConfig::from_env()?;
        Ok(Self::with_config(options, config))
    }

    /// Create a client for an explicit configuration
    pub fn with_config(options: ClientOptions, config: HelmConfig) -> Self {
        Self::with_driver(
            options,
            Arc::new(CommandDriver::new(config.clone())),
            Arc::new(KubeCrdApplier::new(config)),
        )
    }

    /// Create a client over arbitrary driver and CRD applier
    pub fn with_driver(
        options: ClientOptions,
        driver: Arc<dyn HelmDriver>,
        crd_applier: Arc<dyn CrdApplier>,
    ) -> Self {
        Self {
            namespace: options.namespace,
            sink: options.sink,
            driver,
            crd_applier,
        }
    }

    /// Namespace this client is scoped to
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn run(&self, mut invocation: HelmInvocation) -> Result<HelmOutput> {
        if self.sink.enabled() {
            invocation.args.push("--debug".to_string());
        }

        let result = self.driver.run(invocation).await;
        match &result {
            Ok(HelmOutput { stderr, .. }) | Err(HelmError::CommandFailed { stderr, .. }) => {
                self.forward(stderr)
            }
            Err(_) => {}
        }
        result
    }

    fn forward(&self, stderr: &str) {
        if !self.sink.enabled() {
            return;
        }
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            self.sink.log(line);
        }
    }

    // ========== Install ==========

    /// Install a chart as a new release
    #[instrument(skip(self, spec), fields(release = %spec.release_name, chart = %spec.chart_name, namespace = %self.namespace))]
    pub async fn install_chart(&self, spec: &ChartSpec) -> Result<()> {
        spec.validate()?;

        if spec.policy.upgrade_crds {
            self.upgrade_crds(spec).await?;
        }

        let mut invocation = HelmInvocation::new(["install", &spec.release_name, &spec.chart_name])
            .flag("--namespace", spec.namespace.as_str())
            .flag("--timeout", spec.policy.timeout_flag())
            .with_timeout(spec.policy.timeout);

        if spec.has_version() {
            invocation = invocation.flag("--version", spec.version.as_str());
        }
        if spec.policy.wait {
            invocation = invocation.arg("--wait");
        }

        // Kept alive until helm has read it; removed on drop
        let values_file = if spec.has_values() {
            let mut file = tempfile::Builder::new()
                .prefix("helm-bridge-values-")
                .suffix(".yaml")
                .tempfile()?;
            file.write_all(spec.values_yaml.as_bytes())?;
            file.flush()?;
            invocation = invocation.flag("--values", file.path().to_string_lossy().to_string());
            Some(file)
        } else {
            None
        };

        self.run(invocation).await?;
        drop(values_file);

        debug!("release installed");
        Ok(())
    }

    async fn upgrade_crds(&self, spec: &ChartSpec) -> Result<()> {
        let mut invocation = HelmInvocation::new(["show", "crds", &spec.chart_name]);
        if spec.has_version() {
            invocation = invocation.flag("--version", spec.version.as_str());
        }

        let output = self.run(invocation).await?;
        let crds = parse_crds(&output.stdout)?;
        if crds.is_empty() {
            debug!("chart ships no CRDs");
            return Ok(());
        }

        let applied = self.crd_applier.apply(crds).await?;
        debug!(count = applied.len(), "upgraded CRDs");
        Ok(())
    }

    // ========== Uninstall ==========

    /// Uninstall a release by name
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn uninstall_release_by_name(&self, name: &str) -> Result<()> {
        validate_release_name(name)?;
        let invocation =
            HelmInvocation::new(["uninstall", name]).flag("--namespace", self.namespace.as_str());
        self.run(invocation).await?;
        Ok(())
    }

    // ========== Queries ==========

    /// Get a release by name; `None` when Helm reports it as not found
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn get_release(&self, name: &str) -> Result<Option<ReleaseSummary>> {
        validate_release_name(name)?;
        let invocation = HelmInvocation::new(["status", name])
            .flag("--namespace", self.namespace.as_str())
            .flag("--output", "json");

        match self.run(invocation).await {
            Ok(output) => {
                let doc: StatusDocument = serde_json::from_str(&output.stdout)?;
                Ok(Some(doc.into()))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Check if a release exists; lookup failures count as "does not exist"
    pub async fn release_exists(&self, name: &str) -> bool {
        match self.get_release(name).await {
            Ok(release) => release.is_some(),
            Err(e) => {
                debug!(release = name, error = %e, "release lookup failed, treating as absent");
                false
            }
        }
    }

    /// List releases in this namespace matching `mask`
    ///
    /// Passes `--max 0`; helm otherwise stops at 256 releases.
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn list_releases_by_state_mask(&self, mask: StateMask) -> Result<Vec<ReleaseSummary>> {
        let invocation = HelmInvocation::new(["list"])
            .flag("--namespace", self.namespace.as_str())
            .arg(mask.flag())
            .flag("--max", "0")
            .flag("--output", "json");

        let output = self.run(invocation).await?;
        let stdout = output.stdout.trim();
        if stdout.is_empty() {
            return Ok(Vec::new());
        }

        let listed: Vec<ListedRelease> = serde_json::from_str(stdout)?;
        Ok(listed.into_iter().map(ReleaseSummary::from).collect())
    }

    // ========== Repositories ==========

    /// Add a chart repository, replacing an existing entry of the same name
    #[instrument(skip(self))]
    pub async fn add_or_update_chart_repo(&self, repo: &RepoEntry) -> Result<()> {
        let invocation = HelmInvocation::new(["repo", "add", &repo.name, &repo.url])
            .arg("--force-update");
        self.run(invocation).await?;
        Ok(())
    }
}
