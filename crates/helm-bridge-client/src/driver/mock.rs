//! Mock driver for testing
//!
//! This driver answers helm commands from memory, producing the same JSON
//! shapes as the real executable, so client code can be tested without a
//! cluster.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::json;

use super::{HelmDriver, HelmInvocation, HelmOutput};
use crate::error::{HelmError, Result};

/// `updated` timestamp reported by `list`
pub const MOCK_UPDATED: &str = "2024-01-01 00:00:00.000000000 +0000 UTC";
/// `last_deployed` timestamp reported by `status`
pub const MOCK_LAST_DEPLOYED: &str = "2024-01-01T00:00:00Z";
/// Releases `helm list` returns when `--max` is not given
pub const HELM_LIST_DEFAULT_MAX: usize = 256;

#[derive(Debug, Clone)]
struct MockRelease {
    chart: String,
    version: String,
    status: String,
}

#[derive(Debug, Default)]
struct MockState {
    /// namespace -> name -> release
    releases: HashMap<String, BTreeMap<String, MockRelease>>,
    repos: BTreeMap<String, String>,
    crds: HashMap<String, String>,
    failures: HashMap<String, String>,
    invocations: Vec<HelmInvocation>,
    values_seen: Vec<String>,
}

/// In-memory helm for testing
#[derive(Clone, Default)]
pub struct MockDriver {
    state: Arc<RwLock<MockState>>,
}

impl MockDriver {
    /// Create a mock with no releases
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a deployed release
    pub fn with_release(self, namespace: &str, name: &str, chart: &str, version: &str) -> Self {
        self.write().releases.entry(namespace.to_string()).or_default().insert(
            name.to_string(),
            MockRelease {
                chart: chart_base(chart).to_string(),
                version: version.to_string(),
                status: "deployed".to_string(),
            },
        );
        self
    }

    /// Serve CRD documents from `helm show crds <chart>`
    pub fn with_crds(self, chart: &str, crds_yaml: &str) -> Self {
        self.write()
            .crds
            .insert(chart.to_string(), crds_yaml.to_string());
        self
    }

    /// Make every invocation of `command` (e.g. `install`, `repo add`) fail
    pub fn failing(self, command: &str, message: &str) -> Self {
        self.write()
            .failures
            .insert(command.to_string(), message.to_string());
        self
    }

    /// All invocations received so far
    pub fn invocations(&self) -> Vec<HelmInvocation> {
        self.read().invocations.clone()
    }

    /// Contents of every values file passed to `install`
    pub fn values_seen(&self) -> Vec<String> {
        self.read().values_seen.clone()
    }

    /// Registered repositories (name -> url)
    pub fn repos(&self) -> BTreeMap<String, String> {
        self.read().repos.clone()
    }

    /// Count releases across namespaces
    pub fn release_count(&self) -> usize {
        self.read().releases.values().map(BTreeMap::len).sum()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, MockState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn chart_base(chart: &str) -> &str {
    chart.rsplit('/').next().unwrap_or(chart)
}

fn fail(invocation: &HelmInvocation, message: impl Into<String>) -> HelmError {
    let message = message.into();
    HelmError::CommandFailed {
        command: invocation.command(),
        stderr: format!("Error: {}\n", message),
        message,
    }
}

fn ok(stdout: impl Into<String>) -> Result<HelmOutput> {
    Ok(HelmOutput {
        stdout: stdout.into(),
        stderr: String::new(),
    })
}

#[async_trait]
impl HelmDriver for MockDriver {
    async fn run(&self, invocation: HelmInvocation) -> Result<HelmOutput> {
        let mut state = self.write();
        state.invocations.push(invocation.clone());

        let trace = if invocation.has_flag("--debug") {
            format!("mock.go:1: [debug] {} handled\n", invocation.command())
        } else {
            String::new()
        };

        match respond(&mut state, &invocation) {
            Ok(mut output) => {
                output.stderr = trace;
                Ok(output)
            }
            Err(HelmError::CommandFailed {
                command,
                message,
                stderr,
            }) => Err(HelmError::CommandFailed {
                command,
                message,
                stderr: trace + &stderr,
            }),
            Err(e) => Err(e),
        }
    }
}

fn respond(state: &mut MockState, invocation: &HelmInvocation) -> Result<HelmOutput> {
    let command = invocation.command();
    if let Some(message) = state.failures.get(&command) {
        return Err(fail(invocation, message.clone()));
    }

    let namespace = invocation
        .flag_value("--namespace")
        .unwrap_or("default")
        .to_string();
    let positional = |idx: usize| invocation.args.get(idx).cloned().unwrap_or_default();

    match command.as_str() {
        "install" => {
            let name = positional(1);
            let chart = positional(2);
            if let Some(path) = invocation.flag_value("--values") {
                let values = std::fs::read_to_string(path)?;
                state.values_seen.push(values);
            }
            let releases = state.releases.entry(namespace).or_default();
            if releases.contains_key(&name) {
                return Err(fail(
                    invocation,
                    "INSTALLATION FAILED: cannot re-use a name that is still in use",
                ));
            }
            let version = invocation.flag_value("--version").unwrap_or("0.1.0");
            releases.insert(
                name,
                MockRelease {
                    chart: chart_base(&chart).to_string(),
                    version: version.to_string(),
                    status: "deployed".to_string(),
                },
            );
            ok("")
        }
        "uninstall" => {
            let name = positional(1);
            let removed = state
                .releases
                .get_mut(&namespace)
                .and_then(|releases| releases.remove(&name));
            match removed {
                Some(_) => ok(format!("release \"{}\" uninstalled\n", name)),
                None => Err(fail(
                    invocation,
                    format!("uninstall: Release not loaded: {}: release: not found", name),
                )),
            }
        }
        "status" => {
            let name = positional(1);
            let release = state
                .releases
                .get(&namespace)
                .and_then(|releases| releases.get(&name));
            match release {
                Some(release) => ok(json!({
                    "name": name,
                    "namespace": namespace,
                    "version": 1,
                    "info": {
                        "first_deployed": MOCK_LAST_DEPLOYED,
                        "last_deployed": MOCK_LAST_DEPLOYED,
                        "status": release.status,
                    },
                    "chart": {
                        "metadata": { "name": release.chart, "version": release.version }
                    }
                })
                .to_string()),
                None => Err(fail(invocation, "release: not found")),
            }
        }
        "list" => {
            let max = match invocation.flag_value("--max") {
                Some("0") => usize::MAX,
                Some(value) => value.parse().unwrap_or(HELM_LIST_DEFAULT_MAX),
                None => HELM_LIST_DEFAULT_MAX,
            };
            let items: Vec<_> = state
                .releases
                .get(&namespace)
                .map(|releases| {
                    releases
                        .iter()
                        .take(max)
                        .map(|(name, release)| {
                            json!({
                                "name": name,
                                "namespace": namespace,
                                "revision": "1",
                                "updated": MOCK_UPDATED,
                                "status": release.status,
                                "chart": format!("{}-{}", release.chart, release.version),
                                "app_version": "",
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            ok(serde_json::Value::Array(items).to_string())
        }
        "repo add" => {
            let name = positional(2);
            let url = positional(3);
            if state.repos.contains_key(&name) && !invocation.has_flag("--force-update") {
                return Err(fail(
                    invocation,
                    format!("repository name ({}) already exists", name),
                ));
            }
            state.repos.insert(name.clone(), url);
            ok(format!("\"{}\" has been added to your repositories\n", name))
        }
        "show crds" => {
            let chart = positional(2);
            ok(state.crds.get(&chart).cloned().unwrap_or_default())
        }
        other => Err(fail(invocation, format!("unknown command \"{}\" for \"helm\"", other))),
    }
}
