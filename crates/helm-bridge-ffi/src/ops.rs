//! Boundary operations on decoded arguments
//!
//! Every call builds its own client and a private current-thread runtime, runs
//! exactly one client action, and reports an [`Outcome`]. Nothing is shared
//! between calls.

use std::future::Future;
use std::sync::Arc;

use helm_bridge_client::{ClientOptions, HelmClient, HelmError, LogSink, StateMask, sink_for};
use helm_bridge_core::{ChartSpec, Outcome, RepoEntry};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::error::BoundaryError;

/// Namespace used for repository operations
const REPO_NAMESPACE: &str = "default";

fn client(namespace: &str, sink: Arc<dyn LogSink>) -> Result<HelmClient, BoundaryError> {
    Ok(HelmClient::new(ClientOptions::new(namespace).with_sink(sink))?)
}

fn block_on<F: Future>(future: F) -> Result<F::Output, BoundaryError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| BoundaryError::Runtime(e.to_string()))?;
    Ok(runtime.block_on(future))
}

fn report(operation: &str, result: Result<(), BoundaryError>) -> Outcome {
    if let Err(e) = &result {
        error!(operation, error = %e, "helm operation failed");
    }
    Outcome::from_unit(result)
}

/// Install a chart with the fixed policy (upgrade CRDs, wait, 10 minutes)
pub fn install(
    release_name: &str,
    chart_name: &str,
    chart_version: &str,
    values_yaml: &str,
    namespace: &str,
    suppress_output: bool,
) -> Outcome {
    let spec = ChartSpec::new(release_name, chart_name, namespace)
        .with_version(chart_version)
        .with_values(values_yaml);

    let result = client(namespace, sink_for(suppress_output))
        .and_then(|client| Ok(block_on(client.install_chart(&spec))??));
    report("install", result)
}

/// Uninstall a release
pub fn uninstall(release_name: &str, namespace: &str, suppress_output: bool) -> Outcome {
    let result = client(namespace, sink_for(suppress_output))
        .and_then(|client| Ok(block_on(client.uninstall_release_by_name(release_name))??));
    report("uninstall", result)
}

/// Check whether a release exists; any failure reads as "no"
pub fn exists(release_name: &str, namespace: &str) -> bool {
    match client(namespace, sink_for(true))
        .and_then(|client| block_on(async move { client.release_exists(release_name).await }))
    {
        Ok(found) => found,
        Err(e) => {
            debug!(release = release_name, error = %e, "existence check failed");
            false
        }
    }
}

/// List every release in the namespace as a JSON array of summaries
pub fn list(namespace: &str) -> Outcome {
    let result = client(namespace, sink_for(true)).and_then(|client| {
        Ok(block_on(client.list_releases_by_state_mask(StateMask::All))??)
    });

    match result {
        Ok(releases) => Outcome::json(&releases),
        Err(e) => {
            error!(operation = "list", error = %e, "helm operation failed");
            Outcome::failure(e)
        }
    }
}

/// Add a chart repository, updating it if the name is taken
pub fn add_repo(repo_name: &str, repo_url: &str) -> Outcome {
    let result = RepoEntry::new(repo_name, repo_url)
        .map_err(|e| BoundaryError::from(HelmError::from(e)))
        .and_then(|repo| {
            let client = client(REPO_NAMESPACE, sink_for(true))?;
            Ok(block_on(client.add_or_update_chart_repo(&repo))??)
        });
    report("add_repo", result)
}

/// Install a `tracing` subscriber writing to stderr
///
/// `None` uses `RUST_LOG`, falling back to `info`.
pub fn init_logging(filter: Option<&str>) -> Outcome {
    let env_filter = match filter {
        Some(directives) => match EnvFilter::try_new(directives) {
            Ok(filter) => filter,
            Err(e) => return Outcome::failure(BoundaryError::Logging(e.to_string())),
        },
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| BoundaryError::Logging(e.to_string()));
    Outcome::from_unit(result)
}
