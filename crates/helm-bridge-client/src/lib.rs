//! helm-bridge Client - Namespace-scoped Helm operations
//!
//! This crate provides:
//! - **Client**: install, uninstall, status, list and repository operations scoped to one namespace
//! - **Drivers**: the `helm` executable as a subprocess, or an in-memory mock for tests
//! - **CRD Upgrades**: server-side apply of a chart's CRDs before every install
//! - **Release Workflows**: idempotent install/uninstall with structured outcomes
//! - **Repository Index**: fetch and query a repository's `index.yaml`
//! - **Log Sinks**: explicit per-call destinations for Helm's debug output

pub mod client;
pub mod config;
pub mod crds;
pub mod driver;
pub mod error;
pub mod index;
pub mod log;
pub mod release;

pub use client::{ClientOptions, HelmClient, StateMask};
pub use config::HelmConfig;
pub use crds::{CrdApplier, KubeCrdApplier, parse_crds};
pub use driver::{CommandDriver, HelmDriver, HelmInvocation, HelmOutput, MockDriver};
pub use error::{HelmError, Result};
pub use index::{ChartEntry, RepoIndex, fetch_repo_index};
pub use log::{DiscardSink, LogSink, MemorySink, TracingSink, sink_for};
pub use release::{
    ChartVersion, InstallReleaseStatus, UninstallReleaseStatus, install_release_from_repo,
    uninstall_release,
};
