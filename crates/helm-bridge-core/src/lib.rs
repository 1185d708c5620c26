//! helm-bridge Core - Core types shared by the Helm client and its C ABI
//!
//! This crate provides the foundational types used throughout helm-bridge:
//! - `ReleaseSummary`: The read projection of a Helm release
//! - `ChartSpec`: A single install request with its operational policy
//! - `RepoEntry`: A chart repository to register
//! - `Outcome`: The structured result and its single-string wire form

pub mod chart;
pub mod error;
pub mod outcome;
pub mod release;
pub mod repo;

pub use chart::{ChartSpec, InstallPolicy, DEFAULT_INSTALL_TIMEOUT};
pub use error::{CoreError, Result};
pub use outcome::{ERROR_PREFIX, Outcome, to_helm_error};
pub use release::{
    MAX_RELEASE_NAME_LEN, ReleaseStatus, ReleaseSummary, split_chart_label, validate_release_name,
};
pub use repo::RepoEntry;
