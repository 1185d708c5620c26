//! Helm repository index
//!
//! Fetches and queries the `index.yaml` served by an HTTP chart repository.

use std::collections::HashMap;

use helm_bridge_core::CoreError;
use reqwest::Url;
use semver::Version;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::Result;

/// Name of the index file at the repository root
pub const INDEX_FILE: &str = "index.yaml";

/// Repository index
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoIndex {
    #[serde(default)]
    pub api_version: Option<String>,

    /// Chart versions indexed by chart name
    #[serde(default)]
    pub entries: HashMap<String, Vec<ChartEntry>>,
}

/// One chart version in the index
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEntry {
    pub name: String,
    pub version: String,

    #[serde(default)]
    pub app_version: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default)]
    pub deprecated: bool,
}

impl ChartEntry {
    /// Parse version as semver, tolerating a leading `v`
    pub fn parsed_version(&self) -> Option<Version> {
        Version::parse(self.version.trim_start_matches('v')).ok()
    }
}

impl RepoIndex {
    /// Parse an index document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// All indexed versions of a chart
    pub fn versions(&self, chart: &str) -> &[ChartEntry] {
        self.entries.get(chart).map(Vec::as_slice).unwrap_or_default()
    }

    /// Highest stable version of a chart, or the highest pre-release when
    /// nothing stable is published
    pub fn latest_version(&self, chart: &str) -> Option<&ChartEntry> {
        let parsed: Vec<_> = self
            .versions(chart)
            .iter()
            .filter_map(|entry| entry.parsed_version().map(|v| (v, entry)))
            .collect();

        let stable = parsed
            .iter()
            .filter(|(v, _)| v.pre.is_empty())
            .max_by(|a, b| a.0.cmp(&b.0));

        stable
            .or_else(|| parsed.iter().max_by(|a, b| a.0.cmp(&b.0)))
            .map(|(_, entry)| *entry)
    }

    /// Check if `version` of `chart` is published
    pub fn has_version(&self, chart: &str, version: &str) -> bool {
        self.versions(chart).iter().any(|e| e.version == version)
    }
}

/// Location of the index file for a repository URL
pub fn index_url(repo_url: &str) -> Result<Url> {
    let invalid = |reason: String| CoreError::InvalidRepoUrl {
        url: repo_url.to_string(),
        reason,
    };

    let mut base = Url::parse(repo_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", base.scheme())).into());
    }

    // Join relative to the repository path, not its parent
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    Ok(base.join(INDEX_FILE).map_err(|e| invalid(e.to_string()))?)
}

/// Download and parse a repository's index
#[instrument]
pub async fn fetch_repo_index(repo_url: &str) -> Result<RepoIndex> {
    let url = index_url(repo_url)?;
    debug!(%url, "fetching repository index");

    let body = reqwest::get(url).await?.error_for_status()?.text().await?;
    RepoIndex::from_yaml(&body)
}
