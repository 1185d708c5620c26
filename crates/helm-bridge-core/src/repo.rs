//! Chart repository entries

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, Result};

/// A chart repository to register with Helm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEntry {
    /// Local name for the repository
    pub name: String,

    /// Repository URL (HTTP(S), serving `index.yaml`)
    pub url: String,
}

impl RepoEntry {
    /// Create a repository entry, validating name and URL
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let url = url.into();

        if name.trim().is_empty() || name.contains('/') || name.starts_with('-') {
            return Err(CoreError::InvalidRepoName { name });
        }

        let parsed = Url::parse(&url).map_err(|e| CoreError::InvalidRepoUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(CoreError::InvalidRepoUrl {
                    url,
                    reason: format!("unsupported scheme '{}', expected http or https", other),
                });
            }
        }

        Ok(Self { name, url })
    }
}
