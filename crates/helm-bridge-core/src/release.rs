//! Release summary types

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Longest release name Helm accepts
pub const MAX_RELEASE_NAME_LEN: usize = 53;

/// Read projection of a release managed by Helm
///
/// This is the element type of the `list_releases` payload. Every field is
/// plain text so the wire shape stays `{name, version, namespace, status,
/// lastUpdated}` regardless of what Helm reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSummary {
    /// Release name
    pub name: String,

    /// Chart version (not the release revision)
    pub version: String,

    /// Kubernetes namespace
    pub namespace: String,

    /// Status label as reported by Helm
    pub status: String,

    /// Last deployment timestamp, verbatim from Helm
    pub last_updated: String,
}

impl ReleaseSummary {
    /// Parsed status of this release
    pub fn status(&self) -> ReleaseStatus {
        self.status.parse().unwrap_or_default()
    }
}

/// Release status
///
/// Note: This enum is non-exhaustive - Helm may grow new states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum ReleaseStatus {
    #[default]
    Unknown,
    Deployed,
    Uninstalled,
    Superseded,
    Failed,
    Uninstalling,
    PendingInstall,
    PendingUpgrade,
    PendingRollback,
}

impl ReleaseStatus {
    /// Check if this is a pending (transitional) state
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::PendingInstall | Self::PendingUpgrade | Self::PendingRollback | Self::Uninstalling
        )
    }

    /// Label used by Helm for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Deployed => "deployed",
            Self::Uninstalled => "uninstalled",
            Self::Superseded => "superseded",
            Self::Failed => "failed",
            Self::Uninstalling => "uninstalling",
            Self::PendingInstall => "pending-install",
            Self::PendingUpgrade => "pending-upgrade",
            Self::PendingRollback => "pending-rollback",
        }
    }
}

impl std::fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReleaseStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "deployed" => Self::Deployed,
            "uninstalled" => Self::Uninstalled,
            "superseded" => Self::Superseded,
            "failed" => Self::Failed,
            "uninstalling" => Self::Uninstalling,
            "pending-install" => Self::PendingInstall,
            "pending-upgrade" => Self::PendingUpgrade,
            "pending-rollback" => Self::PendingRollback,
            _ => Self::Unknown,
        })
    }
}

/// Validate a release name against Helm's naming rules
///
/// Names are lowercase RFC 1123 subdomains of at most
/// [`MAX_RELEASE_NAME_LEN`] characters: dot-separated labels of
/// alphanumerics and dashes, each starting and ending alphanumeric.
pub fn validate_release_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CoreError::MissingField {
            field: "release name",
        });
    }

    let invalid = |reason: &str| CoreError::InvalidReleaseName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.len() > MAX_RELEASE_NAME_LEN {
        return Err(invalid("longer than 53 characters"));
    }

    for label in name.split('.') {
        let bytes = label.as_bytes();
        let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
            return Err(invalid("empty segment between dots"));
        };
        if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
            return Err(invalid("must start and end with a lowercase letter or digit"));
        }
        if !bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        {
            return Err(invalid("only lowercase letters, digits, '-' and '.' are allowed"));
        }
    }

    Ok(())
}

/// Split a Helm chart label (`<chart>-<version>`) into name and version
///
/// Chart names may contain dashes and versions may carry pre-release
/// suffixes, so the split happens at the first dash whose remainder is a
/// valid semantic version. Labels without a version yield an empty version.
pub fn split_chart_label(label: &str) -> (&str, &str) {
    for (idx, _) in label.match_indices('-') {
        let candidate = &label[idx + 1..];
        let bare = candidate.strip_prefix('v').unwrap_or(candidate);
        if semver::Version::parse(bare).is_ok() {
            return (&label[..idx], candidate);
        }
    }
    (label, "")
}
