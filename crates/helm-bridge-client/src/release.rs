//! Release workflows
//!
//! Idempotent install and uninstall on top of [`HelmClient`]: an install of a
//! release that already exists is skipped, and an uninstall of a missing
//! release is not an error.

use std::fmt;

use helm_bridge_core::{ChartSpec, ReleaseSummary, validate_release_name};
use tracing::{debug, info, instrument};

use crate::client::{HelmClient, StateMask};
use crate::error::{HelmError, Result};

/// Version constraint used when none is requested (accepts pre-releases)
pub const DEFAULT_CHART_VERSION: &str = ">0.0.0-0";

/// A chart in a registered repository
#[derive(Debug, Clone, Copy)]
pub struct ChartVersion<'a> {
    pub repo_name: &'a str,
    pub chart_name: &'a str,
    pub chart_version: Option<&'a str>,
}

impl ChartVersion<'_> {
    /// `<repo>/<chart>` reference understood by Helm
    pub fn reference(&self) -> String {
        format!("{}/{}", self.repo_name, self.chart_name)
    }
}

/// What [`install_release_from_repo`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallReleaseStatus {
    /// Already installed at the requested version
    AlreadyInstalledWithVersion {
        release_name: String,
        current_version: String,
        requested_version: String,
    },

    /// Already installed and no version was requested
    AlreadyInstalledUnspecified {
        release_name: String,
        current_version: String,
    },

    Installed(String),
}

impl fmt::Display for InstallReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInstalledWithVersion {
                release_name,
                current_version,
                requested_version,
            } => write!(
                f,
                "The release {} ({}) is already installed (requested {}), skipping.",
                release_name, current_version, requested_version
            ),
            Self::AlreadyInstalledUnspecified {
                release_name,
                current_version,
            } => write!(
                f,
                "The release {} ({}) is already installed and no specific version was requested, skipping.",
                release_name, current_version
            ),
            Self::Installed(release_name) => {
                write!(f, "The release {} was successfully installed.", release_name)
            }
        }
    }
}

/// What [`uninstall_release`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallReleaseStatus {
    NotInstalled(String),
    Uninstalled(String),
}

impl fmt::Display for UninstallReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstalled(name) => write!(f, "The release {} is not installed, skipping.", name),
            Self::Uninstalled(name) => write!(f, "The release {} was successfully uninstalled.", name),
        }
    }
}

/// Install a chart from a registered repository unless the release exists
///
/// A release installed at a different version than requested is an error;
/// it has to be uninstalled first.
#[instrument(skip(client, values_yaml), fields(namespace = %client.namespace()))]
pub async fn install_release_from_repo(
    client: &HelmClient,
    release_name: &str,
    chart: ChartVersion<'_>,
    values_yaml: Option<&str>,
) -> Result<InstallReleaseStatus> {
    if client.release_exists(release_name).await {
        let release = get_release(client, release_name)
            .await?
            .ok_or_else(|| HelmError::NoSuchRelease {
                name: release_name.to_string(),
            })?;
        let current_version = release.version;

        return match chart.chart_version {
            Some(requested) if requested == current_version => {
                Ok(InstallReleaseStatus::AlreadyInstalledWithVersion {
                    release_name: release_name.to_string(),
                    current_version,
                    requested_version: requested.to_string(),
                })
            }
            Some(requested) => Err(HelmError::ReleaseAlreadyInstalled {
                name: release_name.to_string(),
                current_version,
                requested_version: requested.to_string(),
            }),
            None => Ok(InstallReleaseStatus::AlreadyInstalledUnspecified {
                release_name: release_name.to_string(),
                current_version,
            }),
        };
    }

    let version = chart.chart_version.unwrap_or(DEFAULT_CHART_VERSION);
    debug!(release = release_name, version, chart = %chart.reference(), "installing release");

    let spec = ChartSpec::new(release_name, chart.reference(), client.namespace())
        .with_version(version)
        .with_values(values_yaml.unwrap_or_default());
    client.install_chart(&spec).await?;

    Ok(InstallReleaseStatus::Installed(release_name.to_string()))
}

/// Uninstall a release if it exists
#[instrument(skip(client), fields(namespace = %client.namespace()))]
pub async fn uninstall_release(client: &HelmClient, release_name: &str) -> Result<UninstallReleaseStatus> {
    validate_release_name(release_name)?;
    if !client.release_exists(release_name).await {
        info!("The Helm release {} is not installed, skipping.", release_name);
        return Ok(UninstallReleaseStatus::NotInstalled(release_name.to_string()));
    }

    client.uninstall_release_by_name(release_name).await?;
    Ok(UninstallReleaseStatus::Uninstalled(release_name.to_string()))
}

/// Find a release in the namespace listing
pub async fn get_release(client: &HelmClient, release_name: &str) -> Result<Option<ReleaseSummary>> {
    Ok(client
        .list_releases_by_state_mask(StateMask::All)
        .await?
        .into_iter()
        .find(|r| r.name == release_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientOptions;
    use crate::crds::CrdApplier;
    use crate::driver::{HELM_LIST_DEFAULT_MAX, MockDriver};
    use kube::api::DynamicObject;
    use std::sync::Arc;

    struct NoCrds;

    #[async_trait::async_trait]
    impl CrdApplier for NoCrds {
        async fn apply(&self, _crds: Vec<DynamicObject>) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn client(driver: &MockDriver) -> HelmClient {
        HelmClient::with_driver(
            ClientOptions::new("stackable"),
            Arc::new(driver.clone()),
            Arc::new(NoCrds),
        )
    }

    const NGINX: ChartVersion<'static> = ChartVersion {
        repo_name: "stable",
        chart_name: "nginx",
        chart_version: Some("1.2.3"),
    };

    #[tokio::test]
    async fn test_install_then_skip() {
        let driver = MockDriver::new();
        let client = client(&driver);

        let status = install_release_from_repo(&client, "web", NGINX, None).await.unwrap();
        assert_eq!(status, InstallReleaseStatus::Installed("web".to_string()));

        let status = install_release_from_repo(&client, "web", NGINX, None).await.unwrap();
        assert_eq!(
            status.to_string(),
            "The release web (1.2.3) is already installed (requested 1.2.3), skipping."
        );
        assert_eq!(driver.release_count(), 1);
    }

    #[tokio::test]
    async fn test_install_unspecified_version() {
        let driver = MockDriver::new().with_release("stackable", "web", "nginx", "1.0.0");
        let client = client(&driver);

        let chart = ChartVersion { chart_version: None, ..NGINX };
        let status = install_release_from_repo(&client, "web", chart, None).await.unwrap();
        assert_eq!(
            status,
            InstallReleaseStatus::AlreadyInstalledUnspecified {
                release_name: "web".to_string(),
                current_version: "1.0.0".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_install_default_constraint() {
        let driver = MockDriver::new();
        let client = client(&driver);

        let chart = ChartVersion { chart_version: None, ..NGINX };
        install_release_from_repo(&client, "web", chart, Some("replicaCount: 2\n"))
            .await
            .unwrap();

        let install = driver
            .invocations()
            .into_iter()
            .find(|i| i.command() == "install")
            .unwrap();
        assert_eq!(install.flag_value("--version"), Some(DEFAULT_CHART_VERSION));
        assert_eq!(install.args[2], "stable/nginx");
        assert_eq!(driver.values_seen(), vec!["replicaCount: 2\n".to_string()]);
    }

    #[tokio::test]
    async fn test_install_version_conflict() {
        let driver = MockDriver::new().with_release("stackable", "web", "nginx", "1.0.0");
        let client = client(&driver);

        let err = install_release_from_repo(&client, "web", NGINX, None).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "release web (1.0.0) already installed, skipping requested version 1.2.3"
        );
    }

    #[tokio::test]
    async fn test_uninstall_workflow() {
        let driver = MockDriver::new().with_release("stackable", "web", "nginx", "1.0.0");
        let client = client(&driver);

        assert_eq!(
            uninstall_release(&client, "web").await.unwrap(),
            UninstallReleaseStatus::Uninstalled("web".to_string())
        );
        assert_eq!(
            uninstall_release(&client, "web").await.unwrap().to_string(),
            "The release web is not installed, skipping."
        );
    }

    #[tokio::test]
    async fn test_get_release_from_listing() {
        let driver = MockDriver::new()
            .with_release("stackable", "web", "nginx", "1.0.0")
            .with_release("stackable", "db", "postgresql", "12.1.0");
        let client = client(&driver);

        let release = get_release(&client, "db").await.unwrap().unwrap();
        assert_eq!(release.version, "12.1.0");
        assert!(get_release(&client, "cache").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_skip_release_past_first_page() {
        let driver = (0..=HELM_LIST_DEFAULT_MAX).fold(MockDriver::new(), |driver, i| {
            driver.with_release("stackable", &format!("app-{:03}", i), "nginx", "1.2.3")
        });
        let client = client(&driver);
        let last = format!("app-{:03}", HELM_LIST_DEFAULT_MAX);

        let status = install_release_from_repo(&client, &last, NGINX, None).await.unwrap();
        assert!(matches!(status, InstallReleaseStatus::AlreadyInstalledWithVersion { .. }));
        assert!(!driver.invocations().iter().any(|i| i.command() == "install"));
    }

    #[tokio::test]
    async fn test_uninstall_rejects_flag_like_name() {
        let driver = MockDriver::new();
        let client = client(&driver);

        let err = uninstall_release(&client, "--help").await.unwrap_err();
        assert!(matches!(err, HelmError::InvalidInput(_)));
        assert!(driver.invocations().is_empty());
    }
}
