//! CRD upgrades ahead of an install
//!
//! `helm install` only creates CRDs that do not exist yet. To honour the
//! "always upgrade CRDs" policy the chart's CRDs are read with
//! `helm show crds` and server-side applied before the install runs.

use async_trait::async_trait;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::{
    Client,
    api::{Api, DynamicObject, Patch, PatchParams},
    config::{KubeConfigOptions, Kubeconfig},
    discovery::ApiResource,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::HelmConfig;
use crate::error::{HelmError, Result};

/// Field manager for CRD operations
const CRD_FIELD_MANAGER: &str = "helm-bridge";

/// Applies CRD manifests to the cluster
#[async_trait]
pub trait CrdApplier: Send + Sync {
    /// Apply every manifest, returning the names that were applied
    async fn apply(&self, crds: Vec<DynamicObject>) -> Result<Vec<String>>;
}

/// Server-side applies CRDs through the Kubernetes API
#[derive(Debug, Clone)]
pub struct KubeCrdApplier {
    config: HelmConfig,
}

impl KubeCrdApplier {
    /// Create an applier reaching the cluster Helm is configured for
    pub fn new(config: HelmConfig) -> Self {
        Self { config }
    }

    async fn client(&self) -> Result<Client> {
        let options = KubeConfigOptions {
            context: self.config.kube_context.clone(),
            ..Default::default()
        };

        let config = match &self.config.kubeconfig {
            Some(path) => {
                let kubeconfig = Kubeconfig::read_from(path)
                    .map_err(|e| HelmError::KubeConfig(e.to_string()))?;
                kube::Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| HelmError::KubeConfig(e.to_string()))?
            }
            None if options.context.is_some() => kube::Config::from_kubeconfig(&options)
                .await
                .map_err(|e| HelmError::KubeConfig(e.to_string()))?,
            None => kube::Config::infer()
                .await
                .map_err(|e| HelmError::KubeConfig(e.to_string()))?,
        };

        Ok(Client::try_from(config)?)
    }
}

#[async_trait]
impl CrdApplier for KubeCrdApplier {
    async fn apply(&self, crds: Vec<DynamicObject>) -> Result<Vec<String>> {
        if crds.is_empty() {
            return Ok(Vec::new());
        }

        // CRDs are cluster-scoped
        let api: Api<DynamicObject> = Api::all_with(
            self.client().await?,
            &ApiResource::erase::<CustomResourceDefinition>(&()),
        );
        let params = PatchParams::apply(CRD_FIELD_MANAGER).force();

        let mut applied = Vec::with_capacity(crds.len());
        for crd in crds {
            let name = crd.metadata.name.clone().ok_or_else(|| {
                HelmError::KubeConfig("CRD missing metadata.name".to_string())
            })?;
            api.patch(&name, &params, &Patch::Apply(&crd)).await?;
            info!(crd = %name, "applied CRD");
            applied.push(name);
        }

        Ok(applied)
    }
}

/// Parse `helm show crds` output into CRD objects
///
/// Empty documents and non-CRD documents are skipped.
pub fn parse_crds(manifest: &str) -> Result<Vec<DynamicObject>> {
    let mut crds = Vec::new();

    for document in serde_yaml::Deserializer::from_str(manifest) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }

        let kind = value.get("kind").and_then(serde_yaml::Value::as_str);
        if kind != Some("CustomResourceDefinition") {
            debug!(?kind, "skipping non-CRD document");
            continue;
        }

        crds.push(serde_yaml::from_value(value)?);
    }

    Ok(crds)
}
