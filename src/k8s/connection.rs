//! Cluster credentials and client handles

use k8s_openapi::api::core::v1::Pod;
use kube::{
    Client, Config,
    api::{Api, DynamicObject},
    config::{KubeConfigOptions, Kubeconfig},
    core::GroupVersionKind,
    discovery,
};

use crate::config::ClusterSettings;
use crate::error::{BoxError, Result, ToolboxError};
use crate::k8s::ceph::CephCluster;

/// Resolved cluster configuration plus the client built from it.
///
/// Built fresh for every invocation and dropped with it; nothing is cached.
#[derive(Clone)]
pub struct ClusterConnection {
    config: Config,
    client: Client,
}

impl ClusterConnection {
    /// Load credentials and build the client, failing on the first error
    pub async fn connect(settings: &ClusterSettings) -> Result<Self> {
        let config = load_config(settings).await?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        tracing::debug!(
            "Building client for {} (default namespace {})",
            config.cluster_url,
            config.default_namespace
        );
        let client = Client::try_from(config.clone())
            .map_err(|source| ToolboxError::ClientBuild { source })?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Core API handle for pods in a namespace
    pub fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }

    /// Typed handle for Rook CephCluster resources
    pub fn ceph_clusters(&self, namespace: Option<&str>) -> Api<CephCluster> {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }

    /// Untyped handle for any kind the server advertises
    pub async fn dynamic(
        &self,
        gvk: &GroupVersionKind,
        namespace: Option<&str>,
    ) -> Result<Api<DynamicObject>> {
        let (resource, _caps) = discovery::pinned_kind(&self.client, gvk)
            .await
            .map_err(|source| ToolboxError::Discovery {
                group: gvk.group.clone(),
                version: gvk.version.clone(),
                kind: gvk.kind.clone(),
                source,
            })?;

        Ok(match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &resource),
            None => Api::all_with(self.client.clone(), &resource),
        })
    }
}

/// Resolve the kubeconfig, honouring an explicit path and/or context
pub async fn load_config(settings: &ClusterSettings) -> Result<Config> {
    let options = KubeConfigOptions {
        context: settings.context.clone(),
        ..Default::default()
    };

    let selection = (&settings.kubeconfig, &settings.context);
    let loaded: std::result::Result<Config, BoxError> = match selection {
        (None, None) => Config::infer().await.map_err(|e| e.into()),
        (Some(path), _) => {
            tracing::debug!("Reading kubeconfig from {}", path.display());
            match Kubeconfig::read_from(path) {
                Ok(kubeconfig) => Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| e.into()),
                Err(e) => Err(e.into()),
            }
        }
        (None, Some(_)) => Config::from_kubeconfig(&options).await.map_err(|e| e.into()),
    };

    loaded.map_err(|source| ToolboxError::ConfigLoad { source })
}
