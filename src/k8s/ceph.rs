//! Rook CephCluster custom resource (the subset of fields the toolbox reads)

use kube::{CustomResource, ResourceExt, core::GroupVersionKind};
use serde::{Deserialize, Serialize};

pub const CEPH_GROUP: &str = "ceph.rook.io";
pub const CEPH_VERSION: &str = "v1";
pub const CEPH_CLUSTER_KIND: &str = "CephCluster";

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default)]
#[kube(
    group = "ceph.rook.io",
    version = "v1",
    kind = "CephCluster",
    plural = "cephclusters",
    namespaced,
    status = "CephClusterStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct CephClusterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceph_version: Option<CephVersionSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir_host_path: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CephVersionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_unsupported: Option<bool>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CephClusterStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceph: Option<CephHealth>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<ClusterVersion>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CephHealth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct ClusterVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// GVK used for discovery of the CephCluster API
pub fn ceph_cluster_gvk() -> GroupVersionKind {
    GroupVersionKind::gvk(CEPH_GROUP, CEPH_VERSION, CEPH_CLUSTER_KIND)
}

/// One line of `clusters` output
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CephClusterSummary {
    pub name: String,
    pub namespace: String,
    pub phase: String,
    pub health: String,
    pub version: String,
}

impl From<&CephCluster> for CephClusterSummary {
    fn from(cluster: &CephCluster) -> Self {
        let status = cluster.status.as_ref();
        let unknown = || "Unknown".to_string();

        Self {
            name: cluster.name_any(),
            namespace: cluster.namespace().unwrap_or_default(),
            phase: status.and_then(|s| s.phase.clone()).unwrap_or_else(unknown),
            health: status
                .and_then(|s| s.ceph.as_ref())
                .and_then(|c| c.health.clone())
                .unwrap_or_else(unknown),
            version: status
                .and_then(|s| s.version.as_ref())
                .and_then(|v| v.version.clone())
                .unwrap_or_else(unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_status() {
        let cluster: CephCluster = serde_json::from_value(serde_json::json!({
            "apiVersion": "ceph.rook.io/v1",
            "kind": "CephCluster",
            "metadata": { "name": "rook-ceph", "namespace": "rook-ceph" },
            "spec": {
                "cephVersion": { "image": "quay.io/ceph/ceph:v18.2.2" },
                "dataDirHostPath": "/var/lib/rook"
            },
            "status": {
                "phase": "Ready",
                "ceph": { "health": "HEALTH_OK", "lastChecked": "2024-01-01T00:00:00Z" },
                "version": { "version": "18.2.2-0" }
            }
        }))
        .unwrap();

        let summary = CephClusterSummary::from(&cluster);
        assert_eq!(summary.name, "rook-ceph");
        assert_eq!(summary.phase, "Ready");
        assert_eq!(summary.health, "HEALTH_OK");
        assert_eq!(summary.version, "18.2.2-0");
        assert_eq!(
            cluster.spec.data_dir_host_path.as_deref(),
            Some("/var/lib/rook")
        );
    }

    #[test]
    fn test_summary_without_status() {
        let cluster = CephCluster::new("fresh", CephClusterSpec::default());
        let summary = CephClusterSummary::from(&cluster);
        assert_eq!(summary.phase, "Unknown");
        assert_eq!(summary.health, "Unknown");
    }

    #[test]
    fn test_gvk() {
        let gvk = ceph_cluster_gvk();
        assert_eq!(gvk.group, "ceph.rook.io");
        assert_eq!(gvk.kind, "CephCluster");
    }
}
