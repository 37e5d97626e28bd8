//! Toolbox pod lookup

use std::future::Future;
use std::time::Duration;

use k8s_openapi::api::core::v1::Pod;
use kube::{
    Client, ResourceExt,
    api::{Api, ListParams},
    runtime::wait::{await_condition, conditions},
};
use serde::Serialize;

use crate::config::ToolboxTarget;
use crate::error::{BoxError, Result, ToolboxError};

/// Source of pods for a namespace + label selector query
pub trait PodLookup {
    /// List pods in the order the API server returns them
    fn list_pods(
        &self,
        namespace: &str,
        selector: &str,
    ) -> impl Future<Output = std::result::Result<Vec<Pod>, BoxError>>;

    /// Block until the named pod reports the Running phase
    fn wait_until_running(
        &self,
        namespace: &str,
        name: &str,
        limit: Duration,
    ) -> impl Future<Output = Result<()>>;
}

/// Pod lookup backed by the core API
#[derive(Clone)]
pub struct KubePodLookup {
    client: Client,
}

impl KubePodLookup {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PodLookup for KubePodLookup {
    async fn list_pods(
        &self,
        namespace: &str,
        selector: &str,
    ) -> std::result::Result<Vec<Pod>, BoxError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = pods.list(&ListParams::default().labels(selector)).await?;
        Ok(list.items)
    }

    async fn wait_until_running(&self, namespace: &str, name: &str, limit: Duration) -> Result<()> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let running = await_condition(pods, name, conditions::is_pod_running());

        let not_ready = |reason: String| ToolboxError::PodNotReady {
            namespace: namespace.to_string(),
            name: name.to_string(),
            reason,
        };

        match tokio::time::timeout(limit, running).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(not_ready(e.to_string())),
            Err(_) => Err(not_ready(format!("not running after {}s", limit.as_secs()))),
        }
    }
}

/// Select the first pod matching the target's selector.
///
/// Pods are taken in API order, which for a namespaced list is by name.
pub async fn find_toolbox_pod<L: PodLookup>(lookup: &L, target: &ToolboxTarget) -> Result<Pod> {
    let pods = lookup
        .list_pods(&target.namespace, &target.label_selector)
        .await
        .map_err(|source| ToolboxError::PodList {
            namespace: target.namespace.clone(),
            selector: target.label_selector.clone(),
            source,
        })?;

    if pods.len() > 1 {
        tracing::debug!(
            "{} pods match '{}' in {}, using the first",
            pods.len(),
            target.label_selector,
            target.namespace
        );
    }

    pods.into_iter()
        .next()
        .ok_or_else(|| ToolboxError::NoMatchingPod {
            namespace: target.namespace.clone(),
            selector: target.label_selector.clone(),
        })
}

/// What the `pod` command reports about the selected pod
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PodSummary {
    pub name: String,
    pub namespace: String,
    pub phase: String,
    pub node: Option<String>,
    pub containers: Vec<String>,
    pub has_container: bool,
}

impl PodSummary {
    pub fn new(pod: &Pod, container: &str) -> Self {
        let containers: Vec<String> = pod
            .spec
            .as_ref()
            .map(|spec| spec.containers.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default();

        Self {
            name: pod.name_any(),
            namespace: pod.namespace().unwrap_or_default(),
            phase: pod_phase(pod),
            node: pod.spec.as_ref().and_then(|s| s.node_name.clone()),
            has_container: containers.iter().any(|c| c == container),
            containers,
        }
    }
}

pub fn pod_phase(pod: &Pod) -> String {
    pod.status
        .as_ref()
        .and_then(|s| s.phase.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeLookup, pod};
    use super::*;

    #[tokio::test]
    async fn test_first_pod_is_selected() {
        let lookup = FakeLookup::with_pods(&["rook-ceph-tools-abcde", "rook-ceph-tools-zzzzz"]);
        let target = ToolboxTarget::default();

        let pod = find_toolbox_pod(&lookup, &target).await.unwrap();
        assert_eq!(pod.name_any(), "rook-ceph-tools-abcde");

        let queries = lookup.queries.borrow();
        assert_eq!(
            queries.as_slice(),
            &[("rook-ceph".to_string(), "app=rook-ceph-tools".to_string())]
        );
    }

    #[tokio::test]
    async fn test_no_pods_is_error_not_panic() {
        let lookup = FakeLookup::default();
        let target = ToolboxTarget::default();

        let err = find_toolbox_pod(&lookup, &target).await.unwrap_err();
        assert!(matches!(err, ToolboxError::NoMatchingPod { .. }));
        assert!(err.to_string().contains("no matching pod"));
    }

    #[tokio::test]
    async fn test_list_failure_is_wrapped() {
        let lookup = FakeLookup {
            fail_with: Some("pods is forbidden".to_string()),
            ..Default::default()
        };
        let target = ToolboxTarget::new("storage", "app=tools", "tools");

        let err = find_toolbox_pod(&lookup, &target).await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("failed to get toolbox pod"));
        assert!(msg.contains("storage"));
        assert!(msg.contains("pods is forbidden"));
    }

    #[test]
    fn test_pod_summary() {
        let summary = PodSummary::new(&pod("rook-ceph-tools-abcde"), "rook-ceph-tools");
        assert_eq!(summary.name, "rook-ceph-tools-abcde");
        assert_eq!(summary.namespace, "rook-ceph");
        assert_eq!(summary.phase, "Running");
        assert_eq!(summary.node.as_deref(), Some("node-a"));
        assert!(summary.has_container);

        let other = PodSummary::new(&pod("rook-ceph-tools-abcde"), "sidecar");
        assert!(!other.has_container);
    }
}
