//! Preflight validation of cluster access and the toolbox pod

use colored::Colorize;
use k8s_openapi::api::core::v1::Pod;
use kube::api::ListParams;

use crate::config::ToolboxTarget;
use crate::error::Result;
use crate::k8s::ceph::ceph_cluster_gvk;
use crate::k8s::connection::ClusterConnection;
use crate::k8s::pods::{KubePodLookup, PodSummary, find_toolbox_pod};

/// Result of a preflight check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    Pass(String),
    Warn(String),
    Fail(String),
}

impl CheckResult {
    pub fn is_error(&self) -> bool {
        matches!(self, CheckResult::Fail(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, CheckResult::Warn(_))
    }

    pub fn display(&self) {
        match self {
            CheckResult::Pass(msg) => {
                println!("  {} {}", "✓".green(), msg);
            }
            CheckResult::Warn(msg) => {
                println!("  {} {}", "⚠".yellow(), msg);
            }
            CheckResult::Fail(msg) => {
                println!("  {} {}", "✗".red(), msg);
            }
        }
    }
}

/// Preflight checker for toolbox access
#[derive(Default)]
pub struct PreflightChecker {
    checks: Vec<CheckResult>,
}

impl PreflightChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    /// Run all preflight checks
    pub async fn run_all(&mut self, conn: &ClusterConnection, target: &ToolboxTarget) {
        crate::log_info!("Running preflight checks...");

        self.check_api_server(conn).await;
        self.check_ceph_api(conn, &target.namespace).await;

        let lookup = KubePodLookup::new(conn.client().clone());
        let pod = find_toolbox_pod(&lookup, target).await;
        self.checks.extend(toolbox_pod_checks(&pod, target));
    }

    /// Display results and return whether everything needed is in place
    pub fn display_results(&self) -> bool {
        println!();

        let errors = self.checks.iter().filter(|c| c.is_error()).count();
        let warnings = self.checks.iter().filter(|c| c.is_warning()).count();

        for check in &self.checks {
            check.display();
        }

        println!();

        if errors > 0 {
            println!("{} error(s), {} warning(s)", errors, warnings);
            false
        } else if warnings > 0 {
            println!("{} warning(s). Commands may still work.", warnings);
            true
        } else {
            println!("{}", "All checks passed!".green());
            true
        }
    }

    /// Check if the API server answers
    async fn check_api_server(&mut self, conn: &ClusterConnection) {
        match conn.client().apiserver_version().await {
            Ok(info) => self.checks.push(CheckResult::Pass(format!(
                "Cluster is reachable ({}, Kubernetes {})",
                conn.config().cluster_url,
                info.git_version
            ))),
            Err(e) => self.checks.push(CheckResult::Fail(format!(
                "Cannot connect to cluster at {}: {}",
                conn.config().cluster_url,
                e
            ))),
        }
    }

    /// Check the CephCluster API is served and see what's deployed
    async fn check_ceph_api(&mut self, conn: &ClusterConnection, namespace: &str) {
        let gvk = ceph_cluster_gvk();
        let api = match conn.dynamic(&gvk, Some(namespace)).await {
            Ok(api) => api,
            Err(e) => {
                self.checks.push(CheckResult::Warn(format!("Rook CRDs not found: {}", e)));
                return;
            }
        };

        match api.list(&ListParams::default()).await {
            Ok(list) if list.items.is_empty() => self.checks.push(CheckResult::Warn(format!(
                "No CephCluster in namespace {}",
                namespace
            ))),
            Ok(list) => self.checks.push(CheckResult::Pass(format!(
                "{} CephCluster(s) in namespace {}",
                list.items.len(),
                namespace
            ))),
            Err(e) => self.checks.push(CheckResult::Warn(format!(
                "Could not list CephClusters in {}: {}",
                namespace, e
            ))),
        }
    }
}

/// Turn the toolbox lookup outcome into check results
pub fn toolbox_pod_checks(pod: &Result<Pod>, target: &ToolboxTarget) -> Vec<CheckResult> {
    let pod = match pod {
        Ok(pod) => pod,
        Err(e) => return vec![CheckResult::Fail(e.to_string())],
    };

    let summary = PodSummary::new(pod, &target.container);
    let mut checks = vec![CheckResult::Pass(format!(
        "Toolbox pod {} found",
        summary.name
    ))];

    if summary.phase == "Running" {
        checks.push(CheckResult::Pass("Toolbox pod is running".to_string()));
    } else {
        checks.push(CheckResult::Warn(format!(
            "Toolbox pod is {} (commands will fail until it is Running)",
            summary.phase
        )));
    }

    if summary.has_container {
        checks.push(CheckResult::Pass(format!(
            "Container {} present",
            target.container
        )));
    } else {
        checks.push(CheckResult::Fail(format!(
            "Container {} not in pod (has: {})",
            target.container,
            summary.containers.join(", ")
        )));
    }

    checks
}
