//! List Rook CephCluster resources

use anyhow::{Context, Result};
use kube::api::ListParams;

use crate::config::Settings;
use crate::k8s::{CephClusterSummary, ClusterConnection};
use crate::utils::output::{OutputFormat, render};

/// Handle clusters command
pub async fn list_clusters(
    settings: &Settings,
    all_namespaces: bool,
    format: OutputFormat,
) -> Result<()> {
    let conn = ClusterConnection::connect(&settings.cluster).await?;
    let namespace = (!all_namespaces).then_some(settings.toolbox.namespace.as_str());

    let list = conn
        .ceph_clusters(namespace)
        .list(&ListParams::default())
        .await
        .context("Failed to list CephClusters")?;

    let summaries: Vec<CephClusterSummary> =
        list.items.iter().map(CephClusterSummary::from).collect();

    if let Some(out) = render(&summaries, format)? {
        println!("{}", out);
        return Ok(());
    }

    if summaries.is_empty() {
        match namespace {
            Some(ns) => crate::log_warn!("No CephCluster found in namespace {}", ns),
            None => crate::log_warn!("No CephCluster found"),
        }
        return Ok(());
    }

    println!("{}", format_table(&summaries));
    Ok(())
}

/// Fixed-width table of cluster summaries
pub fn format_table(summaries: &[CephClusterSummary]) -> String {
    let headers = ["NAMESPACE", "NAME", "PHASE", "HEALTH", "VERSION"];
    let rows: Vec<[&str; 5]> = summaries
        .iter()
        .map(|s| {
            [
                s.namespace.as_str(),
                s.name.as_str(),
                s.phase.as_str(),
                s.health.as_str(),
                s.version.as_str(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let line = |cells: &[&str; 5]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| format!("{:<width$}", cell, width = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    std::iter::once(line(&headers))
        .chain(rows.iter().map(line))
        .collect::<Vec<_>>()
        .join("\n")
}
