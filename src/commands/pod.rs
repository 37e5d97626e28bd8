//! Show which pod commands would run in

use anyhow::Result;

use crate::config::Settings;
use crate::k8s::pods::{KubePodLookup, PodSummary, find_toolbox_pod};
use crate::k8s::ClusterConnection;
use crate::utils::output::{OutputFormat, render};

/// Handle pod command
pub async fn show_pod(settings: &Settings, format: OutputFormat) -> Result<()> {
    let conn = ClusterConnection::connect(&settings.cluster).await?;
    let lookup = KubePodLookup::new(conn.client().clone());
    let pod = find_toolbox_pod(&lookup, &settings.toolbox).await?;
    let summary = PodSummary::new(&pod, &settings.toolbox.container);

    match render(&summary, format)? {
        Some(out) => println!("{}", out),
        None => print_summary(&summary, &settings.toolbox.container),
    }

    Ok(())
}

fn print_summary(summary: &PodSummary, container: &str) {
    println!("Pod:        {}/{}", summary.namespace, summary.name);
    println!("Phase:      {}", summary.phase);
    println!("Node:       {}", summary.node.as_deref().unwrap_or("<unscheduled>"));
    println!("Containers: {}", summary.containers.join(", "));
    if !summary.has_container {
        crate::log_warn!("Container {} is not part of this pod", container);
    }
}
