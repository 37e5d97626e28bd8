//! Check command implementation

use anyhow::{Result, anyhow};

use crate::config::Settings;
use crate::k8s::ClusterConnection;
use crate::utils::preflight::PreflightChecker;

/// Handle check command
pub async fn check(settings: &Settings) -> Result<()> {
    let conn = ClusterConnection::connect(&settings.cluster).await?;

    let mut checker = PreflightChecker::new();
    checker.run_all(&conn, &settings.toolbox).await;

    if checker.display_results() {
        Ok(())
    } else {
        Err(anyhow!("Preflight checks failed"))
    }
}
