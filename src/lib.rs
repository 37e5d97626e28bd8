//! Run commands in the Rook/Ceph toolbox pod
//!
//! Finds the toolbox pod by label, execs a command in its container over
//! the Kubernetes exec sub-resource, and hands back what it printed.

pub mod commands;
pub mod config;
pub mod error;
pub mod k8s;
pub mod utils;

pub use config::{Settings, ToolboxTarget};
pub use error::{Result, ToolboxError};
pub use k8s::{ExecutionResult, PodCommandRunner};

/// Run `command` in the toolbox pod with a fresh cluster connection and
/// return its captured output.
pub async fn run_in_toolbox(settings: &Settings, command: &str) -> Result<ExecutionResult> {
    let runner = PodCommandRunner::connect(settings).await?;
    runner.run(command).await
}
