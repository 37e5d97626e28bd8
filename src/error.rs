//! Error types for toolbox operations

use std::time::Duration;

use thiserror::Error;

/// Boxed cause carried by errors that cross the cluster seams
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while running a command in the toolbox pod
#[derive(Error, Debug)]
pub enum ToolboxError {
    #[error("failed to load cluster configuration: {source}")]
    ConfigLoad {
        #[source]
        source: BoxError,
    },

    #[error("failed to build cluster client: {source}")]
    ClientBuild {
        #[source]
        source: kube::Error,
    },

    #[error(
        "failed to get toolbox pod in namespace '{namespace}' (selector '{selector}'): {source}"
    )]
    PodList {
        namespace: String,
        selector: String,
        #[source]
        source: BoxError,
    },

    #[error("no matching pod in namespace '{namespace}' for selector '{selector}'")]
    NoMatchingPod { namespace: String, selector: String },

    #[error("pod {namespace}/{name} did not become ready: {reason}")]
    PodNotReady {
        namespace: String,
        name: String,
        reason: String,
    },

    #[error("command is empty")]
    EmptyCommand,

    #[error("invalid command '{command}': {reason}")]
    InvalidCommand { command: String, reason: String },

    #[error("failed to create exec session for pod {pod}: {source}")]
    ExecSetup {
        pod: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to run command in pod {pod}: {source}")]
    Stream {
        pod: String,
        #[source]
        source: BoxError,
    },

    /// `pod` is unset when the command was cancelled before a pod was chosen
    #[error("command was cancelled{}", in_pod(.pod))]
    Cancelled { pod: Option<String> },

    #[error("command in pod {pod} timed out after {}s", .timeout.as_secs())]
    TimedOut { pod: String, timeout: Duration },

    #[error("API {group}/{version} {kind} is not served by the cluster: {source}")]
    Discovery {
        group: String,
        version: String,
        kind: String,
        #[source]
        source: kube::Error,
    },

    #[error("{action} failed: {source}")]
    Kube {
        action: String,
        #[source]
        source: kube::Error,
    },
}

impl ToolboxError {
    /// Wrap a kube API failure with a short description of what was attempted
    pub fn kube(action: impl Into<String>, source: kube::Error) -> Self {
        Self::Kube {
            action: action.into(),
            source,
        }
    }
}

pub type Result<T, E = ToolboxError> = std::result::Result<T, E>;

fn in_pod(pod: &Option<String>) -> String {
    match pod {
        Some(pod) => format!(" in pod {}", pod),
        None => " before it started".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_pod_message() {
        let err = ToolboxError::NoMatchingPod {
            namespace: "rook-ceph".to_string(),
            selector: "app=rook-ceph-tools".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("no matching pod"));
        assert!(msg.contains("rook-ceph"));
        assert!(msg.contains("app=rook-ceph-tools"));
    }

    #[test]
    fn test_stream_error_includes_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "connection reset");
        let err = ToolboxError::Stream {
            pod: "rook-ceph-tools-abcde".to_string(),
            source: Box::new(cause),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed to run command"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn test_cancelled_message() {
        let started = ToolboxError::Cancelled {
            pod: Some("rook-ceph-tools-abcde".to_string()),
        };
        assert_eq!(
            started.to_string(),
            "command was cancelled in pod rook-ceph-tools-abcde"
        );

        let early = ToolboxError::Cancelled { pod: None };
        assert_eq!(early.to_string(), "command was cancelled before it started");
    }
}
