//! User-facing errors with actionable suggestions

use colored::Colorize;
use thiserror::Error;

use crate::config::ToolboxTarget;
use crate::error::ToolboxError;

/// Error message plus suggestions for what to try next
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ToolboxHint {
    pub message: String,
    pub suggestions: Vec<String>,
    pub docs_link: Option<String>,
}

impl ToolboxHint {
    /// Create a new error with suggestions
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestions: Vec::new(),
            docs_link: None,
        }
    }

    /// Add a suggestion to the error
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a documentation link
    pub fn with_docs(mut self, link: impl Into<String>) -> Self {
        self.docs_link = Some(link.into());
        self
    }

    /// Display the error with suggestions on stderr
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.message);

        if !self.suggestions.is_empty() {
            eprintln!();
            eprintln!("{}", "Suggestions:".yellow().bold());
            for suggestion in &self.suggestions {
                eprintln!("  {} {}", "→".blue(), suggestion);
            }
        }

        if let Some(docs) = &self.docs_link {
            eprintln!();
            eprintln!("{} {}", "Documentation:".cyan(), docs);
        }
    }

    // Common error patterns

    /// No pod carries the toolbox label
    pub fn toolbox_not_found(target: &ToolboxTarget) -> Self {
        Self::new(format!(
            "No toolbox pod matching '{}' in namespace '{}'",
            target.label_selector, target.namespace
        ))
        .suggest(format!(
            "Check the toolbox deployment: kubectl -n {} get deploy,pods -l {}",
            target.namespace, target.label_selector
        ))
        .suggest("Use --namespace / --selector if the toolbox lives elsewhere")
        .with_docs("https://rook.io/docs/rook/latest/Troubleshooting/ceph-toolbox/")
    }

    /// Kubeconfig could not be loaded
    pub fn kubeconfig_error(reason: &str) -> Self {
        Self::new(format!("Could not load cluster credentials: {}", reason))
            .suggest("Verify KUBECONFIG or ~/.kube/config points at the right cluster")
            .suggest("Use --kubeconfig / --context to pick a different one")
    }

    /// Toolbox pod exists but isn't running yet
    pub fn pod_not_ready(namespace: &str, name: &str) -> Self {
        Self::new(format!("Toolbox pod {}/{} is not running", namespace, name))
            .suggest(format!("Check pod events: kubectl -n {} describe pod {}", namespace, name))
            .suggest("Increase --wait to give the pod more time")
    }

    /// Command exited non-zero or the stream broke
    pub fn command_failed(reason: &str) -> Self {
        Self::new(format!("Command failed: {}", reason))
            .suggest("Run with --stream to see the command's stderr as it happens")
            .suggest("Run with -vv for exec request details")
    }

    /// Permission denied error
    pub fn permission_denied(operation: &str) -> Self {
        Self::new(format!("Permission denied: {}", operation))
            .suggest("Verify you can exec into pods: kubectl auth can-i create pods/exec")
            .suggest("Check if you need a role with pods/exec in the toolbox namespace")
    }

    /// Connection timeout error
    pub fn connection_timeout(resource: &str) -> Self {
        Self::new(format!("Timeout waiting for {}", resource))
            .suggest("Check if the cluster is healthy")
            .suggest("Verify network connectivity to the API server")
            .suggest("Increase --timeout if the command is slow")
    }
}

/// Helper to display error and exit
pub fn display_error_and_exit(error: ToolboxHint) -> ! {
    error.display();
    std::process::exit(1);
}

/// Convert a toolbox error into a hint
pub fn hint_for(err: &ToolboxError, target: &ToolboxTarget) -> ToolboxHint {
    match err {
        ToolboxError::NoMatchingPod { .. } => ToolboxHint::toolbox_not_found(target),
        ToolboxError::ConfigLoad { source } => ToolboxHint::kubeconfig_error(&source.to_string()),
        ToolboxError::PodNotReady {
            namespace, name, ..
        } => ToolboxHint::pod_not_ready(namespace, name),
        ToolboxError::Stream { .. } => ToolboxHint::command_failed(&err.to_string()),
        ToolboxError::TimedOut { pod, .. } => {
            ToolboxHint::connection_timeout(&format!("command in {}", pod))
        }
        _ => from_message(err.to_string()),
    }
}

/// Convert anyhow error to ToolboxHint when possible
pub fn enhance_error(err: &anyhow::Error, target: &ToolboxTarget) -> ToolboxHint {
    if let Some(toolbox) = err.downcast_ref::<ToolboxError>() {
        return hint_for(toolbox, target);
    }
    from_message(format!("{:#}", err))
}

fn from_message(err_str: String) -> ToolboxHint {
    let lower = err_str.to_lowercase();

    if lower.contains("unauthorized") || lower.contains("forbidden") {
        return ToolboxHint::permission_denied(&err_str);
    }

    if lower.contains("connection refused") || lower.contains("timed out") {
        return ToolboxHint::connection_timeout("cluster");
    }

    // Default error with generic suggestion
    ToolboxHint::new(err_str)
        .suggest("Run with --verbose for more details")
        .suggest("Check logs for additional context")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolbox_not_found_hint() {
        let target = ToolboxTarget::default();
        let err = ToolboxHint::toolbox_not_found(&target);
        assert!(err.message.contains("app=rook-ceph-tools"));
        assert_eq!(err.suggestions.len(), 2);
        assert!(err.docs_link.is_some());
    }

    #[test]
    fn test_error_suggestions() {
        let err = ToolboxHint::new("test")
            .suggest("suggestion 1")
            .suggest("suggestion 2");
        assert_eq!(err.suggestions.len(), 2);
    }

    #[test]
    fn test_enhance_downcasts_toolbox_error() {
        let target = ToolboxTarget::default();
        let err = anyhow::Error::new(ToolboxError::NoMatchingPod {
            namespace: target.namespace.clone(),
            selector: target.label_selector.clone(),
        });

        let hint = enhance_error(&err, &target);
        assert!(hint.message.contains("No toolbox pod"));
    }

    #[test]
    fn test_enhance_matches_forbidden() {
        let target = ToolboxTarget::default();
        let err = anyhow::anyhow!("pods \"x\" is forbidden: User cannot create pods/exec");

        let hint = enhance_error(&err, &target);
        assert!(hint.message.starts_with("Permission denied"));
    }

    #[test]
    fn test_enhance_keeps_unknown_message() {
        let target = ToolboxTarget::default();
        let err = anyhow::anyhow!("something odd");

        let hint = enhance_error(&err, &target);
        assert_eq!(hint.message, "something odd");
        assert!(!hint.suggestions.is_empty());
    }
}
