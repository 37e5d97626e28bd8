//! Configuration file support for rook-toolbox

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::toolbox::ToolboxTarget;
use crate::k8s::command::Tokenizer;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub cluster: ClusterSettings,

    #[serde(default)]
    pub toolbox: ToolboxTarget,

    #[serde(default)]
    pub exec: ExecSettings,
}

/// How to reach the cluster. Unset fields fall back to the usual kubeconfig discovery.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ClusterSettings {
    /// Path to a kubeconfig file. If not set, KUBECONFIG / ~/.kube/config / in-cluster is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Command execution settings
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ExecSettings {
    /// Cancel the command after this many seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Wait up to this many seconds for the toolbox pod to be running
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_secs: Option<u64>,

    #[serde(default)]
    pub tokenizer: Tokenizer,
}

impl ExecSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn wait(&self) -> Option<Duration> {
        self.wait_secs.map(Duration::from_secs)
    }
}

impl Settings {
    /// Load settings from an explicit file, the standard locations, or defaults.
    /// A config file that exists but can't be parsed is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::find_config_file() {
            Some(path) => {
                tracing::debug!("Using config file {}", path.display());
                Self::load_from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Find config file in standard locations
    /// Priority:
    /// 1. .rook-toolbox.toml in current directory
    /// 2. ~/.config/rook-toolbox/config.toml (XDG config directory)
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(".rook-toolbox.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(xdg_config) = Self::user_config_path() {
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        None
    }

    /// Per-user config file location
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rook-toolbox").join("config.toml"))
    }

    /// Generate example config file content
    pub fn example_config() -> String {
        r#"# rook-toolbox configuration file
# Place this file at ~/.config/rook-toolbox/config.toml or .rook-toolbox.toml in your project

[cluster]
# kubeconfig = "/home/user/.kube/config"  # Optional: defaults to KUBECONFIG or ~/.kube/config
# context = "my-cluster"                  # Optional: defaults to the current context

[toolbox]
namespace = "rook-ceph"
label_selector = "app=rook-ceph-tools"
container = "rook-ceph-tools"

[exec]
# timeout_secs = 60   # Optional: cancel commands that run longer than this
# wait_secs = 30      # Optional: wait for the toolbox pod to be running first
tokenizer = "whitespace"  # Options: whitespace, shell
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.toolbox.namespace, "rook-ceph");
        assert_eq!(settings.toolbox.container, "rook-ceph-tools");
        assert!(settings.cluster.kubeconfig.is_none());
        assert!(settings.exec.timeout().is_none());
        assert_eq!(settings.exec.tokenizer, Tokenizer::Whitespace);
    }

    #[test]
    fn test_settings_deserialization() {
        let toml_str = r#"
[cluster]
context = "lab"

[toolbox]
namespace = "storage"

[exec]
timeout_secs = 15
tokenizer = "shell"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.cluster.context.as_deref(), Some("lab"));
        assert_eq!(settings.toolbox.namespace, "storage");
        assert_eq!(settings.toolbox.label_selector, "app=rook-ceph-tools");
        assert_eq!(settings.exec.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(settings.exec.tokenizer, Tokenizer::Shell);
    }

    #[test]
    fn test_example_config_parses_to_defaults() {
        let settings: Settings = toml::from_str(&Settings::example_config()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[toolbox]\ncontainer = \"tools\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.toolbox.container, "tools");
        assert_eq!(settings.toolbox.namespace, "rook-ceph");
    }

    #[test]
    fn test_load_invalid_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[toolbox\nnamespace = ").unwrap();

        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
