//! Toolbox pod targeting

use serde::{Deserialize, Serialize};

/// Namespace the Rook operator and toolbox are deployed to by default
pub const DEFAULT_NAMESPACE: &str = "rook-ceph";

/// Label carried by the toolbox deployment's pods
pub const DEFAULT_LABEL_SELECTOR: &str = "app=rook-ceph-tools";

/// Container inside the toolbox pod that has the ceph CLI
pub const DEFAULT_CONTAINER: &str = "rook-ceph-tools";

/// Where to find the toolbox pod and which container to exec into
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ToolboxTarget {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_label_selector")]
    pub label_selector: String,

    #[serde(default = "default_container")]
    pub container: String,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_label_selector() -> String {
    DEFAULT_LABEL_SELECTOR.to_string()
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}

impl Default for ToolboxTarget {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            label_selector: default_label_selector(),
            container: default_container(),
        }
    }
}

impl ToolboxTarget {
    pub fn new(
        namespace: impl Into<String>,
        label_selector: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            label_selector: label_selector.into(),
            container: container.into(),
        }
    }

    /// Replace any field for which an override was given
    pub fn with_overrides(
        mut self,
        namespace: Option<String>,
        label_selector: Option<String>,
        container: Option<String>,
    ) -> Self {
        if let Some(ns) = namespace {
            self.namespace = ns;
        }
        if let Some(selector) = label_selector {
            self.label_selector = selector;
        }
        if let Some(c) = container {
            self.container = c;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_target() {
        let target = ToolboxTarget::default();
        assert_eq!(target.namespace, "rook-ceph");
        assert_eq!(target.label_selector, "app=rook-ceph-tools");
        assert_eq!(target.container, "rook-ceph-tools");
    }

    #[test]
    fn test_overrides_only_replace_given_fields() {
        let target = ToolboxTarget::default().with_overrides(
            Some("storage".to_string()),
            None,
            Some("tools".to_string()),
        );
        assert_eq!(target.namespace, "storage");
        assert_eq!(target.label_selector, DEFAULT_LABEL_SELECTOR);
        assert_eq!(target.container, "tools");
    }
}
