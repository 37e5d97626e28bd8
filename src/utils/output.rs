//! Structured output for listing commands

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Serialize `value` as JSON or YAML. Returns None for text output,
/// which each command formats itself.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Text => Ok(None),
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(Some)
            .context("Failed to serialize output as JSON"),
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map(Some)
            .context("Failed to serialize output as YAML"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        name: &'static str,
        phase: &'static str,
    }

    #[test]
    fn test_render_text_is_none() {
        let row = Row { name: "a", phase: "Running" };
        assert!(render(&row, OutputFormat::Text).unwrap().is_none());
    }

    #[test]
    fn test_render_json_and_yaml() {
        let row = Row { name: "a", phase: "Running" };

        let json = render(&row, OutputFormat::Json).unwrap().unwrap();
        assert!(json.contains("\"phase\": \"Running\""));

        let yaml = render(&row, OutputFormat::Yaml).unwrap().unwrap();
        assert!(yaml.contains("phase: Running"));
    }
}
