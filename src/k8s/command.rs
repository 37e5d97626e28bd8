//! Command string tokenization

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolboxError};

/// How a raw command string is split into arguments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tokenizer {
    /// Split on runs of whitespace, no quoting
    #[default]
    Whitespace,
    /// POSIX shell word splitting, quotes and escapes respected
    Shell,
}

/// A command to run inside the toolbox container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    raw: String,
    args: Vec<String>,
}

impl CommandRequest {
    /// Tokenize on whitespace
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_with(raw, Tokenizer::Whitespace)
    }

    pub fn parse_with(raw: &str, tokenizer: Tokenizer) -> Result<Self> {
        let args = match tokenizer {
            Tokenizer::Whitespace => split_fields(raw),
            Tokenizer::Shell => shell_words::split(raw).map_err(|e| ToolboxError::InvalidCommand {
                command: raw.to_string(),
                reason: e.to_string(),
            })?,
        };

        if args.is_empty() {
            return Err(ToolboxError::EmptyCommand);
        }

        Ok(Self {
            raw: raw.to_string(),
            args,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// Split on whitespace, dropping empty fields
pub fn split_fields(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_preserves_order() {
        assert_eq!(
            split_fields("ceph osd pool ls detail"),
            vec!["ceph", "osd", "pool", "ls", "detail"]
        );
    }

    #[test]
    fn test_split_collapses_and_trims_whitespace() {
        let args = split_fields("  ceph \t status\n  --format   json  ");
        assert_eq!(args, vec!["ceph", "status", "--format", "json"]);
    }

    #[test]
    fn test_whitespace_tokenizer_ignores_quotes() {
        let req = CommandRequest::parse(r#"sh -c "echo hi""#).unwrap();
        assert_eq!(req.args(), &["sh", "-c", "\"echo", "hi\""]);
    }

    #[test]
    fn test_shell_tokenizer_respects_quotes() {
        let req = CommandRequest::parse_with(r#"sh -c "echo hi""#, Tokenizer::Shell).unwrap();
        assert_eq!(req.args(), &["sh", "-c", "echo hi"]);
    }

    #[test]
    fn test_shell_tokenizer_rejects_unbalanced_quotes() {
        let err = CommandRequest::parse_with("echo 'oops", Tokenizer::Shell).unwrap_err();
        assert!(err.to_string().contains("invalid command"));
    }

    #[test]
    fn test_empty_command_is_rejected() {
        assert!(matches!(
            CommandRequest::parse("   \t "),
            Err(ToolboxError::EmptyCommand)
        ));
    }

    #[test]
    fn test_raw_is_kept() {
        let req = CommandRequest::parse(" ceph status ").unwrap();
        assert_eq!(req.raw(), " ceph status ");
        assert_eq!(req.args(), ["ceph", "status"]);
    }
}
