//! Exec command implementation

use anyhow::{Context, Result};
use std::io::Write;
use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::k8s::{PodCommandRunner, Tokenizer};
use crate::utils::progress::with_spinner;

/// Exit code for a second Ctrl+C, matching a shell killed by SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Options for running a command in the toolbox
pub struct ExecOptions {
    /// Command words as the local shell passed them
    pub command: Vec<String>,
    /// Send output straight to this process instead of buffering it
    pub stream: bool,
}

/// Rebuild a command line from argv words so the tokenizer gets the same
/// words back. Under shell splitting each word is quoted as needed.
pub fn command_line(words: &[String], tokenizer: Tokenizer) -> String {
    match tokenizer {
        Tokenizer::Whitespace => words.join(" "),
        Tokenizer::Shell => shell_words::join(words),
    }
}

/// Cancel `token` on the first Ctrl+C and exit on the second
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            crate::log_error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        crate::log_warn!("Interrupted, cancelling remote command (Ctrl+C again to exit)");
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });
}

/// Handle exec command
pub async fn exec(settings: &Settings, options: ExecOptions) -> Result<()> {
    let command = command_line(&options.command, settings.exec.tokenizer);

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let runner = tokio::select! {
        biased;
        _ = cancel.cancelled() => anyhow::bail!("Interrupted before connecting to the cluster"),
        runner = PodCommandRunner::connect(settings) => runner?,
    };
    let runner = runner.with_cancellation(cancel);

    crate::log_info!(
        "Running in namespace {} (selector {})",
        runner.target().namespace,
        runner.target().label_selector
    );

    if options.stream {
        let pod = runner.stream(&command).await?;
        crate::log_info!("Command finished in pod {}", pod);
        return Ok(());
    }

    let message = format!("Running '{}' in toolbox", command);
    let result = with_spinner(&message, runner.run(&command)).await?;
    crate::log_info!(
        "Command finished in pod {} ({} bytes of output)",
        result.pod,
        result.stdout.len()
    );

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&result.stdout)
        .and_then(|_| stdout.flush())
        .context("Failed to write command output")?;

    if !result.stderr.is_empty() {
        std::io::stderr()
            .write_all(&result.stderr)
            .context("Failed to write command stderr")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k8s::CommandRequest;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_shell_line_keeps_quoted_word() {
        let argv = words(&["sh", "-c", "ceph df | head -n 3"]);

        let line = command_line(&argv, Tokenizer::Shell);
        let request = CommandRequest::parse_with(&line, Tokenizer::Shell).unwrap();
        assert_eq!(request.args(), argv.as_slice());
    }

    #[test]
    fn test_shell_line_keeps_empty_and_quote_words() {
        let argv = words(&["ceph", "config", "set", "osd", "key", "it's \"odd\"", ""]);

        let line = command_line(&argv, Tokenizer::Shell);
        let request = CommandRequest::parse_with(&line, Tokenizer::Shell).unwrap();
        assert_eq!(request.args(), argv.as_slice());
    }

    #[test]
    fn test_whitespace_line_is_space_joined() {
        let argv = words(&["ceph", "osd", "tree"]);
        assert_eq!(command_line(&argv, Tokenizer::Whitespace), "ceph osd tree");
    }
}
