//! Progress indicators for long-running operations

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Create a spinner for indeterminate operations
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Spinner that only draws when stderr is a terminal
pub fn spinner_if_interactive(message: &str) -> ProgressBar {
    if std::io::stderr().is_terminal() {
        create_spinner(message)
    } else {
        ProgressBar::hidden()
    }
}

/// Run a future with a spinner, clearing it when done
pub async fn with_spinner<F, T>(message: &str, fut: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let pb = spinner_if_interactive(message);
    let result = fut.await;
    pb.finish_and_clear();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner() {
        let pb = create_spinner("Test operation");
        assert!(pb.message().contains("Test operation"));
        pb.finish_and_clear();
    }

    #[tokio::test]
    async fn test_with_spinner() {
        let result = with_spinner("Testing", async { 42 }).await;
        assert_eq!(result, 42);
    }
}
