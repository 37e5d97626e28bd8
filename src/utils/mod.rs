//! Utility modules for rook-toolbox

pub mod errors;
pub mod logger;
pub mod output;
pub mod preflight;
pub mod progress;
pub mod prompt;

// Re-export commonly used items
pub use errors::ToolboxHint;
pub use logger::{log_error, log_info, log_warn};
pub use output::OutputFormat;
pub use prompt::confirm;
