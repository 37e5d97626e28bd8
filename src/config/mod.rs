//! Configuration management

pub mod settings;
pub mod toolbox;

pub use settings::{ClusterSettings, ExecSettings, Settings};
pub use toolbox::ToolboxTarget;
