//! Command implementations

pub mod check;
pub mod clusters;
pub mod config;
pub mod exec;
pub mod pod;
