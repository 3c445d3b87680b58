//! CLI-specific functionality for taskr
//!
//! This module contains argument parsing and configuration discovery.

pub mod args;
pub mod config;

pub use args::{Args, ExecutionMode};
pub use config::{ConfigDiscovery, TaskrConfig};
