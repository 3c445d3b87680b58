//! # taskr
//!
//! Task definition parsing and task listing for a YAML-driven task runner.
//! A Taskfile declares tasks in one of three shapes (a single command, a list
//! of commands, or a full mapping); taskr turns them into one canonical model
//! and presents them grouped, ordered and optionally annotated with
//! up-to-date status.
//!
//! ## Architecture Overview
//!
//! - **[`task`]**: the canonical task model, shape parsing, wildcard names and
//!   the namespace tree
//! - **[`taskfile`]**: whole-document loading, source positions, name lookup
//!   and sorting
//! - **[`list`]**: grouping, concurrent status checks and table/JSON rendering
//! - **[`fingerprint`]**: modification-time freshness oracle
//! - **[`cli`]**: argument parsing and configuration discovery
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taskr::{ListOptions, Lister, Taskfile, TimestampOracle};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let taskfile = Taskfile::load("Taskfile.yml")?;
//!     let oracle = TimestampOracle::new(taskfile.dir());
//!
//!     let options = ListOptions {
//!         all: true,
//!         json: true,
//!         ..Default::default()
//!     };
//!     Lister::new(&taskfile)
//!         .with_oracle(&oracle)
//!         .list_tasks(&options, &mut std::io::stdout())
//!         .await?;
//!     Ok(())
//! }
//! ```

/// Canonical task model.
///
/// Decodes the three accepted task shapes, matches wildcard task names and
/// reprojects flat task lists into namespace trees.
pub mod task;

/// Taskfile documents.
///
/// Loading, discovery, invocation-name resolution and task ordering.
pub mod taskfile;

/// Task listing.
pub mod list;

/// Modification-time freshness checks used for listing status.
pub mod fingerprint;

/// Environment constants and path utilities.
///
/// Centralizes all hardcoded paths and directory names used throughout
/// the application for easier maintenance and consistency.
pub mod env;

// CLI module for command-line interface
pub mod cli;

// Re-export main task types
pub use task::{Command, DecoratedTask, Location, NamespaceNode, Task, TaskfileError, wildcard_match};

// Re-export Taskfile types
pub use taskfile::{MatchedTask, TaskSorter, Taskfile};

// Re-export listing types
pub use list::{ListError, ListOptions, ListOutcome, Lister, StatusOptions, StatusOracle};

pub use fingerprint::TimestampOracle;
