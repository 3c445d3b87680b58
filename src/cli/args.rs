//! Command line argument parsing
//!
//! The binary has three modes:
//! - listing tasks as a table or as JSON (`--list`, `--list-all`, `--json`)
//! - printing bare task names for shell completion (`--list-names`)
//! - showing configuration discovery information (`--show-config`)

use super::config::TaskrConfig;
use crate::list::{ListOptions, default_concurrency};
use crate::taskfile::TaskSorter;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    List(ListOptions),
    ListNames { all: bool },
    ShowConfig,
}

#[derive(Debug, Default, Parser)]
#[command(name = "taskr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lists the tasks declared in a Taskfile")]
#[command(long_about = None)]
pub struct Args {
    /// Taskfile to read; discovered from the current directory upwards by default
    #[arg(short = 't', long = "taskfile", value_name = "FILE")]
    pub taskfile: Option<PathBuf>,
    /// List tasks that have a description
    #[arg(short = 'l', long = "list")]
    pub list: bool,
    /// List all tasks, with or without a description
    #[arg(short = 'a', long = "list-all")]
    pub list_all: bool,
    /// Print the task list as JSON
    #[arg(long = "json", conflicts_with = "list_names")]
    pub json: bool,
    /// Skip up-to-date checks in JSON output
    #[arg(long = "no-status")]
    pub no_status: bool,
    /// Nest JSON output by namespace
    #[arg(long = "nested")]
    pub nested: bool,
    /// Print only task names and aliases, one per line
    #[arg(long = "list-names", visible_alias = "silent")]
    pub list_names: bool,
    /// Maximum concurrent up-to-date checks (0 for no limit)
    #[arg(long = "concurrency", value_name = "N")]
    pub concurrency: Option<usize>,
    /// Check status without touching fingerprint state
    #[arg(long = "dry")]
    pub dry: bool,
    /// Task ordering
    #[arg(long = "sort", value_enum)]
    pub sort: Option<TaskSorter>,
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Show configuration discovery information
    #[arg(long = "show-config")]
    pub show_config: bool,
    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Mode selected by the flags, with `config` filling unset values.
    ///
    /// Without any listing flag the described tasks are listed.
    pub fn mode(&self, config: &TaskrConfig) -> ExecutionMode {
        if self.show_config {
            return ExecutionMode::ShowConfig;
        }

        if self.list_names {
            return ExecutionMode::ListNames { all: self.list_all };
        }

        ExecutionMode::List(ListOptions {
            only_described: self.list || !self.list_all,
            all: self.list_all,
            json: self.json,
            no_status: self.no_status || config.no_status,
            nested: self.nested || config.nested,
            concurrency: self
                .concurrency
                .or(config.concurrency)
                .unwrap_or_else(default_concurrency),
        })
    }

    pub fn sorter(&self, config: &TaskrConfig) -> TaskSorter {
        self.sort.unwrap_or(config.sort)
    }
}
