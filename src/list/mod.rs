//! Task listing
//!
//! The [`Lister`] filters a [`Taskfile`]'s tasks and renders them either as a
//! grouped table for people or as a JSON namespace document for tools.
//! Freshness checks only run for the JSON document, where consumers show
//! per-task status.

pub mod grouper;
pub mod json;
pub mod status;
pub mod table;

pub use grouper::{GroupedTasks, TaskGrouper};
pub use status::{
    Decorated, StatusOptions, StatusOracle, decorate, decorate_without_status, default_concurrency,
};
pub use table::TaskTableBuilder;

use crate::env::DEFAULT_TASK_GROUP;
use crate::task::{NamespaceNode, Task};
use crate::taskfile::{TaskSorter, Taskfile};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Predicate that removes a task from a listing when it returns `true`
pub type TaskFilter = fn(&Task) -> bool;

pub fn filter_out_internal(task: &Task) -> bool {
    task.internal
}

pub fn filter_out_no_desc(task: &Task) -> bool {
    !task.has_description()
}

#[derive(Error, Debug)]
pub enum ListError {
    #[error("failed to check status for task {task}: {source}")]
    StatusCheckFailed {
        task: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to flush output for group {group}: {source}")]
    Render {
        group: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode JSON output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}

/// Whether a listing produced any tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    Listed,
    NoTasksFound,
}

impl ListOutcome {
    pub fn found_tasks(self) -> bool {
        self == ListOutcome::Listed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// List only tasks that have a description
    pub only_described: bool,
    /// List every non-internal task
    pub all: bool,
    /// Emit the JSON document instead of the table
    pub json: bool,
    /// Skip freshness checks in JSON output
    pub no_status: bool,
    /// Nest JSON output by namespace
    pub nested: bool,
    /// Maximum concurrent freshness checks, `0` for no limit
    pub concurrency: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            only_described: false,
            all: false,
            json: false,
            no_status: false,
            nested: false,
            concurrency: default_concurrency(),
        }
    }
}

impl ListOptions {
    pub fn should_list_tasks(&self) -> bool {
        self.only_described || self.all
    }

    /// Filters for this listing; internal tasks are always removed
    pub fn filters(&self) -> Vec<TaskFilter> {
        let mut filters: Vec<TaskFilter> = vec![filter_out_internal];
        if self.only_described {
            filters.push(filter_out_no_desc);
        }
        filters
    }
}

/// Renders the tasks of one Taskfile
pub struct Lister<'a> {
    taskfile: &'a Taskfile,
    oracle: Option<&'a dyn StatusOracle>,
    sorter: TaskSorter,
    default_group: String,
    temp_dir: PathBuf,
    dry: bool,
}

impl<'a> Lister<'a> {
    pub fn new(taskfile: &'a Taskfile) -> Self {
        Self {
            taskfile,
            oracle: None,
            sorter: TaskSorter::default(),
            default_group: DEFAULT_TASK_GROUP.to_string(),
            temp_dir: crate::env::fingerprint_dir_path(taskfile.dir()),
            dry: false,
        }
    }

    /// Oracle consulted for JSON status; without one status is never reported
    pub fn with_oracle(mut self, oracle: &'a dyn StatusOracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_sorter(mut self, sorter: TaskSorter) -> Self {
        self.sorter = sorter;
        self
    }

    pub fn with_default_group(mut self, group: impl Into<String>) -> Self {
        self.default_group = group.into();
        self
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    pub fn with_dry(mut self, dry: bool) -> Self {
        self.dry = dry;
        self
    }

    fn status_options(&self) -> StatusOptions {
        StatusOptions {
            method: self.taskfile.method.clone(),
            temp_dir: self.temp_dir.clone(),
            dry: self.dry,
        }
    }

    /// List the tasks that survive `options`' filters
    pub async fn list_tasks<W: Write>(
        &self,
        options: &ListOptions,
        writer: &mut W,
    ) -> Result<ListOutcome, ListError> {
        let filters = options.filters();
        let tasks = self.taskfile.task_list(&filters, self.sorter);
        debug!(
            "Listing {} of {} task(s)",
            tasks.len(),
            self.taskfile.tasks.len()
        );

        if options.json {
            self.list_as_json(&tasks, options, writer).await
        } else {
            self.list_as_table(&tasks, options, writer)
        }
    }

    async fn list_as_json<W: Write>(
        &self,
        tasks: &[&'a Task],
        options: &ListOptions,
        writer: &mut W,
    ) -> Result<ListOutcome, ListError> {
        let decorated = match self.oracle {
            Some(oracle) if !options.no_status => {
                decorate(tasks, oracle, &self.status_options(), options.concurrency)
                    .await
                    .into_result()?
            }
            _ => decorate_without_status(tasks),
        };

        let root = NamespaceNode::build(
            decorated,
            options.nested,
            Some(self.taskfile.location.clone()),
        );
        json::write_json(&root, writer)?;

        Ok(outcome(tasks))
    }

    fn list_as_table<W: Write>(
        &self,
        tasks: &[&'a Task],
        options: &ListOptions,
        writer: &mut W,
    ) -> Result<ListOutcome, ListError> {
        if tasks.is_empty() {
            let message = if options.all {
                "task: No tasks available"
            } else {
                "task: No tasks with description available. Try --list-all to list all tasks"
            };
            writeln!(writer, "{message}")?;
            info!("No tasks to list");
            return Ok(ListOutcome::NoTasksFound);
        }

        let grouper = TaskGrouper::new(self.default_group.as_str(), self.taskfile.categories.clone());
        let grouped = grouper.group(tasks);
        let groups = grouper.sorted_groups(&grouped);

        let mut builder =
            TaskTableBuilder::new(&mut *writer, table::calculate_max_task_name_length(tasks));
        builder.build(&grouped, &groups)?;

        Ok(ListOutcome::Listed)
    }

    /// Print task names and aliases one per line, for shell completion
    pub fn list_task_names<W: Write>(&self, all: bool, writer: &mut W) -> Result<(), ListError> {
        for name in self.task_names(all) {
            writeln!(writer, "{name}")?;
        }
        writer.flush()?;
        Ok(())
    }

    fn task_names(&self, all: bool) -> Vec<&'a str> {
        let mut filters: Vec<TaskFilter> = vec![filter_out_internal];
        if !all {
            filters.push(filter_out_no_desc);
        }

        self.taskfile
            .task_list(&filters, self.sorter)
            .into_iter()
            .flat_map(|task| {
                std::iter::once(task.task.as_str())
                    .chain(task.aliases.iter().map(String::as_str))
                    .map(|name| name.trim_end_matches(':'))
            })
            .collect()
    }
}

fn outcome(tasks: &[&Task]) -> ListOutcome {
    if tasks.is_empty() {
        ListOutcome::NoTasksFound
    } else {
        ListOutcome::Listed
    }
}
