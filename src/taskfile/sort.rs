use crate::env::NAMESPACE_SEPARATOR;
use crate::task::Task;
use serde::{Deserialize, Serialize};

/// Order in which tasks are handed to listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TaskSorter {
    /// Declaration order
    None,
    /// Plain lexical order by name
    AlphaNumeric,
    /// Lexical order with tasks outside any namespace first
    #[default]
    AlphaNumericWithRootTasksFirst,
}

impl TaskSorter {
    pub fn sort(self, tasks: &mut [&Task]) {
        match self {
            TaskSorter::None => {}
            TaskSorter::AlphaNumeric => alpha_numeric(tasks),
            TaskSorter::AlphaNumericWithRootTasksFirst => alpha_numeric_with_root_tasks_first(tasks),
        }
    }
}

pub fn alpha_numeric(tasks: &mut [&Task]) {
    tasks.sort_by(|a, b| a.task.cmp(&b.task));
}

pub fn alpha_numeric_with_root_tasks_first(tasks: &mut [&Task]) {
    tasks.sort_by(|a, b| {
        let a_nested = a.task.contains(NAMESPACE_SEPARATOR);
        let b_nested = b.task.contains(NAMESPACE_SEPARATOR);
        a_nested.cmp(&b_nested).then_with(|| a.task.cmp(&b.task))
    });
}
