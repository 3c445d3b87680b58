use crate::env::table::{MIN_COLUMN_WIDTH, TAB_PADDING};
use crate::list::ListError;
use crate::list::grouper::GroupedTasks;
use crate::task::Task;
use std::io::{self, Write};

/// Longest declared task name, used to size the name column
pub fn calculate_max_task_name_length(tasks: &[&Task]) -> usize {
    tasks.iter().map(|task| task.task.len()).max().unwrap_or(0)
}

/// Writes grouped tasks as an aligned plain-text table
pub struct TaskTableBuilder<W: Write> {
    writer: W,
    min_width: usize,
    padding: usize,
}

impl<W: Write> TaskTableBuilder<W> {
    pub fn new(writer: W, max_task_name_len: usize) -> Self {
        Self {
            writer,
            min_width: max_task_name_len + MIN_COLUMN_WIDTH,
            padding: TAB_PADDING,
        }
    }

    /// Print every group in `groups` order
    pub fn build(&mut self, grouped: &GroupedTasks<'_>, groups: &[String]) -> Result<(), ListError> {
        for group in groups {
            let tasks = grouped.get(group).map(Vec::as_slice).unwrap_or_default();
            self.print_group(group, tasks)
                .map_err(|source| ListError::Render {
                    group: group.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    fn print_group(&mut self, group: &str, tasks: &[&Task]) -> io::Result<()> {
        write!(self.writer, "\n{}\n", group.to_uppercase())?;

        // name cells share one column per group
        let longest = tasks.iter().map(|task| task.task.chars().count()).max().unwrap_or(0);
        let width = self.min_width.max(longest + self.padding);

        for task in tasks {
            self.print_task(task, width)?;
        }
        self.writer.flush()
    }

    fn print_task(&mut self, task: &Task, width: usize) -> io::Result<()> {
        write!(self.writer, "{:<width$}", task.task)?;
        write!(self.writer, "{}", task.desc.replace('\n', " "))?;

        if !task.aliases.is_empty() {
            write!(self.writer, " (aliases: {})", task.aliases.join(", "))?;
        }

        writeln!(self.writer)
    }
}
