use crate::task::Task;
use std::collections::{BTreeMap, HashSet};

/// Tasks keyed by group name
pub type GroupedTasks<'a> = BTreeMap<String, Vec<&'a Task>>;

/// Partitions tasks into display groups and decides the group order
#[derive(Debug, Clone)]
pub struct TaskGrouper {
    default_group: String,
    categories: Vec<String>,
}

impl TaskGrouper {
    pub fn new(default_group: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            default_group: default_group.into(),
            categories,
        }
    }

    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    /// Group tasks by category and order each group.
    ///
    /// Within a group tasks are ordered by `index` (unset last), then by
    /// source position (unknown positions first). The sort is stable, so
    /// tasks with equal keys keep their input order.
    pub fn group<'a>(&self, tasks: &[&'a Task]) -> GroupedTasks<'a> {
        let mut grouped = GroupedTasks::new();

        for task in tasks {
            let group = if task.category.is_empty() {
                &self.default_group
            } else {
                &task.category
            };
            grouped.entry(group.clone()).or_default().push(*task);
        }

        for group_tasks in grouped.values_mut() {
            group_tasks.sort_by_key(|task| sort_key(task));
        }

        grouped
    }

    /// Group names in display order.
    ///
    /// Explicit categories come first in their declared order, followed by
    /// the remaining groups alphabetically. Without categories the default
    /// group leads.
    pub fn sorted_groups(&self, grouped: &GroupedTasks<'_>) -> Vec<String> {
        // BTreeMap keys are already in ascending order
        let present = grouped.keys();

        if !self.categories.is_empty() {
            let explicit: HashSet<&str> = self.categories.iter().map(String::as_str).collect();
            let mut seen = HashSet::new();
            let mut result: Vec<String> = self
                .categories
                .iter()
                .filter(|category| grouped.contains_key(*category) && seen.insert(category.as_str()))
                .cloned()
                .collect();
            result.extend(
                present
                    .filter(|group| !explicit.contains(group.as_str()))
                    .cloned(),
            );
            return result;
        }

        let mut result = Vec::with_capacity(grouped.len());
        if grouped.contains_key(&self.default_group) {
            result.push(self.default_group.clone());
        }
        result.extend(
            present
                .filter(|group| **group != self.default_group)
                .cloned(),
        );
        result
    }
}

fn sort_key(task: &Task) -> (i64, usize, usize) {
    // column only separates tasks sharing a line, as in flow mappings
    let column = task.location.as_ref().map_or(0, |location| location.column);
    (task.index.unwrap_or(i64::MAX), task.line(), column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::DEFAULT_TASK_GROUP;
    use crate::task::Location;

    fn task(name: &str, category: &str, index: Option<i64>, line: Option<usize>) -> Task {
        Task {
            task: name.to_string(),
            category: category.to_string(),
            index,
            location: line.map(|line| Location::new("Taskfile.yml", line, 3)),
            ..Default::default()
        }
    }

    fn grouper(categories: &[&str]) -> TaskGrouper {
        TaskGrouper::new(
            DEFAULT_TASK_GROUP,
            categories.iter().map(|c| c.to_string()).collect(),
        )
    }

    fn names(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.task.clone()).collect()
    }

    #[test]
    fn test_index_then_line_ordering() {
        let tasks = vec![
            task("two", "", Some(2), Some(5)),
            task("unset-late", "", None, Some(1)),
            task("zero", "", Some(0), Some(9)),
            task("unset-early", "", None, Some(2)),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();

        let grouped = grouper(&[]).group(&refs);
        assert_eq!(
            names(&grouped[DEFAULT_TASK_GROUP]),
            vec!["zero", "two", "unset-late", "unset-early"]
        );
    }

    #[test]
    fn test_missing_location_sorts_first() {
        let tasks = vec![
            task("located", "", None, Some(4)),
            task("unlocated", "", None, None),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();

        let grouped = grouper(&[]).group(&refs);
        assert_eq!(names(&grouped[DEFAULT_TASK_GROUP]), vec!["unlocated", "located"]);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let tasks = vec![
            task("first", "", Some(1), None),
            task("second", "", Some(1), None),
            task("third", "", Some(1), None),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();

        let grouped = grouper(&[]).group(&refs);
        assert_eq!(
            names(&grouped[DEFAULT_TASK_GROUP]),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_same_line_orders_by_column() {
        let at = |name: &str, column: usize| Task {
            task: name.to_string(),
            location: Some(Location::new("Taskfile.yml", 2, column)),
            ..Default::default()
        };
        let tasks = vec![at("a", 20), at("b", 9)];
        let refs: Vec<&Task> = tasks.iter().collect();

        let grouped = grouper(&[]).group(&refs);
        assert_eq!(names(&grouped[DEFAULT_TASK_GROUP]), vec!["b", "a"]);
    }

    #[test]
    fn test_large_index_still_before_unset() {
        let tasks = vec![
            task("unset", "", None, Some(1)),
            task("huge", "", Some(i64::MAX - 1), Some(2)),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();

        let grouped = grouper(&[]).group(&refs);
        assert_eq!(names(&grouped[DEFAULT_TASK_GROUP]), vec!["huge", "unset"]);
    }

    #[test]
    fn test_grouping_does_not_mutate_tasks() {
        let tasks = vec![task("a", "", None, None)];
        let refs: Vec<&Task> = tasks.iter().collect();

        let grouped = grouper(&[]).group(&refs);
        assert!(grouped.contains_key(DEFAULT_TASK_GROUP));
        assert!(tasks[0].category.is_empty());
    }

    #[test]
    fn test_explicit_category_order() {
        let tasks = vec![
            task("t", "test", None, None),
            task("l", "lint", None, None),
            task("b", "build", None, None),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();

        let grouper = grouper(&["build", "test"]);
        let grouped = grouper.group(&refs);
        assert_eq!(grouper.sorted_groups(&grouped), vec!["build", "test", "lint"]);
    }

    #[test]
    fn test_explicit_categories_skip_absent_groups() {
        let tasks = vec![
            task("a", "", None, None),
            task("d", "docs", None, None),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();

        let grouper = grouper(&["release", "docs"]);
        let grouped = grouper.group(&refs);
        assert_eq!(
            grouper.sorted_groups(&grouped),
            vec!["docs", DEFAULT_TASK_GROUP]
        );
    }

    #[test]
    fn test_default_group_first_without_categories() {
        let tasks = vec![
            task("z", "zeta", None, None),
            task("a", "alpha", None, None),
            task("g", "", None, None),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();

        let grouper = grouper(&[]);
        let grouped = grouper.group(&refs);
        assert_eq!(
            grouper.sorted_groups(&grouped),
            vec![DEFAULT_TASK_GROUP, "alpha", "zeta"]
        );
    }

    #[test]
    fn test_no_default_group_present() {
        let tasks = vec![task("z", "zeta", None, None), task("a", "alpha", None, None)];
        let refs: Vec<&Task> = tasks.iter().collect();

        let grouper = grouper(&[]);
        let grouped = grouper.group(&refs);
        assert_eq!(grouper.sorted_groups(&grouped), vec!["alpha", "zeta"]);
    }
}
