use crate::env::NAMESPACE_SEPARATOR;
use crate::task::types::{DecoratedTask, Task};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// Hierarchical view of a task list keyed by namespace segment
#[derive(Debug, Clone, Default, Serialize)]
pub struct NamespaceNode<'a> {
    /// Segment name, empty for the root
    #[serde(skip)]
    pub name: String,
    /// Tasks declared directly at this level
    pub tasks: Vec<DecoratedTask<'a>>,
    #[serde(rename = "namespaces", skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, NamespaceNode<'a>>,
    /// Taskfile path for the root, unset for derived namespaces
    pub location: Option<PathBuf>,
}

impl<'a> NamespaceNode<'a> {
    pub fn new(name: impl Into<String>, location: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
            children: BTreeMap::new(),
            location,
        }
    }

    /// Build the tree for `tasks`.
    ///
    /// Without `nested` the root holds every task in input order. With it,
    /// each task name is split on `:` and the task lands in the node reached
    /// by its leading segments, creating nodes on the way.
    pub fn build(
        tasks: Vec<DecoratedTask<'a>>,
        nested: bool,
        root_location: Option<PathBuf>,
    ) -> Self {
        let mut root = Self::new("", root_location);

        if !nested {
            root.tasks = tasks;
            return root;
        }

        for task in tasks {
            root.insert(task);
        }

        debug!(
            "Built namespace tree with {} top-level namespace(s)",
            root.children.len()
        );
        root
    }

    /// Place `task` under the namespaces named by its leading segments
    pub fn insert(&mut self, task: DecoratedTask<'a>) {
        let source: &'a Task = task.task;
        let segments: Vec<&'a str> = source.task.split(NAMESPACE_SEPARATOR).collect();
        let parents = &segments[..segments.len().saturating_sub(1)];

        let mut node = self;
        for segment in parents {
            node = node
                .children
                .entry((*segment).to_string())
                .or_insert_with(|| NamespaceNode::new(*segment, None));
        }
        node.tasks.push(task);
    }

    /// Follow a path of segment names from this node
    #[cfg(test)]
    pub fn get(&self, path: &[&str]) -> Option<&NamespaceNode<'a>> {
        path.iter()
            .try_fold(self, |node, segment| node.children.get(*segment))
    }

    /// Number of tasks in this node and every descendant
    #[cfg(test)]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
            + self
                .children
                .values()
                .map(NamespaceNode::task_count)
                .sum::<usize>()
    }
}
