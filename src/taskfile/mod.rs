//! Taskfile loading and task lookup
//!
//! A Taskfile is a YAML document declaring a version, an optional default
//! fingerprint method, an optional category display order and the task
//! definitions themselves:
//!
//! ```yaml
//! version: '3'
//! categories: [build, test]
//! tasks:
//!   build: cargo build
//!   test:
//!     desc: Run the test suite
//!     category: test
//!     cmds: [cargo test]
//! ```

pub mod locate;
pub mod sort;

pub use sort::TaskSorter;

use crate::env::TASKFILE_NAMES;
use crate::task::{Location, Task, TaskfileError};
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fingerprint method used when neither the Taskfile nor the task sets one
pub const DEFAULT_METHOD: &str = "checksum";

/// A parsed Taskfile with its tasks in declaration order
#[derive(Debug, Clone, Default)]
pub struct Taskfile {
    pub location: PathBuf,
    pub version: String,
    pub method: String,
    /// Explicit display order of categories
    pub categories: Vec<String>,
    pub tasks: Vec<Task>,
}

/// Result of resolving an invocation name
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedTask<'a> {
    pub task: &'a Task,
    /// Values captured by wildcards in the task name
    pub wildcards: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawTaskfile {
    version: Option<Value>,
    method: Option<String>,
    categories: Option<Vec<String>>,
    tasks: Option<serde_yaml::Mapping>,
}

impl Taskfile {
    /// Load and parse a Taskfile from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TaskfileError> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading Taskfile: {:?}", path);

        let source = fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TaskfileError::NotFound { path: path.clone() },
            _ => TaskfileError::Read {
                path: path.clone(),
                source: e,
            },
        })?;

        let taskfile = Self::parse(&source, path)?;
        info!(
            "Loaded {} task(s) from {:?}",
            taskfile.tasks.len(),
            taskfile.location
        );
        Ok(taskfile)
    }

    /// Parse Taskfile `source`, attributing positions to `path`
    pub fn parse(source: &str, path: impl Into<PathBuf>) -> Result<Self, TaskfileError> {
        let path = path.into();

        let raw: RawTaskfile = if source.trim().is_empty() {
            RawTaskfile::default()
        } else {
            serde_yaml::from_str(source).map_err(|e| TaskfileError::Yaml {
                path: path.clone(),
                source: e,
            })?
        };

        let definitions = raw.tasks.unwrap_or_default();
        let names = definitions
            .keys()
            .map(|key| {
                scalar_to_string(key).ok_or_else(|| TaskfileError::InvalidDocument {
                    path: path.clone(),
                    reason: format!("task names must be scalars, found {key:?}"),
                })
            })
            .collect::<Result<Vec<String>, _>>()?;

        let mut positions = locate::locate_task_keys(source);
        locate::locate_flow_keys(source, names.iter().map(String::as_str), &mut positions);

        let mut tasks = Vec::with_capacity(definitions.len());
        for (name, node) in names.iter().zip(definitions.values()) {
            let (line, column) = positions.get(name).copied().unwrap_or((0, 0));
            let location = Location::new(path.clone(), line, column);
            tasks.push(Task::from_node(name, node, location)?);
        }

        let version = match raw.version {
            None => String::new(),
            Some(value) => scalar_to_string(&value).ok_or_else(|| TaskfileError::InvalidDocument {
                path: path.clone(),
                reason: "version must be a string or a number".to_string(),
            })?,
        };

        Ok(Taskfile {
            location: path,
            version,
            method: raw
                .method
                .filter(|method| !method.is_empty())
                .unwrap_or_else(|| DEFAULT_METHOD.to_string()),
            categories: raw.categories.unwrap_or_default(),
            tasks,
        })
    }

    /// Look up a task by exact name
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.task == name)
    }

    /// Resolve an invocation name: exact name, then wildcard names, then aliases.
    ///
    /// Several wildcard or alias candidates make the call ambiguous.
    pub fn find(&self, call: &str) -> Result<MatchedTask<'_>, TaskfileError> {
        if let Some(task) = self.get(call) {
            return Ok(MatchedTask {
                task,
                wildcards: Vec::new(),
            });
        }

        let mut wildcard_matches: Vec<MatchedTask<'_>> = self
            .tasks
            .iter()
            .filter(|task| task.task.contains('*'))
            .filter_map(|task| match task.wildcard_match(call) {
                (true, wildcards) => Some(MatchedTask { task, wildcards }),
                _ => None,
            })
            .collect();
        if wildcard_matches.len() > 1 {
            return Err(TaskfileError::TaskNameConflict {
                call: call.to_string(),
                tasks: wildcard_matches.iter().map(|m| m.task.task.clone()).collect(),
            });
        }
        if let Some(matched) = wildcard_matches.pop() {
            return Ok(matched);
        }

        let alias_matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.aliases.iter().any(|alias| alias == call))
            .collect();
        match alias_matches.as_slice() {
            [] => Err(TaskfileError::TaskNotFound {
                call: call.to_string(),
            }),
            [task] => Ok(MatchedTask {
                task: *task,
                wildcards: Vec::new(),
            }),
            many => Err(TaskfileError::TaskNameConflict {
                call: call.to_string(),
                tasks: many.iter().map(|task| task.task.clone()).collect(),
            }),
        }
    }

    /// Tasks that no filter rejects, ordered by `sorter`
    pub fn task_list(&self, filters: &[fn(&Task) -> bool], sorter: TaskSorter) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| !filters.iter().any(|filter_out| filter_out(task)))
            .collect();
        sorter.sort(&mut tasks);
        tasks
    }

    /// Directory the Taskfile lives in
    pub fn dir(&self) -> &Path {
        self.location
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

/// Find a Taskfile in `dir` or the closest ancestor that has one
pub fn discover<P: AsRef<Path>>(dir: P) -> Result<PathBuf, TaskfileError> {
    let start = dir.as_ref();

    for candidate_dir in start.ancestors() {
        for name in TASKFILE_NAMES {
            let candidate = candidate_dir.join(name);
            debug!("Checking for Taskfile: {:?}", candidate);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    Err(TaskfileError::NoTaskfile {
        dir: start.to_path_buf(),
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
