use crate::task::types::Location;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading Taskfiles and decoding task definitions
#[derive(Debug, Error)]
pub enum TaskfileError {
    #[error(
        "{location}: invalid task definition, expected a command, a list of commands or a task object"
    )]
    InvalidShape { location: Location },

    #[error("{location}: task cannot have both cmd and cmds")]
    ConflictingCommandForms { location: Location },

    #[error("{location}: failed to decode task: {source}")]
    Decode {
        location: Location,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{location}: task name cannot be empty")]
    EmptyTaskName { location: Location },

    #[error("Taskfile '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("IO error reading '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Taskfile '{path}' is not valid YAML: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Taskfile '{path}' is invalid: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("No Taskfile found in '{dir}' or any of its parent directories")]
    NoTaskfile { dir: PathBuf },

    #[error("Task '{call}' does not exist")]
    TaskNotFound { call: String },

    #[error("Found multiple tasks ({}) that match '{call}'", .tasks.join(", "))]
    TaskNameConflict { call: String, tasks: Vec<String> },
}

impl TaskfileError {
    /// Source position of the offending definition, when known
    pub fn location(&self) -> Option<&Location> {
        match self {
            TaskfileError::InvalidShape { location }
            | TaskfileError::ConflictingCommandForms { location }
            | TaskfileError::Decode { location, .. }
            | TaskfileError::EmptyTaskName { location } => Some(location),
            _ => None,
        }
    }
}
