use crate::env::NAMESPACE_SEPARATOR;
use crate::task::wildcard::wildcard_match;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Variables and environment maps are carried through untouched
pub type Vars = serde_yaml::Mapping;

/// Position of a task definition inside its Taskfile
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub taskfile: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(taskfile: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            taskfile: taskfile.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.taskfile.display(), self.line, self.column)
    }
}

/// Canonical representation of one task definition
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Task {
    /// Name as declared in the Taskfile, possibly containing `*` wildcards
    pub task: String,
    pub cmds: Vec<Command>,
    pub deps: Vec<Dep>,
    pub label: String,
    pub desc: String,
    pub prompt: Vec<String>,
    pub summary: String,
    pub category: String,
    pub requires: Option<Requires>,
    pub aliases: Vec<String>,
    pub sources: Vec<Glob>,
    pub generates: Vec<Glob>,
    pub status: Vec<String>,
    pub preconditions: Vec<Precondition>,
    pub dir: String,
    pub set: Vec<String>,
    pub shopt: Vec<String>,
    pub vars: Option<Vars>,
    pub env: Option<Vars>,
    pub dotenv: Vec<String>,
    pub silent: bool,
    pub interactive: bool,
    pub internal: bool,
    pub method: String,
    pub prefix: String,
    pub ignore_error: bool,
    pub run: String,
    pub platforms: Vec<String>,
    pub watch: bool,
    pub failfast: bool,
    /// Ordering hint within a category; `None` sorts after every explicit value
    pub index: Option<i64>,
    pub location: Option<Location>,
    pub namespace: String,
    pub full_name: String,
}

impl Task {
    /// Display name: label, then fully-qualified name, then declared name
    pub fn name(&self) -> &str {
        if !self.label.is_empty() {
            return &self.label;
        }
        if !self.full_name.is_empty() {
            return &self.full_name;
        }
        &self.task
    }

    /// Fully-qualified name with the namespace prefix stripped
    pub fn local_name(&self) -> &str {
        let name = self
            .full_name
            .strip_prefix(self.namespace.as_str())
            .unwrap_or(&self.full_name);
        name.strip_prefix(NAMESPACE_SEPARATOR).unwrap_or(name)
    }

    /// Match a concrete invocation name against this task's name pattern
    pub fn wildcard_match(&self, name: &str) -> (bool, Vec<String>) {
        wildcard_match(&self.task, name)
    }

    /// Source line used as the ordering tie-break, 0 when unknown
    pub fn line(&self) -> usize {
        self.location.as_ref().map_or(0, |location| location.line)
    }

    pub fn has_description(&self) -> bool {
        !self.desc.is_empty()
    }

    /// Independent copy of this task re-homed under `namespace`
    pub fn namespaced(&self, namespace: &str) -> Task {
        let qualify = |name: &str| format!("{namespace}{NAMESPACE_SEPARATOR}{name}");

        let mut task = self.clone();
        task.task = qualify(&self.task);
        task.full_name = if self.full_name.is_empty() {
            qualify(&self.task)
        } else {
            qualify(&self.full_name)
        };
        task.namespace = if self.namespace.is_empty() {
            namespace.to_string()
        } else {
            qualify(&self.namespace)
        };
        task.aliases = self.aliases.iter().map(|alias| qualify(alias)).collect();
        task
    }
}

/// One entry of a task's command list
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawCommand")]
pub struct Command {
    /// Shell command line, empty for task calls
    pub cmd: String,
    /// Called task name, empty for shell commands
    pub task: String,
    pub vars: Option<Vars>,
    pub silent: bool,
    pub ignore_error: bool,
    pub defer: bool,
    pub platforms: Vec<String>,
}

impl Command {
    pub fn shell(cmd: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            ..Default::default()
        }
    }

    pub fn call(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            ..Default::default()
        }
    }

    pub fn is_task_call(&self) -> bool {
        !self.task.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCommand {
    Text(String),
    Number(serde_yaml::Number),
    Bool(bool),
    Full(FullCommand),
}

#[derive(Deserialize)]
struct FullCommand {
    #[serde(default)]
    cmd: Option<String>,
    #[serde(default)]
    task: Option<String>,
    #[serde(default)]
    defer: Option<RawDefer>,
    #[serde(default)]
    vars: Option<Vars>,
    #[serde(default)]
    silent: bool,
    #[serde(default)]
    ignore_error: bool,
    #[serde(default)]
    platforms: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDefer {
    Shell(String),
    Call {
        task: String,
        #[serde(default)]
        vars: Option<Vars>,
    },
}

impl TryFrom<RawCommand> for Command {
    type Error = String;

    fn try_from(raw: RawCommand) -> Result<Self, Self::Error> {
        let full = match raw {
            RawCommand::Text(cmd) => return Ok(Command::shell(cmd)),
            RawCommand::Number(number) => return Ok(Command::shell(number.to_string())),
            RawCommand::Bool(value) => return Ok(Command::shell(value.to_string())),
            RawCommand::Full(full) => full,
        };

        let mut command = Command {
            vars: full.vars,
            silent: full.silent,
            ignore_error: full.ignore_error,
            platforms: full.platforms,
            ..Default::default()
        };

        match (full.cmd, full.task, full.defer) {
            (Some(cmd), None, None) => command.cmd = cmd,
            (None, Some(task), None) => command.task = task,
            (None, None, Some(RawDefer::Shell(cmd))) => {
                command.cmd = cmd;
                command.defer = true;
            }
            (None, None, Some(RawDefer::Call { task, vars })) => {
                command.task = task;
                command.vars = vars.or(command.vars);
                command.defer = true;
            }
            (None, None, None) => {
                return Err("command must have one of 'cmd', 'task' or 'defer'".to_string());
            }
            _ => {
                return Err("command can only have one of 'cmd', 'task' or 'defer'".to_string());
            }
        }

        Ok(command)
    }
}

/// Dependency on another task
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "RawDep")]
pub struct Dep {
    pub task: String,
    pub vars: Option<Vars>,
    pub silent: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDep {
    Name(String),
    Full {
        task: String,
        #[serde(default)]
        vars: Option<Vars>,
        #[serde(default)]
        silent: bool,
    },
}

impl From<RawDep> for Dep {
    fn from(raw: RawDep) -> Self {
        match raw {
            RawDep::Name(task) => Dep {
                task,
                ..Default::default()
            },
            RawDep::Full { task, vars, silent } => Dep { task, vars, silent },
        }
    }
}

/// Source or generated file pattern; `negate` marks an `exclude:` entry
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawGlob")]
pub struct Glob {
    pub glob: String,
    pub negate: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGlob {
    Pattern(String),
    Exclude { exclude: String },
}

impl From<RawGlob> for Glob {
    fn from(raw: RawGlob) -> Self {
        match raw {
            RawGlob::Pattern(glob) => Glob {
                glob,
                negate: false,
            },
            RawGlob::Exclude { exclude } => Glob {
                glob: exclude,
                negate: true,
            },
        }
    }
}

/// Shell check that must succeed before the task runs
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawPrecondition")]
pub struct Precondition {
    pub sh: String,
    pub msg: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrecondition {
    Sh(String),
    Full {
        sh: String,
        #[serde(default)]
        msg: Option<String>,
    },
}

impl From<RawPrecondition> for Precondition {
    fn from(raw: RawPrecondition) -> Self {
        let (sh, msg) = match raw {
            RawPrecondition::Sh(sh) => (sh, None),
            RawPrecondition::Full { sh, msg } => (sh, msg),
        };
        let msg = msg.unwrap_or_else(|| format!("`{sh}` failed"));
        Precondition { sh, msg }
    }
}

/// Variables a caller must provide
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Requires {
    #[serde(default)]
    pub vars: Vec<RequiredVar>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRequiredVar")]
pub struct RequiredVar {
    pub name: String,
    /// Allowed values, empty when any value is accepted
    pub allowed: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRequiredVar {
    Name(String),
    Full {
        name: String,
        #[serde(default, rename = "enum")]
        allowed: Vec<String>,
    },
}

impl From<RawRequiredVar> for RequiredVar {
    fn from(raw: RawRequiredVar) -> Self {
        match raw {
            RawRequiredVar::Name(name) => RequiredVar {
                name,
                allowed: Vec::new(),
            },
            RawRequiredVar::Full { name, allowed } => RequiredVar { name, allowed },
        }
    }
}

/// A task paired with its freshness flag; `up_to_date` is unset when status
/// checking was skipped or failed for this task
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecoratedTask<'a> {
    pub task: &'a Task,
    pub up_to_date: Option<bool>,
}

impl<'a> DecoratedTask<'a> {
    pub fn new(task: &'a Task) -> Self {
        Self {
            task,
            up_to_date: None,
        }
    }

    pub fn with_status(task: &'a Task, up_to_date: bool) -> Self {
        Self {
            task,
            up_to_date: Some(up_to_date),
        }
    }
}
