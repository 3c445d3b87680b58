//! Task definition decoding
//!
//! A task may be written in three ways:
//! - a single command: `build: cargo build`
//! - a list of commands: `build: [cargo fmt, cargo build]`
//! - a full task object with `cmd` or `cmds` plus metadata
//!
//! An empty definition (`build:`) is a task without commands. The node shape decides which form applies. Anything else is rejected with
//! the definition's location attached.

use crate::task::error::TaskfileError;
use crate::task::types::*;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use tracing::debug;

impl Task {
    /// Decode one task definition node.
    pub fn from_node(name: &str, node: &Value, location: Location) -> Result<Task, TaskfileError> {
        if name.is_empty() {
            return Err(TaskfileError::EmptyTaskName { location });
        }

        let mut task = match node {
            Value::String(cmd) => Task::with_cmds(vec![Command::shell(cmd.as_str())]),
            Value::Number(number) => Task::with_cmds(vec![Command::shell(number.to_string())]),
            Value::Bool(value) => Task::with_cmds(vec![Command::shell(value.to_string())]),
            Value::Sequence(_) => {
                let cmds = decode::<Vec<Command>>(node, &location)?;
                Task::with_cmds(cmds)
            }
            Value::Mapping(_) => {
                let raw = decode::<RawTask>(node, &location)?;
                raw.into_task(&location)?
            }
            Value::Null => Task::default(),
            Value::Tagged(_) => {
                return Err(TaskfileError::InvalidShape { location });
            }
        };

        debug!(
            "Decoded task '{}' with {} command(s) at {}",
            name,
            task.cmds.len(),
            location
        );

        task.task = name.to_string();
        task.full_name = name.to_string();
        task.location = Some(location);
        Ok(task)
    }

    fn with_cmds(cmds: Vec<Command>) -> Task {
        Task {
            cmds,
            ..Default::default()
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    node: &Value,
    location: &Location,
) -> Result<T, TaskfileError> {
    serde_yaml::from_value(node.clone()).map_err(|source| TaskfileError::Decode {
        location: location.clone(),
        source,
    })
}

/// Full task object as written in YAML
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawTask {
    cmds: Option<Vec<Command>>,
    cmd: Option<Command>,
    deps: Vec<Dep>,
    label: String,
    desc: String,
    #[serde(deserialize_with = "deserialize_prompt")]
    prompt: Vec<String>,
    summary: String,
    category: String,
    aliases: Vec<String>,
    sources: Vec<Glob>,
    generates: Vec<Glob>,
    status: Vec<String>,
    preconditions: Vec<Precondition>,
    dir: String,
    set: Vec<String>,
    shopt: Vec<String>,
    vars: Option<Vars>,
    env: Option<Vars>,
    dotenv: Vec<String>,
    silent: bool,
    interactive: bool,
    internal: bool,
    method: String,
    prefix: String,
    ignore_error: bool,
    run: String,
    platforms: Vec<String>,
    requires: Option<Requires>,
    watch: bool,
    failfast: bool,
    #[serde(deserialize_with = "deserialize_index")]
    index: Option<i64>,
}

impl RawTask {
    fn into_task(self, location: &Location) -> Result<Task, TaskfileError> {
        let cmds = match (self.cmd, self.cmds) {
            (Some(_), Some(_)) => {
                return Err(TaskfileError::ConflictingCommandForms {
                    location: location.clone(),
                });
            }
            (Some(cmd), None) => vec![cmd],
            (None, cmds) => cmds.unwrap_or_default(),
        };

        Ok(Task {
            cmds,
            deps: self.deps,
            label: self.label,
            desc: self.desc,
            prompt: self.prompt,
            summary: self.summary,
            category: self.category,
            requires: self.requires,
            aliases: self.aliases,
            sources: self.sources,
            generates: self.generates,
            status: self.status,
            preconditions: self.preconditions,
            dir: self.dir,
            set: self.set,
            shopt: self.shopt,
            vars: self.vars,
            env: self.env,
            dotenv: self.dotenv,
            silent: self.silent,
            interactive: self.interactive,
            internal: self.internal,
            method: self.method,
            prefix: self.prefix,
            ignore_error: self.ignore_error,
            run: self.run,
            platforms: self.platforms,
            watch: self.watch,
            failfast: self.failfast,
            index: self.index,
            ..Default::default()
        })
    }
}

/// `index` accepts an integer; an empty or null scalar leaves it unset
fn deserialize_index<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIndex {
        Int(i64),
        Text(String),
    }

    match Option::<RawIndex>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawIndex::Int(value)) => Ok(Some(value)),
        Some(RawIndex::Text(text)) if text.is_empty() => Ok(None),
        Some(RawIndex::Text(text)) => Err(D::Error::custom(format!(
            "invalid index {text:?}, expected an integer"
        ))),
    }
}

/// `prompt` accepts a single message or a list of messages
fn deserialize_prompt<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrompt {
        Single(String),
        Many(Vec<String>),
    }

    Ok(match Option::<RawPrompt>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawPrompt::Single(prompt)) => vec![prompt],
        Some(RawPrompt::Many(prompts)) => prompts,
    })
}
