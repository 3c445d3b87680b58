//! Configuration discovery and loading
//!
//! This module handles the configuration discovery hierarchy:
//! 1. Explicit file: `--config` or the `TASKR_CONFIG` environment variable
//! 2. Current directory: ./taskr.toml or ./.taskr/config.toml
//! 3. User config: ~/.taskr/config.toml
//! 4. Built-in defaults

use crate::env;
use crate::taskfile::TaskSorter;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Settings that can be fixed per project or per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskrConfig {
    /// Maximum concurrent status checks; unset uses every available core
    pub concurrency: Option<usize>,
    /// Group heading for tasks without a category
    pub default_group: String,
    /// Never run status checks for JSON listings
    pub no_status: bool,
    /// Nest JSON listings by namespace
    pub nested: bool,
    /// Fingerprint scratch directory; defaults to `.taskr/checksum` next to the Taskfile
    pub temp_dir: Option<PathBuf>,
    pub sort: TaskSorter,
}

impl Default for TaskrConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            default_group: env::DEFAULT_TASK_GROUP.to_string(),
            no_status: false,
            nested: false,
            temp_dir: None,
            sort: TaskSorter::default(),
        }
    }
}

impl TaskrConfig {
    /// Load from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: TaskrConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save to TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load the explicit config file if given, else the first discovered one
    pub fn discover_config(explicit: Option<&Path>) -> Result<TaskrConfig> {
        if let Some(path) = explicit {
            info!("Loading configuration from: {:?}", path);
            return TaskrConfig::from_toml_file(path);
        }

        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return TaskrConfig::from_toml_file(config_path);
        }

        info!("No configuration file found, using defaults");
        Ok(TaskrConfig::default())
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        let candidates = Self::get_config_candidates();

        for candidate in candidates {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Get list of configuration file candidates in priority order
    fn get_config_candidates() -> Vec<PathBuf> {
        let from_env = std_env::var_os(env::CONFIG_ENV_VAR).map(PathBuf::from);
        let current_dir = std_env::current_dir().ok();
        let home_dir = Self::get_home_dir();

        config_candidates(from_env, current_dir.as_deref(), home_dir.as_deref())
    }

    /// Get home directory path
    fn get_home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Show configuration discovery information for debugging
    pub fn show_discovery_info() {
        println!("Configuration Discovery Hierarchy:");
        println!();

        let candidates = Self::get_config_candidates();
        for (i, candidate) in candidates.iter().enumerate() {
            let status = if candidate.exists() {
                if candidate.is_file() {
                    "✓ EXISTS"
                } else {
                    "✗ NOT A FILE"
                }
            } else {
                "✗ NOT FOUND"
            };

            println!("  {}. {:?} - {}", i + 1, candidate, status);
        }

        println!();
        if let Some(found) = Self::find_config_file() {
            println!("Active configuration: {:?}", found);
        } else {
            println!("Active configuration: Built-in defaults");
        }
    }
}

fn config_candidates(
    from_env: Option<PathBuf>,
    current_dir: Option<&Path>,
    home_dir: Option<&Path>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    candidates.extend(from_env.filter(|path| !path.as_os_str().is_empty()));

    if let Some(current_dir) = current_dir {
        candidates.push(current_dir.join(env::LOCAL_CONFIG_FILE_NAME));
        candidates.push(env::local_config_file_path(current_dir));
    }

    if let Some(home_dir) = home_dir {
        candidates.push(env::user_config_file_path(home_dir));
    }

    candidates
}
