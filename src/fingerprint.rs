//! Modification-time freshness checks
//!
//! A task is up to date when none of its `sources` is newer than the newest of
//! its `generates`. Tasks without generated files are tracked through a
//! marker file under the fingerprint directory, created on the first check.

use crate::list::{StatusOptions, StatusOracle};
use crate::task::{Glob, Task};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// Directories never scanned for sources
const SKIPPED_DIRS: &[&str] = &[".git", ".taskr"];

/// [`StatusOracle`] comparing file modification times
#[derive(Debug, Clone)]
pub struct TimestampOracle {
    root: PathBuf,
}

impl TimestampOracle {
    /// Oracle resolving task directories against `root`, normally the
    /// Taskfile's directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl StatusOracle for TimestampOracle {
    async fn is_up_to_date(&self, task: &Task, options: &StatusOptions) -> Result<bool> {
        match options.method.as_str() {
            "none" => return Ok(false),
            // checksums are not stored, fall back to modification times
            "" | "timestamp" | "checksum" => {}
            other => bail!("unknown fingerprint method '{}'", other),
        }

        if task.sources.is_empty() {
            return Ok(false);
        }

        let check = TimestampCheck {
            dir: self.root.join(&task.dir),
            sources: task.sources.clone(),
            generates: task.generates.clone(),
            marker: marker_path(&options.temp_dir, &task.task),
            dry: options.dry,
        };
        let task_name = task.task.clone();

        let up_to_date = tokio::task::spawn_blocking(move || check.run())
            .await
            .context("timestamp check was aborted")??;
        debug!("Task {} up to date: {}", task_name, up_to_date);
        Ok(up_to_date)
    }
}

struct TimestampCheck {
    dir: PathBuf,
    sources: Vec<Glob>,
    generates: Vec<Glob>,
    marker: PathBuf,
    dry: bool,
}

impl TimestampCheck {
    fn run(self) -> Result<bool> {
        let sources = expand_globs(&self.dir, &self.sources)?;
        let mut generates = expand_globs(&self.dir, &self.generates)?;

        if self.marker.exists() {
            generates.push(self.marker.clone());
        } else if !self.dry {
            if let Some(parent) = self.marker.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            File::create(&self.marker)
                .with_context(|| format!("failed to create {}", self.marker.display()))?;
        }

        let Some(generated_at) = max_modified(&generates)? else {
            return Ok(false);
        };

        let mut stale = false;
        for source in &sources {
            if modified(source)? > generated_at {
                debug!("{} is newer than the generated files", source.display());
                stale = true;
                break;
            }
        }

        if !stale && !self.dry && self.marker.exists() {
            File::options()
                .write(true)
                .open(&self.marker)
                .and_then(|marker| marker.set_modified(SystemTime::now()))
                .with_context(|| format!("failed to touch {}", self.marker.display()))?;
        }

        Ok(!stale)
    }
}

/// Marker file recording when `task` was last seen up to date
pub fn marker_path(temp_dir: &Path, task: &str) -> PathBuf {
    temp_dir.join("timestamp").join(normalize_filename(task))
}

fn normalize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn build_set(patterns: impl Iterator<Item = String>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(&pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob '{}'", pattern))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Files under `dir` matched by `globs`, minus the excluded ones
pub fn expand_globs(dir: &Path, globs: &[Glob]) -> Result<Vec<PathBuf>> {
    if globs.iter().all(|glob| glob.negate) {
        return Ok(Vec::new());
    }

    let normalize = |glob: &Glob| glob.glob.trim_start_matches("./").to_string();
    let include = build_set(globs.iter().filter(|g| !g.negate).map(normalize))?;
    let exclude = build_set(globs.iter().filter(|g| g.negate).map(normalize))?;

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e
                    .file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRS.contains(&name))
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        if include.is_match(relative) && !exclude.is_match(relative) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

fn modified(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .with_context(|| format!("failed to read modification time of {}", path.display()))
}

fn max_modified(paths: &[PathBuf]) -> Result<Option<SystemTime>> {
    let mut latest = None;
    for path in paths {
        let time = modified(path)?;
        if latest.is_none_or(|current| time > current) {
            latest = Some(time);
        }
    }
    Ok(latest)
}
