//! Up-to-date checks for listed tasks
//!
//! Whether a task is up to date is answered by a [`StatusOracle`]. Checks
//! may hit the file system, so [`decorate`] runs them concurrently under a
//! permit limit while keeping results in input order.

use crate::list::ListError;
use crate::task::{DecoratedTask, Task};
use anyhow::anyhow;
use async_trait::async_trait;
use futures::future::join_all;
use std::path::PathBuf;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Options handed to every status check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusOptions {
    /// Fingerprint method; a task's own method overrides this default
    pub method: String,
    /// Scratch directory for fingerprint state
    pub temp_dir: PathBuf,
    /// Suppress side effects of the check
    pub dry: bool,
}

impl StatusOptions {
    /// Options for one task, applying its method override
    pub fn for_task(&self, task: &Task) -> StatusOptions {
        let mut options = self.clone();
        if !task.method.is_empty() {
            options.method = task.method.clone();
        }
        options
    }
}

/// Answers whether a task's outputs are current
#[async_trait]
pub trait StatusOracle: Send + Sync {
    async fn is_up_to_date(&self, task: &Task, options: &StatusOptions) -> anyhow::Result<bool>;
}

/// Decorated tasks in input order plus the first failed check, if any
#[derive(Debug)]
pub struct Decorated<'a> {
    pub tasks: Vec<DecoratedTask<'a>>,
    pub error: Option<ListError>,
}

impl<'a> Decorated<'a> {
    pub fn into_result(self) -> Result<Vec<DecoratedTask<'a>>, ListError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.tasks),
        }
    }
}

/// Number of concurrent checks used when none is configured
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

/// Decorate tasks without consulting any oracle
pub fn decorate_without_status<'a>(tasks: &[&'a Task]) -> Vec<DecoratedTask<'a>> {
    tasks.iter().map(|task| DecoratedTask::new(task)).collect()
}

/// Check every task against `oracle` with at most `concurrency` checks in
/// flight (`0` means no limit).
///
/// Every check runs to completion. The result always has one entry per input
/// task, in input order; a task whose check failed keeps `up_to_date` unset
/// and the failure of the lowest-indexed such task is reported.
pub async fn decorate<'a>(
    tasks: &[&'a Task],
    oracle: &dyn StatusOracle,
    options: &StatusOptions,
    concurrency: usize,
) -> Decorated<'a> {
    // more permits than tasks are never used, and tokio caps the total
    let limit = match concurrency {
        0 => tasks.len(),
        n => n.min(tasks.len()),
    }
    .clamp(1, Semaphore::MAX_PERMITS);
    debug!(
        "Checking status of {} task(s) with up to {} concurrent check(s)",
        tasks.len(),
        limit
    );

    let permits = Semaphore::new(limit);
    let mut slots = decorate_without_status(tasks);
    let mut failures: Vec<Option<anyhow::Error>> = tasks.iter().map(|_| None).collect();

    let checks = slots
        .iter_mut()
        .zip(failures.iter_mut())
        .map(|(slot, failure)| {
            let permits = &permits;
            async move {
                let _permit = match permits.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        *failure = Some(anyhow!(e));
                        return;
                    }
                };

                let task_options = options.for_task(slot.task);
                match oracle.is_up_to_date(slot.task, &task_options).await {
                    Ok(up_to_date) => slot.up_to_date = Some(up_to_date),
                    Err(e) => *failure = Some(e),
                }
            }
        });
    join_all(checks).await;

    let error = failures
        .into_iter()
        .zip(tasks)
        .find_map(|(failure, task)| {
            failure.map(|source| ListError::StatusCheckFailed {
                task: task.task.clone(),
                source,
            })
        });

    if let Some(ref error) = error {
        warn!("{}", error);
    }

    Decorated {
        tasks: slots,
        error,
    }
}
