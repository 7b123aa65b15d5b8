use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::debug;

use crate::controllers::engine::errors::render::AwaitError;
use crate::controllers::engine::job_handle::JobHandle;
use crate::controllers::engine::ports::execution_fabric::{ExecutionFabric, FabricError};
use crate::core::actions::cancellation::Cancelled;
use crate::core::data::render_task::CompletedTask;
use crate::core::jobs::render_job::{JobProgress, RenderJob};
use crate::core::util::lock::lock;

/// Drives render jobs through an execution fabric.
///
/// Each submission gets a new generation number. Only the most recently
/// submitted, uncancelled job is live; results of any other job are treated
/// as stale and never handed out.
pub struct JobLifecycleManager {
    fabric: Arc<dyn ExecutionFabric>,
    next_generation: AtomicU64,
    live_generation: AtomicU64,
    live: Mutex<Option<JobHandle>>,
    poll_interval: Duration,
}

impl JobLifecycleManager {
    pub fn new(fabric: Arc<dyn ExecutionFabric>, poll_interval: Duration) -> Self {
        Self {
            fabric,
            next_generation: AtomicU64::new(0),
            live_generation: AtomicU64::new(0),
            live: Mutex::new(None),
            poll_interval,
        }
    }

    /// Reserves the generation number the next submission will carry.
    pub fn next_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Hands every task to the fabric and returns without waiting.
    ///
    /// The new job supersedes whatever was live before; the superseded job
    /// is cancelled on the fabric.
    pub fn submit(&self, job: RenderJob) -> Result<JobHandle, (u64, FabricError)> {
        let generation = self.next_generation();
        self.submit_as(generation, job)
            .map_err(|source| (generation, source))
    }

    pub(crate) fn submit_as(&self, generation: u64, job: RenderJob) -> Result<JobHandle, FabricError> {
        let total = job.len();
        let submitted_at = job.submitted_at();
        let fabric_job = self.fabric.submit_job(job.into_tasks())?;

        let handle = JobHandle::new(generation, fabric_job, total, submitted_at);

        self.live_generation.fetch_max(generation, Ordering::SeqCst);
        debug!("submitted render {} as fabric job {} ({} tasks)", generation, fabric_job, total);

        let superseded = {
            let mut live = lock(&self.live);
            if live.as_ref().is_some_and(|newer| newer.generation() > generation) {
                None
            } else {
                live.replace(handle.clone())
            }
        };

        if let Some(previous) = superseded {
            self.cancel(&previous);
        }

        Ok(handle)
    }

    /// Tasks finished so far. Never blocks and never goes backwards; a
    /// failed query reports the last observed count.
    pub fn poll(&self, handle: &JobHandle) -> JobProgress {
        self.try_poll(handle).unwrap_or_else(|err| {
            debug!("progress query for render {} failed: {}", handle.generation(), err);
            self.observed(handle, 0)
        })
    }

    fn try_poll(&self, handle: &JobHandle) -> Result<JobProgress, FabricError> {
        let reported = self.fabric.query_progress(handle.fabric_job())?;

        Ok(self.observed(handle, reported))
    }

    fn observed(&self, handle: &JobHandle, reported: usize) -> JobProgress {
        JobProgress {
            completed: handle.observe(reported),
            total: handle.total(),
        }
    }

    /// Marks the job stale and asks the fabric to stop it.
    pub fn cancel(&self, handle: &JobHandle) {
        if handle.mark_cancelled() {
            debug!("cancelling render {}", handle.generation());
            self.fabric.cancel(handle.fabric_job());
        }
    }

    /// Whether results of this job may still be committed.
    #[must_use]
    pub fn is_live(&self, handle: &JobHandle) -> bool {
        !handle.is_cancelled() && self.live_generation.load(Ordering::SeqCst) == handle.generation()
    }

    /// Blocks until every task has finished, then returns the outcomes in
    /// column order.
    pub fn await_completion(&self, handle: &JobHandle) -> Result<Vec<CompletedTask>, AwaitError> {
        self.await_completion_with(handle, |_| {})
    }

    /// Like [`await_completion`](Self::await_completion), calling
    /// `on_progress` once per poll tick in which the finished count changed.
    ///
    /// Returns [`AwaitError::Cancelled`] as soon as the job goes stale, and
    /// [`AwaitError::Fabric`] when the fabric can no longer report on a live
    /// job or hands back results that do not cover every column once.
    pub fn await_completion_with<F>(
        &self,
        handle: &JobHandle,
        mut on_progress: F,
    ) -> Result<Vec<CompletedTask>, AwaitError>
    where
        F: FnMut(JobProgress),
    {
        let mut last_reported = None;

        loop {
            if !self.is_live(handle) {
                return Err(AwaitError::Cancelled(Cancelled));
            }

            let progress = match self.try_poll(handle) {
                Ok(progress) => progress,
                // a cancel racing the query makes the fabric forget the job
                Err(_) if !self.is_live(handle) => return Err(AwaitError::Cancelled(Cancelled)),
                Err(err) => return Err(AwaitError::Fabric(err)),
            };
            if last_reported != Some(progress.completed) {
                on_progress(progress);
                last_reported = Some(progress.completed);
            }

            if progress.is_complete() {
                break;
            }

            thread::sleep(self.poll_interval);
        }

        let mut results = self.fabric.fetch_results(handle.fabric_job())?;

        if !self.is_live(handle) {
            return Err(AwaitError::Cancelled(Cancelled));
        }

        if results.len() != handle.total() {
            return Err(AwaitError::Fabric(FabricError::Incomplete {
                job: handle.fabric_job(),
                completed: results.len(),
                total: handle.total(),
            }));
        }

        results.sort_by_key(|task| task.column_index);

        let misplaced = results
            .iter()
            .zip(0u32..)
            .find(|(task, expected)| task.column_index != *expected);

        if let Some((task, expected)) = misplaced {
            return Err(AwaitError::Fabric(FabricError::MalformedResults {
                job: handle.fabric_job(),
                expected,
                found: task.column_index,
            }));
        }

        Ok(results)
    }

    /// Blocking form: submit and wait.
    pub fn run_to_completion(&self, job: RenderJob) -> Result<Vec<CompletedTask>, AwaitError> {
        let handle = self.submit(job).map_err(|(_, source)| AwaitError::Fabric(source))?;
        self.await_completion(&handle)
    }
}
