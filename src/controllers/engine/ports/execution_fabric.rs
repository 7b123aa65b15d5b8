use std::fmt;

use thiserror::Error;

use crate::core::data::render_task::{CompletedTask, RenderTask};

/// Identifier a fabric hands out for a submitted job.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FabricJobId(pub u64);

impl fmt::Display for FabricJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FabricError {
    #[error("fabric rejected the job: {0}")]
    Rejected(String),
    #[error("fabric is unavailable: {0}")]
    Unavailable(String),
    #[error("unknown fabric job {0}")]
    UnknownJob(FabricJobId),
    #[error("fabric job {job} is not finished: {completed} of {total} tasks done")]
    Incomplete {
        job: FabricJobId,
        completed: usize,
        total: usize,
    },
    #[error("fabric job {job} returned malformed results: expected column {expected}, found {found}")]
    MalformedResults {
        job: FabricJobId,
        expected: u32,
        found: u32,
    },
}

/// A parallel (possibly distributed) executor of independent render tasks.
///
/// `submit_job` and `query_progress` must not block on computation. Results
/// may be returned in any order; callers reorder them by column.
pub trait ExecutionFabric: Send + Sync {
    fn submit_job(&self, tasks: Vec<RenderTask>) -> Result<FabricJobId, FabricError>;

    /// Number of tasks that have finished, successfully or not.
    fn query_progress(&self, job: FabricJobId) -> Result<usize, FabricError>;

    /// Every task's outcome, available once all tasks have finished.
    fn fetch_results(&self, job: FabricJobId) -> Result<Vec<CompletedTask>, FabricError>;

    /// Best effort; tasks already running may still finish.
    fn cancel(&self, job: FabricJobId);
}
