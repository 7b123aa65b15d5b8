use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::controllers::engine::ports::execution_fabric::FabricJobId;

/// A submitted job. Clones share the cancellation flag and the highest
/// progress count observed so far.
#[derive(Debug, Clone)]
pub struct JobHandle {
    generation: u64,
    fabric_job: FabricJobId,
    total: usize,
    submitted_at: Instant,
    observed: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl JobHandle {
    pub(crate) fn new(generation: u64, fabric_job: FabricJobId, total: usize, submitted_at: Instant) -> Self {
        Self {
            generation,
            fabric_job,
            total,
            submitted_at,
            observed: Arc::new(AtomicUsize::new(0)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn fabric_job(&self) -> FabricJobId {
        self.fabric_job
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn submitted_at(&self) -> Instant {
        self.submitted_at
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Returns true if this call performed the cancellation.
    pub(crate) fn mark_cancelled(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    /// Records a reported count and returns the highest count seen, capped at
    /// `total`.
    pub(crate) fn observe(&self, reported: usize) -> usize {
        let reported = reported.min(self.total);
        self.observed.fetch_max(reported, Ordering::AcqRel).max(reported)
    }
}
