use std::time::Instant;

use rand::Rng;

use crate::core::data::render_params::RenderParameters;
use crate::core::data::render_task::RenderTask;
use crate::core::data::viewport::Viewport;

/// The tasks of one render pass, one per image column, in column order.
#[derive(Debug, Clone)]
pub struct RenderJob {
    tasks: Vec<RenderTask>,
    submitted_at: Instant,
}

impl RenderJob {
    /// Partitions a viewport into one task per column, each with a fresh seed
    /// drawn from `rng`.
    pub fn for_viewport<R: Rng>(
        viewport: Viewport,
        params: RenderParameters,
        image_width: u32,
        image_height: u32,
        rng: &mut R,
    ) -> Self {
        let tasks = (0..image_width)
            .map(|column_index| RenderTask {
                column_index,
                image_width,
                image_height,
                viewport,
                params,
                random_seed: rng.random(),
            })
            .collect();

        Self::from_tasks(tasks)
    }

    #[must_use]
    pub fn from_tasks(tasks: Vec<RenderTask>) -> Self {
        Self {
            tasks,
            submitted_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn tasks(&self) -> &[RenderTask] {
        &self.tasks
    }

    #[must_use]
    pub fn into_tasks(self) -> Vec<RenderTask> {
        self.tasks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn submitted_at(&self) -> Instant {
        self.submitted_at
    }
}

/// Finished task count of a job.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub completed: usize,
    pub total: usize,
}

impl JobProgress {
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }

        self.completed as f64 / self.total as f64
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}
