use crate::core::jobs::render_job::JobProgress;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub generation: u64,
    pub progress: JobProgress,
}

impl ProgressUpdate {
    /// Completed share in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.progress.fraction()
    }
}
