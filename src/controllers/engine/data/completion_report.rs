use std::collections::BTreeSet;
use std::time::Duration;

use crate::core::data::render_task::TaskFailure;
use crate::core::data::viewport::Viewport;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionReport {
    pub generation: u64,
    pub viewport: Viewport,
    /// Wall-clock time from submission to the end of assembly.
    pub duration: Duration,
    pub failures: Vec<TaskFailure>,
}

impl CompletionReport {
    #[must_use]
    pub fn duration_millis(&self) -> u128 {
        self.duration.as_millis()
    }

    #[must_use]
    pub fn failed_columns(&self) -> BTreeSet<u32> {
        self.failures.iter().map(TaskFailure::column).collect()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
