use thiserror::Error;

use crate::core::actions::cancellation::{CancelToken, Cancelled};
use crate::core::data::render_task::RenderTask;
use crate::core::data::rgb::Rgb;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    #[error("{0}")]
    Failed(String),
}

/// Computes the colours of one image column.
///
/// Implementations must be pure with respect to the task: the same task
/// (seed included) always yields the same column.
pub trait ColumnKernel: Send + Sync {
    fn compute(&self, task: &RenderTask, cancel: &dyn CancelToken) -> Result<Vec<Rgb>, KernelError>;
}

impl<K: ColumnKernel + ?Sized> ColumnKernel for std::sync::Arc<K> {
    fn compute(&self, task: &RenderTask, cancel: &dyn CancelToken) -> Result<Vec<Rgb>, KernelError> {
        (**self).compute(task, cancel)
    }
}
