use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::core::actions::cancellation::{CancelToken, Cancelled};
use crate::core::actions::execute_task::ports::column_kernel::{ColumnKernel, KernelError};
use crate::core::data::render_task::{RenderTask, TaskFailure, TaskOutcome};

/// Runs one task through a kernel and captures any failure as the task's
/// outcome, so a bad column never takes the rest of the job down with it.
///
/// Returns `Err(Cancelled)` when the kernel observed cancellation; a cancelled
/// task has no outcome.
pub fn execute_task<K>(
    task: &RenderTask,
    kernel: &K,
    cancel: &dyn CancelToken,
) -> Result<TaskOutcome, Cancelled>
where
    K: ColumnKernel + ?Sized,
{
    let column = task.column_index;
    let result = panic::catch_unwind(AssertUnwindSafe(|| kernel.compute(task, cancel)));

    let outcome = match result {
        Ok(Ok(rows)) if rows.len() == task.image_height as usize => TaskOutcome::Completed(rows),
        Ok(Ok(rows)) => TaskOutcome::Failed(TaskFailure::RowCount {
            column,
            expected: task.image_height as usize,
            actual: rows.len(),
        }),
        Ok(Err(KernelError::Cancelled(cancelled))) => return Err(cancelled),
        Ok(Err(KernelError::Failed(message))) => {
            TaskOutcome::Failed(TaskFailure::Kernel { column, message })
        }
        Err(payload) => TaskOutcome::Failed(TaskFailure::Panicked {
            column,
            message: panic_message(payload.as_ref()),
        }),
    };

    Ok(outcome)
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
