pub mod cancellation;
pub mod execute_task;
