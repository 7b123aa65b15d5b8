#[allow(clippy::module_inception)]
pub mod execute_task;
pub mod ports;
