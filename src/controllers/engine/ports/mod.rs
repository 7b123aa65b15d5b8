pub mod execution_fabric;
pub mod presenter;
