pub mod completion_report;
pub mod engine_config;
pub mod progress_update;
