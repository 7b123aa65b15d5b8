//! Render engine: job lifecycle and the interactive facade.
//!
//! A render request becomes a [`RenderJob`](crate::core::jobs::render_job::RenderJob)
//! of one task per column, submitted to an [`ExecutionFabric`]. The
//! [`JobLifecycleManager`] tracks the live job by generation so results of a
//! superseded job are never assembled.
//!
//! # Architecture
//!
//! - **Input**: `RenderEngine::render`, `zoom_into`, `zoom_out`, `refresh`
//! - **Output**: `RenderEnginePresenterPort` receiving `RenderEvent`s
//! - **Fabric**: `ExecutionFabric` trait; `adapters::fabric` has the local one

pub mod data;
#[allow(clippy::module_inception)]
pub mod engine;
pub mod errors;
pub mod events;
pub mod job_handle;
pub mod lifecycle;
pub mod ports;
pub mod types;

pub use data::completion_report::CompletionReport;
pub use data::engine_config::EngineConfig;
pub use data::progress_update::ProgressUpdate;
pub use engine::RenderEngine;
pub use errors::render::{AwaitError, RenderError};
pub use events::render::RenderEvent;
pub use job_handle::JobHandle;
pub use lifecycle::JobLifecycleManager;
pub use ports::execution_fabric::{ExecutionFabric, FabricError, FabricJobId};
pub use ports::presenter::RenderEnginePresenterPort;
pub use types::{EngineState, RenderRequest, RequestOrigin};
