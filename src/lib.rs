mod adapters;
mod controllers;
mod core;
mod presenters;

pub use adapters::fabric::rayon_fabric::RayonFabric;
pub use controllers::cli::cli_controller::{CliController, CliError};
pub use controllers::engine::{
    AwaitError, CompletionReport, EngineConfig, EngineState, ExecutionFabric, FabricError, FabricJobId, JobHandle,
    JobLifecycleManager, ProgressUpdate, RenderEngine, RenderEnginePresenterPort, RenderError, RenderEvent,
    RenderRequest, RequestOrigin,
};
pub use controllers::ports::file_presenter::{FilePresenterError, FilePresenterPort};
pub use crate::core::actions::cancellation::{CancelToken, Cancelled, NeverCancel};
pub use crate::core::actions::execute_task::execute_task::execute_task;
pub use crate::core::actions::execute_task::ports::colour_map::ColourMap;
pub use crate::core::actions::execute_task::ports::column_kernel::{ColumnKernel, KernelError};
pub use crate::core::data::complex::Complex;
pub use crate::core::data::pixel_selection::{PixelSelection, PixelSelectionError};
pub use crate::core::data::point::Point;
pub use crate::core::data::raster::{Image, ImageError};
pub use crate::core::data::render_params::RenderParameters;
pub use crate::core::data::render_task::{CompletedTask, RenderTask, TaskFailure, TaskOutcome};
pub use crate::core::data::rgb::Rgb;
pub use crate::core::data::viewport::{Viewport, ViewportError};
pub use crate::core::data::viewport_history::ViewportHistory;
pub use crate::core::fractals::mandelbrot::algorithm::{escape_time, MandelbrotKernel};
pub use crate::core::fractals::mandelbrot::colour_map::MandelbrotGreenGradient;
pub use crate::core::jobs::render_job::{JobProgress, RenderJob};
pub use presenters::channel::channel_presenter::ChannelPresenter;
pub use presenters::file::image_file::ImageFilePresenter;
