pub mod complex;
pub mod pixel_selection;
pub mod point;
pub mod raster;
pub mod render_params;
pub mod render_task;
pub mod rgb;
pub mod viewport;
pub mod viewport_history;
