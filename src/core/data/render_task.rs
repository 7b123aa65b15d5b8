use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::data::complex::Complex;
use crate::core::data::render_params::RenderParameters;
use crate::core::data::rgb::Rgb;
use crate::core::data::viewport::Viewport;

/// One pixel column of a render pass.
///
/// Carries everything needed to compute the column on any worker, including
/// its own supersampling seed, so it can be shipped to another process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderTask {
    pub column_index: u32,
    pub image_width: u32,
    pub image_height: u32,
    pub viewport: Viewport,
    pub params: RenderParameters,
    pub random_seed: u64,
}

impl RenderTask {
    /// Plane coordinate sampled for `row`, offset within the pixel by
    /// `(jitter_x, jitter_y)` in `[0, 1)`. `(0.5, 0.5)` is the pixel centre.
    #[must_use]
    pub fn sample_point(&self, row: u32, jitter_x: f64, jitter_y: f64) -> Complex {
        let real = self.viewport.origin_x()
            + (f64::from(self.column_index) + jitter_x) / f64::from(self.image_width)
                * self.viewport.width();
        let imag = self.viewport.max_y()
            - (f64::from(row) + jitter_y) / f64::from(self.image_height) * self.viewport.height();

        Complex { real, imag }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TaskFailure {
    #[error("column {column}: kernel failed: {message}")]
    Kernel { column: u32, message: String },
    #[error("column {column}: worker panicked: {message}")]
    Panicked { column: u32, message: String },
    #[error("column {column}: produced {actual} rows, expected {expected}")]
    RowCount {
        column: u32,
        expected: usize,
        actual: usize,
    },
    #[error("column {column}: could not be assembled: {message}")]
    Assembly { column: u32, message: String },
}

impl TaskFailure {
    #[must_use]
    pub fn column(&self) -> u32 {
        match self {
            Self::Kernel { column, .. }
            | Self::Panicked { column, .. }
            | Self::RowCount { column, .. }
            | Self::Assembly { column, .. } => *column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaskOutcome {
    /// One colour per image row, top to bottom.
    Completed(Vec<Rgb>),
    Failed(TaskFailure),
}

impl TaskOutcome {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// A task's outcome as reported back by an execution fabric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub column_index: u32,
    pub outcome: TaskOutcome,
}
