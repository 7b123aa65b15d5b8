use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::data::pixel_selection::PixelSelection;

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum ViewportError {
    #[error("viewport size must be positive: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("viewport coordinates must be finite")]
    NonFinite,
    #[error("image size must be positive: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
}

/// Immutable rectangle of the fractal plane mapped onto the image.
///
/// The origin is the bottom-left corner in plane coordinates. Image rows run
/// top-down, so row 0 samples near `max_y()`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    origin_x: f64,
    origin_y: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    /// The classic full view of the Mandelbrot set.
    pub const DEFAULT: Self = Self {
        origin_x: -2.5,
        origin_y: -1.0,
        width: 3.5,
        height: 2.0,
    };

    pub fn new(origin_x: f64, origin_y: f64, width: f64, height: f64) -> Result<Self, ViewportError> {
        if !(origin_x.is_finite() && origin_y.is_finite() && width.is_finite() && height.is_finite()) {
            return Err(ViewportError::NonFinite);
        }

        if width <= 0.0 || height <= 0.0 {
            return Err(ViewportError::InvalidSize { width, height });
        }

        Ok(Self {
            origin_x,
            origin_y,
            width,
            height,
        })
    }

    #[must_use]
    pub fn origin_x(&self) -> f64 {
        self.origin_x
    }

    #[must_use]
    pub fn origin_y(&self) -> f64 {
        self.origin_y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.origin_x + self.width
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.origin_y + self.height
    }

    /// Maps a (possibly fractional) pixel position to plane coordinates.
    pub fn pixel_to_plane(
        &self,
        pixel_x: f64,
        pixel_y: f64,
        image_width: u32,
        image_height: u32,
    ) -> Result<(f64, f64), ViewportError> {
        if image_width == 0 || image_height == 0 {
            return Err(ViewportError::EmptyImage {
                width: image_width,
                height: image_height,
            });
        }

        let x = self.origin_x + pixel_x / f64::from(image_width) * self.width;
        let y = self.max_y() - pixel_y / f64::from(image_height) * self.height;

        Ok((x, y))
    }

    /// The sub-viewport covered by a drag rectangle on an image of the given size.
    pub fn select_pixels(
        &self,
        selection: PixelSelection,
        image_width: u32,
        image_height: u32,
    ) -> Result<Self, ViewportError> {
        let left = f64::from(selection.top_left().x);
        let top = f64::from(selection.top_left().y);
        let right = left + f64::from(selection.width());
        let bottom = top + f64::from(selection.height());

        let (x1, y1) = self.pixel_to_plane(left, top, image_width, image_height)?;
        let (x2, y2) = self.pixel_to_plane(right, bottom, image_width, image_height)?;

        Self::new(x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DEFAULT
    }
}
