use thiserror::Error;

use crate::core::data::point::Point;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum PixelSelectionError {
    #[error("pixel selection must cover a non-empty area: {width}x{height}")]
    Empty { width: u32, height: u32 },
}

/// A drag rectangle in image space.
///
/// Built from the two corners of a mouse drag in either order; stored as the
/// top-left corner plus a size, like the selection rectangle drawn on screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelSelection {
    top_left: Point,
    width: u32,
    height: u32,
}

impl PixelSelection {
    pub fn from_corners(start: Point, end: Point) -> Result<Self, PixelSelectionError> {
        let width = start.x.abs_diff(end.x);
        let height = start.y.abs_diff(end.y);

        if width == 0 || height == 0 {
            return Err(PixelSelectionError::Empty { width, height });
        }

        Ok(Self {
            top_left: Point {
                x: start.x.min(end.x),
                y: start.y.min(end.y),
            },
            width,
            height,
        })
    }

    #[must_use]
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
}
