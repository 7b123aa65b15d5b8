use image::RgbImage;
use thiserror::Error;

use crate::core::data::rgb::Rgb;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image size must be positive: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("pixel at x:{x}, y:{y} outside of {width}x{height} image")]
    PixelOutsideBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("column {column} outside of image width {width}")]
    ColumnOutsideBounds { column: u32, width: u32 },
    #[error("column has {actual} rows, image height is {expected}")]
    ColumnLength { expected: usize, actual: usize },
}

/// Float RGB raster, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Image {
    /// Creates an image cleared to white.
    pub fn new(width: u32, height: u32) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidSize { width, height });
        }

        Ok(Self {
            width,
            height,
            pixels: vec![Rgb::WHITE; width as usize * height as usize],
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Rgb) -> Result<(), ImageError> {
        let index = self.index(x, y).ok_or(ImageError::PixelOutsideBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;

        self.pixels[index] = colour;
        Ok(())
    }

    #[must_use]
    pub fn column(&self, x: u32) -> Option<Vec<Rgb>> {
        (x < self.width).then(|| (0..self.height).map(|y| self.pixels[self.offset(x, y)]).collect())
    }

    /// Overwrites one column top to bottom. Validates before writing, so a
    /// rejected column leaves the image untouched.
    pub fn write_column(&mut self, x: u32, rows: &[Rgb]) -> Result<(), ImageError> {
        if x >= self.width {
            return Err(ImageError::ColumnOutsideBounds {
                column: x,
                width: self.width,
            });
        }

        if rows.len() != self.height as usize {
            return Err(ImageError::ColumnLength {
                expected: self.height as usize,
                actual: rows.len(),
            });
        }

        for (y, colour) in (0..self.height).zip(rows) {
            let offset = self.offset(x, y);
            self.pixels[offset] = *colour;
        }

        Ok(())
    }

    /// 8-bit copy for display or encoding.
    #[must_use]
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(self.pixels[self.offset(x, y)].to_rgb8())
        })
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| self.offset(x, y))
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_cleared_to_white() {
        let image = Image::new(4, 3).unwrap();

        assert_eq!(image.pixels().len(), 12);
        assert!(image.pixels().iter().all(|&p| p == Rgb::WHITE));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert_eq!(
            Image::new(0, 3),
            Err(ImageError::InvalidSize {
                width: 0,
                height: 3
            })
        );
    }

    #[test]
    fn test_write_column_fills_every_row() {
        let mut image = Image::new(3, 2).unwrap();
        let green = Rgb::new(0.0, 1.0, 0.0);

        image.write_column(1, &[green, Rgb::BLACK]).unwrap();

        assert_eq!(image.pixel(1, 0), Some(green));
        assert_eq!(image.pixel(1, 1), Some(Rgb::BLACK));
        assert_eq!(image.pixel(0, 0), Some(Rgb::WHITE));
        assert_eq!(image.column(1), Some(vec![green, Rgb::BLACK]));
    }

    #[test]
    fn test_write_column_with_wrong_length_leaves_image_intact() {
        let mut image = Image::new(2, 2).unwrap();
        let before = image.clone();

        let result = image.write_column(0, &[Rgb::BLACK]);

        assert_eq!(
            result,
            Err(ImageError::ColumnLength {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(image, before);
    }

    #[test]
    fn test_write_column_outside_width_fails() {
        let mut image = Image::new(2, 1).unwrap();

        assert_eq!(
            image.write_column(2, &[Rgb::BLACK]),
            Err(ImageError::ColumnOutsideBounds {
                column: 2,
                width: 2
            })
        );
    }

    #[test]
    fn test_set_pixel_outside_bounds_fails() {
        let mut image = Image::new(2, 2).unwrap();

        assert!(matches!(
            image.set_pixel(2, 0, Rgb::BLACK),
            Err(ImageError::PixelOutsideBounds { x: 2, y: 0, .. })
        ));
        assert_eq!(image.pixel(5, 5), None);
    }

    #[test]
    fn test_to_rgb_image_quantises_pixels() {
        let mut image = Image::new(2, 1).unwrap();
        image.set_pixel(1, 0, Rgb::new(0.0, 0.5, 0.0)).unwrap();

        let encoded = image.to_rgb_image();

        assert_eq!(encoded.dimensions(), (2, 1));
        assert_eq!(encoded.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(encoded.get_pixel(1, 0).0, [0, 128, 0]);
    }
}
