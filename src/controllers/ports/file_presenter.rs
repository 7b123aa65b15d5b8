use std::path::Path;

use thiserror::Error;

use crate::core::data::raster::Image;

#[derive(Debug, Error)]
pub enum FilePresenterError {
    #[error("unsupported image format for {0}")]
    UnsupportedFormat(String),
    #[error("failed to create output directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

pub trait FilePresenterPort {
    fn present(&self, image: &Image, filepath: &Path) -> Result<(), FilePresenterError>;
}
