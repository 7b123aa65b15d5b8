use std::fs;
use std::path::Path;

use image::ImageFormat;
use log::info;

use crate::controllers::ports::file_presenter::{FilePresenterError, FilePresenterPort};
use crate::core::data::raster::Image;

/// Writes rendered images to disk. The format follows the file extension;
/// PNG and binary PPM are supported.
#[derive(Debug, Default)]
pub struct ImageFilePresenter;

impl ImageFilePresenter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn format_for(filepath: &Path) -> Result<ImageFormat, FilePresenterError> {
        match ImageFormat::from_path(filepath) {
            Ok(format @ (ImageFormat::Png | ImageFormat::Pnm)) => Ok(format),
            _ => Err(FilePresenterError::UnsupportedFormat(
                filepath.display().to_string(),
            )),
        }
    }
}

impl FilePresenterPort for ImageFilePresenter {
    fn present(&self, image: &Image, filepath: &Path) -> Result<(), FilePresenterError> {
        let format = Self::format_for(filepath)?;

        if let Some(parent) = filepath.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        image.to_rgb_image().save_with_format(filepath, format)?;

        info!(
            "wrote {}x{} image to {}",
            image.width(),
            image.height(),
            filepath.display()
        );

        Ok(())
    }
}
