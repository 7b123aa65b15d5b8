use std::time::Duration;

use crate::controllers::engine::errors::render::RenderError;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// How often the engine polls the live job and reports progress.
    pub progress_interval: Duration,
}

impl EngineConfig {
    #[must_use]
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_progress_interval(mut self, progress_interval: Duration) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(RenderError::InvalidParameter(format!(
                "image size must be positive: {}x{}",
                self.image_width, self.image_height
            )));
        }

        if self.progress_interval.is_zero() {
            return Err(RenderError::InvalidParameter(
                "progress interval must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            image_width: 1024,
            image_height: 768,
            progress_interval: Duration::from_millis(50),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_sized_image_is_invalid() {
        assert!(matches!(
            EngineConfig::new(0, 10).validate(),
            Err(RenderError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_zero_interval_is_invalid() {
        let config = EngineConfig::new(4, 4).with_progress_interval(Duration::ZERO);

        assert!(config.validate().is_err());
    }
}
