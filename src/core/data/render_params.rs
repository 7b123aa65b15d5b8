use serde::{Deserialize, Serialize};

pub const MIN_MAX_ITERATIONS: u32 = 100;
pub const MAX_MAX_ITERATIONS: u32 = 5000;
pub const MIN_SUPER_SAMPLES: u32 = 1;
pub const MAX_SUPER_SAMPLES: u32 = 32;

/// Escape-time iteration budget and samples per pixel.
///
/// Out-of-range inputs are clamped to the nearest bound rather than rejected,
/// so a value of this type is always renderable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderParameters {
    max_iterations: u32,
    super_samples: u32,
}

impl RenderParameters {
    #[must_use]
    pub fn new(max_iterations: u32, super_samples: u32) -> Self {
        Self {
            max_iterations: max_iterations.clamp(MIN_MAX_ITERATIONS, MAX_MAX_ITERATIONS),
            super_samples: super_samples.clamp(MIN_SUPER_SAMPLES, MAX_SUPER_SAMPLES),
        }
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[must_use]
    pub fn super_samples(&self) -> u32 {
        self.super_samples
    }

    #[must_use]
    pub fn with_max_iterations(self, max_iterations: u32) -> Self {
        Self::new(max_iterations, self.super_samples)
    }

    #[must_use]
    pub fn with_super_samples(self, super_samples: u32) -> Self {
        Self::new(self.max_iterations, super_samples)
    }
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self::new(1000, 1)
    }
}
