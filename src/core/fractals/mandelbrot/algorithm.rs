use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::core::actions::cancellation::{CancelToken, Cancelled, CANCEL_CHECK_INTERVAL_ROWS};
use crate::core::actions::execute_task::ports::colour_map::ColourMap;
use crate::core::actions::execute_task::ports::column_kernel::{ColumnKernel, KernelError};
use crate::core::data::complex::Complex;
use crate::core::data::render_task::RenderTask;
use crate::core::data::rgb::Rgb;
use crate::core::fractals::mandelbrot::colour_map::MandelbrotGreenGradient;

/// Number of iterations of `z = z² + c` before `|z|² >= 4`, capped at
/// `max_iterations`.
#[must_use]
pub fn escape_time(c: Complex, max_iterations: u32) -> u32 {
    let mut z = Complex::ZERO;
    let mut iteration = 0;

    while z.magnitude_squared() < 4.0 && iteration < max_iterations {
        z = z * z + c;
        iteration += 1;
    }

    iteration
}

/// Escape-time Mandelbrot kernel with optional jittered supersampling.
#[derive(Debug, Clone, Copy, Default)]
pub struct MandelbrotKernel;

impl MandelbrotKernel {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn sample(task: &RenderTask, colour_map: &MandelbrotGreenGradient, row: u32, jitter_x: f64, jitter_y: f64) -> Rgb {
        let c = task.sample_point(row, jitter_x, jitter_y);
        colour_map.map(escape_time(c, task.params.max_iterations()))
    }
}

impl ColumnKernel for MandelbrotKernel {
    fn compute(&self, task: &RenderTask, cancel: &dyn CancelToken) -> Result<Vec<Rgb>, KernelError> {
        let super_samples = task.params.super_samples();
        let colour_map = MandelbrotGreenGradient::new(task.params.max_iterations());
        let mut rng = Pcg32::seed_from_u64(task.random_seed);
        let mut column = Vec::with_capacity(task.image_height as usize);

        for row in 0..task.image_height {
            if row % CANCEL_CHECK_INTERVAL_ROWS == 0 && cancel.is_cancelled() {
                return Err(KernelError::Cancelled(Cancelled));
            }

            if super_samples == 1 {
                column.push(Self::sample(task, &colour_map, row, 0.5, 0.5));
                continue;
            }

            let (mut r, mut g, mut b) = (0.0f32, 0.0f32, 0.0f32);
            for _ in 0..super_samples {
                let jitter_x: f64 = rng.random();
                let jitter_y: f64 = rng.random();
                let colour = Self::sample(task, &colour_map, row, jitter_x, jitter_y);
                r += colour.r;
                g += colour.g;
                b += colour.b;
            }

            let n = super_samples as f32;
            column.push(Rgb::new(r / n, g / n, b / n));
        }

        Ok(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::cancellation::NeverCancel;
    use crate::core::data::render_params::RenderParameters;
    use crate::core::data::viewport::Viewport;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn task(column_index: u32, image_height: u32, params: RenderParameters, random_seed: u64) -> RenderTask {
        RenderTask {
            column_index,
            image_width: 4,
            image_height,
            viewport: Viewport::DEFAULT,
            params,
            random_seed,
        }
    }

    #[test]
    fn test_origin_never_escapes() {
        assert_eq!(escape_time(Complex::ZERO, 1000), 1000);
    }

    #[test]
    fn test_far_point_escapes_after_one_step() {
        assert_eq!(escape_time(Complex::new(-2.0625, 0.5), 1000), 1);
        assert_eq!(escape_time(Complex::new(3.0, 3.0), 1000), 1);
    }

    #[test]
    fn test_column_has_one_colour_per_row() {
        let column = MandelbrotKernel
            .compute(&task(1, 17, RenderParameters::default(), 0), &NeverCancel)
            .unwrap();

        assert_eq!(column.len(), 17);
    }

    #[test]
    fn test_scenario_pixel_is_on_black_green_gradient() {
        // column 0, row 0 of a 4x2 image over the default view samples (-2.0625, 0.5)
        let column = MandelbrotKernel
            .compute(&task(0, 2, RenderParameters::new(1000, 1), 0), &NeverCancel)
            .unwrap();
        let pixel = column[0];

        assert_eq!(pixel.r, 0.0);
        assert_eq!(pixel.b, 0.0);
        assert!(pixel.g > 0.0 && pixel.g < 0.5);
    }

    #[test]
    fn test_single_sample_ignores_seed() {
        let params = RenderParameters::new(500, 1);

        let a = MandelbrotKernel.compute(&task(2, 32, params, 1), &NeverCancel).unwrap();
        let b = MandelbrotKernel.compute(&task(2, 32, params, 99), &NeverCancel).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_supersampling_is_reproducible_for_a_seed() {
        let params = RenderParameters::new(500, 8);

        let a = MandelbrotKernel.compute(&task(2, 32, params, 42), &NeverCancel).unwrap();
        let b = MandelbrotKernel.compute(&task(2, 32, params, 42), &NeverCancel).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_supersampled_channels_stay_in_unit_range() {
        let params = RenderParameters::new(200, 16);
        let column = MandelbrotKernel.compute(&task(1, 64, params, 5), &NeverCancel).unwrap();

        for colour in column {
            for channel in [colour.r, colour.g, colour.b] {
                assert!((0.0..=1.0).contains(&channel), "channel {} out of range", channel);
            }
        }
    }

    #[test]
    fn test_cancelled_token_yields_cancelled_not_partial_column() {
        let cancel = || true;

        let result = MandelbrotKernel.compute(&task(0, 16, RenderParameters::default(), 0), &cancel);

        assert_eq!(result, Err(KernelError::Cancelled(Cancelled)));
    }

    #[test]
    fn test_cancellation_is_polled_while_computing() {
        let polls = AtomicUsize::new(0);
        let cancel_after_two = || polls.fetch_add(1, Ordering::Relaxed) >= 2;

        let result = MandelbrotKernel.compute(
            &task(0, CANCEL_CHECK_INTERVAL_ROWS * 4, RenderParameters::default(), 0),
            &cancel_after_two,
        );

        assert!(matches!(result, Err(KernelError::Cancelled(_))));
        assert_eq!(polls.load(Ordering::Relaxed), 3);
    }
}
