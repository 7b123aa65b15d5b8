use crate::core::actions::execute_task::ports::colour_map::ColourMap;
use crate::core::data::rgb::Rgb;

/// Black to green far from the set, green to white close to it.
#[derive(Debug, Clone, Copy)]
pub struct MandelbrotGreenGradient {
    max_iterations: u32,
}

impl MandelbrotGreenGradient {
    #[must_use]
    pub fn new(max_iterations: u32) -> Self {
        Self { max_iterations }
    }
}

impl ColourMap for MandelbrotGreenGradient {
    type T = u32;

    fn map(&self, iterations: u32) -> Rgb {
        if iterations >= self.max_iterations {
            return Rgb::BLACK;
        }

        let quotient = f64::from(iterations) / f64::from(self.max_iterations);
        let c = quotient.powf(1.0 / 3.0) as f32;

        if quotient > 0.5 {
            Rgb::new(c, 1.0, c)
        } else {
            Rgb::new(0.0, c, 0.0)
        }
    }
}
