use crate::core::data::rgb::Rgb;

pub trait ColourMap {
    type T;

    fn map(&self, value: Self::T) -> Rgb;
}
