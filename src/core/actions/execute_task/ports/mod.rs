pub mod colour_map;
pub mod column_kernel;
