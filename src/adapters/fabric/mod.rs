pub mod rayon_fabric;
