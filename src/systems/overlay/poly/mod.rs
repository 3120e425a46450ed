// handles cell geometry

pub mod voronoi;
pub mod utils;
