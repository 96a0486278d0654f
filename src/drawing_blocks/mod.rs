//! Building blocks of the route picture: styles, vector scene, rasterization.

pub mod raster;
pub mod style;
pub mod svg;
