//! The raster of grid cells and its cell-local geometry.

mod area;
mod cell;
mod index;

pub use area::{AreaFragment, Point};
pub use cell::Cell;
pub use index::RasterIndex;
