//! Hemlock - fast lookup of the administrative areas containing a geo position
//!
//! The core structure is a precomputed raster over the world map. Most
//! cells resolve to a definite answer ("entirely inside area X"); only
//! cells straddling a border carry simplified local polygon fragments for
//! an exact point-in-polygon test, so queries run in microseconds without
//! holding full boundary geometry in memory.
//!
//! An index is produced once by an offline generator and serialized with
//! the versioned [`codec`]. At runtime, load it with
//! [`RasterIndex::from_reader`] (or [`RasterIndex::from_bytes`]) and share
//! the immutable instance freely across threads.

pub mod codec;
pub mod error;
mod grid;
pub mod raster;

pub use error::{FormatError, InputError};
pub use raster::{AreaFragment, Cell, Point, RasterIndex};
