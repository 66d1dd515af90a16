//! Versioned binary serialization of the raster index.
//!
//! The format is a single linear stream with no backtracking: version tag,
//! area size table, raster width, cell count, then each cell in row-major
//! order. All integers are big-endian; ids are length-prefixed UTF-8
//! strings. Collections inside a cell are sized with a single byte, which
//! caps them at 255 entries; the writer refuses data the format cannot
//! represent.

mod read;
mod write;

pub use read::from_reader;
pub use write::write_to;

/// Version tag of the current serialization format.
pub const FORMAT_VERSION: u16 = 2;

/// Leading bytes of streams written by the obsolete, unversioned format.
/// Matched before the version check so old data yields a migration error
/// instead of a generic version mismatch.
pub(crate) const OBSOLETE_FORMAT_SENTINEL: u16 = 0xACED;

/// Collections sized with a single byte hold at most this many entries.
pub(crate) const MAX_BYTE_COUNT: usize = u8::MAX as usize;
