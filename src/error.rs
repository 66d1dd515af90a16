//! Error types for query validation and the binary index format.

use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// A query coordinate failed validation.
///
/// Raised at the API boundary before any grid lookup. Longitude is never
/// rejected for being out of range because it is cyclic; it is wrapped
/// instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{name} must be finite")]
    NotFinite { name: &'static str },

    #[error("{name} is out of bounds, must be within -90.0..=90.0 (was {value})")]
    LatitudeOutOfBounds { name: &'static str, value: f64 },

    #[error("max latitude ({max}) is smaller than min latitude ({min})")]
    LatitudeRangeInverted { min: f64, max: f64 },
}

/// Reading or writing the binary index format failed.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream starts with the sentinel of the obsolete, unversioned
    /// serialization format. Such data cannot be migrated at read time.
    #[error("obsolete serialization format, regenerate the boundaries data")]
    ObsoleteFormat,

    #[error(
        "wrong version number '{found}' of the file serialization format \
         (expected: '{expected}'), you may need to get the current version of the data"
    )]
    WrongVersion { expected: u16, found: u16 },

    #[error("invalid {field}: {value}")]
    InvalidCount { field: &'static str, value: i32 },

    #[error("id is not valid UTF-8")]
    InvalidUtf8(#[from] FromUtf8Error),

    /// The in-memory index holds more entries than the format can express.
    /// For per-cell limits, regenerating with a finer raster helps.
    #[error("{what} exceeds format capacity: {count} > {max}")]
    CapacityExceeded {
        what: &'static str,
        count: usize,
        max: usize,
    },

    #[error("raster of {cells} cells does not divide evenly into rows of width {width}")]
    GridMismatch { cells: usize, width: u32 },
}
