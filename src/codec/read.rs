//! Deserialization of the binary index format.
//!
//! A single forward pass over the byte stream. Id strings are interned so
//! that the thousands of cells referencing the same area share one
//! allocation.

use std::io::Read;
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use tracing::info;

use crate::error::FormatError;
use crate::raster::{AreaFragment, Cell, Point, RasterIndex};

use super::{FORMAT_VERSION, OBSOLETE_FORMAT_SENTINEL};

/// Read a raster index from the given byte stream.
///
/// Fails with a [`FormatError`] on a truncated or malformed stream, on a
/// version this reader does not understand, and on data written by the
/// obsolete unversioned format.
pub fn from_reader<R: Read>(reader: &mut R) -> Result<RasterIndex, FormatError> {
    let version = read_u16(reader)?;
    if version == OBSOLETE_FORMAT_SENTINEL {
        return Err(FormatError::ObsoleteFormat);
    }
    if version != FORMAT_VERSION {
        return Err(FormatError::WrongVersion {
            expected: FORMAT_VERSION,
            found: version,
        });
    }

    let mut interner = Interner::default();

    let area_count = read_count(reader, "area size count")?;
    let mut area_sizes = HashMap::with_capacity(area_count);
    for _ in 0..area_count {
        let id = interner.intern(read_string(reader)?);
        let size = read_f64(reader)?;
        area_sizes.insert(id, size);
    }

    let width = read_i32(reader)?;
    if width <= 0 {
        return Err(FormatError::InvalidCount {
            field: "raster width",
            value: width,
        });
    }

    let cell_count = read_count(reader, "raster cell count")?;
    let mut cells = Vec::with_capacity(cell_count);
    for _ in 0..cell_count {
        cells.push(read_cell(reader, &mut interner)?);
    }

    let index = RasterIndex::new(cells, width as u32, area_sizes)?;
    info!(
        "loaded raster index: {}x{} cells, {} area sizes",
        index.width(),
        index.height(),
        index.area_sizes().len()
    );
    Ok(index)
}

fn read_cell<R: Read>(reader: &mut R, interner: &mut Interner) -> Result<Cell, FormatError> {
    let containing_count = read_u8(reader)? as usize;
    let mut containing_ids = Vec::with_capacity(containing_count);
    for _ in 0..containing_count {
        containing_ids.push(interner.intern(read_string(reader)?));
    }

    let area_count = read_u8(reader)? as usize;
    let mut areas = Vec::with_capacity(area_count);
    for _ in 0..area_count {
        areas.push(read_area(reader, interner)?);
    }

    Ok(Cell::new(containing_ids, areas))
}

fn read_area<R: Read>(reader: &mut R, interner: &mut Interner) -> Result<AreaFragment, FormatError> {
    let id = interner.intern(read_string(reader)?);
    let outer = read_rings(reader)?;
    let inner = read_rings(reader)?;
    Ok(AreaFragment::new(id, outer, inner))
}

fn read_rings<R: Read>(reader: &mut R) -> Result<Vec<Vec<Point>>, FormatError> {
    let ring_count = read_u8(reader)? as usize;
    let mut rings = Vec::with_capacity(ring_count);
    for _ in 0..ring_count {
        let point_count = read_count(reader, "ring point count")?;
        let mut ring = Vec::with_capacity(point_count);
        for _ in 0..point_count {
            let x = read_u16(reader)?;
            let y = read_u16(reader)?;
            ring.push(Point::new(x, y));
        }
        rings.push(ring);
    }
    Ok(rings)
}

/// Deduplicates id strings across the whole stream.
#[derive(Default)]
struct Interner {
    pool: HashSet<Arc<str>>,
}

impl Interner {
    fn intern(&mut self, s: String) -> Arc<str> {
        if let Some(existing) = self.pool.get(s.as_str()) {
            return Arc::clone(existing);
        }
        let id: Arc<str> = s.into();
        self.pool.insert(Arc::clone(&id));
        id
    }
}

fn read_string<R: Read>(reader: &mut R) -> Result<String, FormatError> {
    let len = read_u16(reader)? as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}

fn read_count<R: Read>(reader: &mut R, field: &'static str) -> Result<usize, FormatError> {
    let value = read_i32(reader)?;
    if value < 0 {
        return Err(FormatError::InvalidCount { field, value });
    }
    Ok(value as usize)
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8, std::io::Error> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16<R: Read>(reader: &mut R) -> Result<u16, std::io::Error> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32, std::io::Error> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

fn read_f64<R: Read>(reader: &mut R) -> Result<f64, std::io::Error> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_be_bytes(buf))
}
