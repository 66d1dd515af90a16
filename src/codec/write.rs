//! Serialization of the binary index format.

use std::io::Write;

use tracing::debug;

use crate::error::FormatError;
use crate::raster::{AreaFragment, Cell, Point, RasterIndex};

use super::{FORMAT_VERSION, MAX_BYTE_COUNT};

/// Write the raster index to the given byte sink.
///
/// Refuses data the format cannot represent: more than 255 containing ids
/// or area fragments in a cell, more than 255 rings in a ring list, or an
/// id longer than 65535 bytes. Such overflows are generation-time
/// invariant violations, usually fixed by regenerating with a finer
/// raster.
pub fn write_to<W: Write>(index: &RasterIndex, sink: &mut W) -> Result<(), FormatError> {
    write_u16(sink, FORMAT_VERSION)?;

    write_count(sink, index.area_sizes().len(), "area size table")?;
    for (id, size) in index.area_sizes() {
        write_string(sink, id)?;
        write_f64(sink, *size)?;
    }

    write_i32(sink, index.width() as i32)?;
    write_count(sink, index.cells().len(), "raster")?;
    for cell in index.cells() {
        write_cell(sink, cell)?;
    }

    debug!(
        "serialized raster index: {}x{} cells, {} area sizes",
        index.width(),
        index.height(),
        index.area_sizes().len()
    );
    Ok(())
}

fn write_cell<W: Write>(sink: &mut W, cell: &Cell) -> Result<(), FormatError> {
    write_byte_count(sink, cell.containing_ids().len(), "a cell's containing id list")?;
    for id in cell.containing_ids() {
        write_string(sink, id)?;
    }

    write_byte_count(sink, cell.areas().len(), "a cell's area fragment list")?;
    for area in cell.areas() {
        write_area(sink, area)?;
    }
    Ok(())
}

fn write_area<W: Write>(sink: &mut W, area: &AreaFragment) -> Result<(), FormatError> {
    write_string(sink, area.id())?;
    write_rings(sink, area.outer())?;
    write_rings(sink, area.inner())
}

fn write_rings<W: Write>(sink: &mut W, rings: &[Vec<Point>]) -> Result<(), FormatError> {
    write_byte_count(sink, rings.len(), "an area's ring list")?;
    for ring in rings {
        write_count(sink, ring.len(), "ring")?;
        for point in ring {
            write_u16(sink, point.x)?;
            write_u16(sink, point.y)?;
        }
    }
    Ok(())
}

fn write_string<W: Write>(sink: &mut W, s: &str) -> Result<(), FormatError> {
    if s.len() > u16::MAX as usize {
        return Err(FormatError::CapacityExceeded {
            what: "an id string",
            count: s.len(),
            max: u16::MAX as usize,
        });
    }
    write_u16(sink, s.len() as u16)?;
    sink.write_all(s.as_bytes())?;
    Ok(())
}

fn write_byte_count<W: Write>(sink: &mut W, len: usize, what: &'static str) -> Result<(), FormatError> {
    if len > MAX_BYTE_COUNT {
        return Err(FormatError::CapacityExceeded {
            what,
            count: len,
            max: MAX_BYTE_COUNT,
        });
    }
    write_u8(sink, len as u8)
}

fn write_count<W: Write>(sink: &mut W, len: usize, what: &'static str) -> Result<(), FormatError> {
    if len > i32::MAX as usize {
        return Err(FormatError::CapacityExceeded {
            what,
            count: len,
            max: i32::MAX as usize,
        });
    }
    write_i32(sink, len as i32)
}

fn write_u8<W: Write>(sink: &mut W, value: u8) -> Result<(), FormatError> {
    sink.write_all(&[value])?;
    Ok(())
}

fn write_u16<W: Write>(sink: &mut W, value: u16) -> Result<(), FormatError> {
    sink.write_all(&value.to_be_bytes())?;
    Ok(())
}

fn write_i32<W: Write>(sink: &mut W, value: i32) -> Result<(), FormatError> {
    sink.write_all(&value.to_be_bytes())?;
    Ok(())
}

fn write_f64<W: Write>(sink: &mut W, value: f64) -> Result<(), FormatError> {
    sink.write_all(&value.to_be_bytes())?;
    Ok(())
}
