//! The raster index and its public query API.

use std::io::{Read, Write};
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};

use crate::codec;
use crate::error::{FormatError, InputError};
use crate::grid::{self, Grid};

use super::cell::Cell;

/// A raster of cells over the world map for fast lookup of which
/// administrative areas contain a geo position.
///
/// Most cells resolve to a definite answer; only cells straddling a border
/// carry simplified local polygon fragments for an exact point-in-polygon
/// test. Once constructed the index is immutable, so a single loaded
/// instance can serve unlimited concurrent readers without locks.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterIndex {
    cells: Vec<Cell>,
    grid: Grid,
    area_sizes: HashMap<Arc<str>, f64>,
}

impl RasterIndex {
    /// Create an index from its parts. This is the construction interface
    /// for the offline generator; at runtime, use [`RasterIndex::from_reader`].
    ///
    /// `area_sizes` maps area ids to their total geographic size and is
    /// used only to order point query results; ids absent from the map are
    /// treated as size 0. Fails unless the cell array is non-empty and
    /// divides evenly into rows of `width`.
    pub fn new(
        cells: Vec<Cell>,
        width: u32,
        area_sizes: HashMap<Arc<str>, f64>,
    ) -> Result<Self, FormatError> {
        if width == 0 || cells.is_empty() || cells.len() % width as usize != 0 {
            return Err(FormatError::GridMismatch {
                cells: cells.len(),
                width,
            });
        }
        let height = (cells.len() / width as usize) as u32;
        Ok(Self {
            cells,
            grid: Grid::new(width, height),
            area_sizes,
        })
    }

    /// Read an index from a byte stream in the versioned binary format.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, FormatError> {
        codec::from_reader(reader)
    }

    /// Read an index from an in-memory byte slice.
    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self, FormatError> {
        Self::from_reader(&mut bytes)
    }

    /// Write the index to a byte sink in the versioned binary format.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<(), FormatError> {
        codec::write_to(self, sink)
    }

    pub fn width(&self) -> u32 {
        self.grid.width
    }

    pub fn height(&self) -> u32 {
        self.grid.height
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn area_sizes(&self) -> &HashMap<Arc<str>, f64> {
        &self.area_sizes
    }

    /// Whether the given position is in the area with the given id.
    ///
    /// Longitude may be any finite value and is wrapped; latitude must lie
    /// within -90..=90.
    pub fn is_in(&self, longitude: f64, latitude: f64, id: &str) -> Result<bool, InputError> {
        let ids: HashSet<&str> = [id].into_iter().collect();
        self.is_in_any(longitude, latitude, &ids)
    }

    /// Whether the given position is in any of the areas with the given
    /// ids. Membership is tested per candidate id, so large id sets stay
    /// cheap.
    pub fn is_in_any(
        &self,
        longitude: f64,
        latitude: f64,
        ids: &HashSet<&str>,
    ) -> Result<bool, InputError> {
        grid::validate_position(longitude, latitude)?;
        let longitude = grid::normalize_longitude(longitude);
        let x = self.grid.cell_x(longitude);
        let y = self.grid.cell_y(latitude);
        let local = self.grid.local_point(x, y, longitude, latitude);
        Ok(self.cell(x, y).is_in_any(local, ids))
    }

    /// The ids of all areas containing the given position, sorted by area
    /// size ascending, so an enclave is reported before the area that
    /// surrounds it. Ids of equal size are ordered lexicographically; ids
    /// without a known size sort first.
    pub fn get_ids(&self, longitude: f64, latitude: f64) -> Result<Vec<&str>, InputError> {
        grid::validate_position(longitude, latitude)?;
        let longitude = grid::normalize_longitude(longitude);
        let x = self.grid.cell_x(longitude);
        let y = self.grid.cell_y(latitude);
        let local = self.grid.local_point(x, y, longitude, latitude);
        let mut ids = self.cell(x, y).ids_at(local);
        ids.sort_by(|a, b| {
            self.size_of(a)
                .total_cmp(&self.size_of(b))
                .then_with(|| a.cmp(b))
        });
        Ok(ids)
    }

    /// The ids of all areas guaranteed to contain the given bounding box
    /// fully, in no particular order. The box may wrap around the 180th
    /// longitude (min longitude 170, max longitude -170).
    ///
    /// Only whole-cell coverage counts: an area that covers every touched
    /// cell merely partially cannot be guaranteed and is excluded.
    pub fn get_containing_ids(
        &self,
        min_longitude: f64,
        min_latitude: f64,
        max_longitude: f64,
        max_latitude: f64,
    ) -> Result<HashSet<&str>, InputError> {
        grid::validate_bounds(min_longitude, min_latitude, max_longitude, max_latitude)?;
        let min_longitude = grid::normalize_longitude(min_longitude);
        let max_longitude = grid::normalize_longitude(max_longitude);

        let mut ids: HashSet<&str> = HashSet::new();
        let mut first = true;
        for (x, y) in self
            .grid
            .cells_in(min_longitude, min_latitude, max_longitude, max_latitude)
        {
            let cell = self.cell(x, y);
            if first {
                ids.extend(cell.containing_ids().iter().map(|id| id.as_ref()));
                first = false;
            } else {
                ids.retain(|id| cell.contains_id(id));
                if ids.is_empty() {
                    break;
                }
            }
        }
        Ok(ids)
    }

    /// The ids of all areas that may intersect the given bounding box, in
    /// no particular order. Any point within the box can only be in one of
    /// the returned areas (or none): the answer is conservative, resolved
    /// at cell granularity without testing fragment geometry against the
    /// box. The box may wrap around the 180th longitude.
    pub fn get_intersecting_ids(
        &self,
        min_longitude: f64,
        min_latitude: f64,
        max_longitude: f64,
        max_latitude: f64,
    ) -> Result<HashSet<&str>, InputError> {
        grid::validate_bounds(min_longitude, min_latitude, max_longitude, max_latitude)?;
        let min_longitude = grid::normalize_longitude(min_longitude);
        let max_longitude = grid::normalize_longitude(max_longitude);

        let mut ids: HashSet<&str> = HashSet::new();
        for (x, y) in self
            .grid
            .cells_in(min_longitude, min_latitude, max_longitude, max_latitude)
        {
            ids.extend(self.cell(x, y).all_ids());
        }
        Ok(ids)
    }

    fn cell(&self, x: u32, y: u32) -> &Cell {
        &self.cells[(y * self.grid.width + x) as usize]
    }

    fn size_of(&self, id: &str) -> f64 {
        self.area_sizes.get(id).copied().unwrap_or(0.0)
    }
}
