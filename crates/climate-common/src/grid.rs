//! Row-major indexing of a regular lat/lon grid.

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, DashboardResult};

/// Identifier of a grid cell: `row * nlon + col` over the full grid.
///
/// Signed so that identifiers parsed from client input (which may be
/// negative) can be carried until they are validated against a grid.
pub type CellId = i64;

/// Dimensions of a lat/lon grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    /// Number of latitude rows
    pub nlat: usize,
    /// Number of longitude columns
    pub nlon: usize,
}

impl GridShape {
    pub fn new(nlat: usize, nlon: usize) -> Self {
        Self { nlat, nlon }
    }

    /// Total number of grid cells.
    pub fn len(&self) -> usize {
        self.nlat * self.nlon
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.nlat == 0 || self.nlon == 0
    }

    /// Get the cell identifier for a (row, col) position.
    pub fn flat_index(&self, row: usize, col: usize) -> CellId {
        (row * self.nlon + col) as CellId
    }

    /// Invert [`GridShape::flat_index`]. Returns `None` when `id` is outside the grid.
    pub fn row_col(&self, id: CellId) -> Option<(usize, usize)> {
        if id < 0 || self.is_empty() {
            return None;
        }
        let id = id as usize;
        if id >= self.len() {
            return None;
        }
        Some((id / self.nlon, id % self.nlon))
    }

    /// Like [`GridShape::row_col`], failing with `InvalidSelection`.
    pub fn checked_row_col(&self, id: CellId) -> DashboardResult<(usize, usize)> {
        self.row_col(id).ok_or(DashboardError::InvalidSelection {
            id,
            cells: self.len(),
        })
    }
}

/// A cell of the grid with its identifier and center coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub id: CellId,
    pub lat: f64,
    pub lon: f64,
}

impl GridCell {
    /// Text attached to the plotted point; a click hands it back verbatim.
    pub fn hover_text(&self) -> String {
        self.id.to_string()
    }
}
