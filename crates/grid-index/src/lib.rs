//! Grid cell lookup for the climate map.
//!
//! Cells are identified by their position in the row-major flattening of
//! the full `lat x lon` grid. [`index`] enumerates the cells visible inside a
//! bounding box; [`resolve`] turns an identifier back into coordinates and a
//! time series. Both use [`GridShape`](climate_common::GridShape) for the
//! index arithmetic so the two directions cannot drift apart.

pub mod index;
pub mod resolve;

pub use index::{all_cells, compute_visible_cells};
pub use resolve::{cell_at, cell_coordinates, resolve_time_series, slice_cell, TimeSeries};
