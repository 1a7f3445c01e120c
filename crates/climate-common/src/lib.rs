//! Common types and utilities shared across the climate dashboard crates.

pub mod bbox;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod time;

pub use bbox::BoundingBox;
pub use dataset::{DatasetSummary, GridVariable, GriddedDataset, TimeAxis};
pub use error::{DashboardError, DashboardResult};
pub use grid::{CellId, GridCell, GridShape};
pub use time::CfTimeUnits;
