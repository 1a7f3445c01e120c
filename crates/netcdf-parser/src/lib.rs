//! NetCDF reader for gridded climate projections.
//!
//! Reads files laid out the way downscaled climate products (LOCA, MACA and
//! similar) ship them: 1-D `lat` and `lon` coordinate variables, an optional
//! CF `time` axis and data variables with dimensions `(time, lat, lon)`.
//!
//! The netcdf library needs a file path, so uploads held in memory are staged
//! in a temp file first (see [`load_gridded_from_bytes`]).

pub mod error;
pub mod native;

pub use error::{NetCdfError, NetCdfResult};
pub use native::{load_gridded_from_bytes, open_gridded, silence_hdf5_errors};
