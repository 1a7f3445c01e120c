//! Loader for the climate time-series CSV.
//!
//! The CSV is found by name anywhere under a root directory, parsed with a
//! fixed-length preamble skipped (falling back to no skip), and cleaned into
//! a [`ClimateTable`] keyed by integer year.
//!
//! ```ignore
//! use csv_loader::{load, LoaderConfig};
//!
//! let table = load(&LoaderConfig::from_env())?;
//! println!("{} rows, columns {:?}", table.len(), table.columns());
//! ```

pub mod config;
pub mod discover;
pub mod parse;
pub mod table;

use std::path::Path;

use climate_common::{DashboardError, DashboardResult};
use tracing::info;

pub use config::{LoaderConfig, DEFAULT_CANDIDATES, DEFAULT_PREAMBLE_LINES};
pub use discover::discover;
pub use parse::{coerce_year, parse_str};
pub use table::{ClimateTable, SeriesFilter, SeriesPoint, TableSummary};

/// Find, read and parse the climate CSV described by `config`.
pub fn load(config: &LoaderConfig) -> DashboardResult<ClimateTable> {
    let path = discover(&config.root, &config.candidates)?;
    load_file(&path, config)
}

/// Read and parse a specific CSV file with the preamble rules of `config`.
pub fn load_file(path: &Path, config: &LoaderConfig) -> DashboardResult<ClimateTable> {
    let bytes = std::fs::read(path).map_err(|e| {
        DashboardError::ParseError(format!("failed to read {}: {}", path.display(), e))
    })?;
    let text = String::from_utf8_lossy(&bytes);

    let table = parse_str(&text, config.preamble_lines, config.delimiter_byte())?
        .with_source(path.to_path_buf());

    info!(
        path = %path.display(),
        rows = table.len(),
        columns = ?table.columns(),
        dropped_rows = table.dropped_rows(),
        "Loaded climate table"
    );

    Ok(table)
}
