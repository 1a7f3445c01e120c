//! Resolving a selected cell identifier to coordinates and a time series.

use chrono::{DateTime, Utc};
use climate_common::{
    CellId, DashboardError, DashboardResult, GridCell, GridShape, GridVariable, GriddedDataset,
};
use serde::Serialize;
use tracing::debug;

/// Time series of one variable at one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    /// The cell the series was taken from
    pub cell: GridCell,
    /// Variable name
    pub variable: String,
    /// Variable units, if the file declared them
    pub units: Option<String>,
    /// Raw time coordinate values (or step indices when the dataset has no time axis)
    pub times: Vec<f64>,
    /// Units of `times`
    pub time_units: Option<String>,
    /// `times` decoded to UTC when the units and calendar allow it
    pub timestamps: Option<Vec<DateTime<Utc>>>,
    /// One value per time step; fill values are NaN
    pub values: Vec<f32>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Coordinates `(lat, lon)` of cell `id`.
///
/// Uses the same row-major inversion as [`resolve_time_series`] and does not
/// need any data variable.
pub fn cell_coordinates(id: CellId, lat: &[f64], lon: &[f64]) -> DashboardResult<(f64, f64)> {
    let cell = cell_at(id, lat, lon)?;
    Ok((cell.lat, cell.lon))
}

/// The [`GridCell`] for identifier `id`.
pub fn cell_at(id: CellId, lat: &[f64], lon: &[f64]) -> DashboardResult<GridCell> {
    let shape = GridShape::new(lat.len(), lon.len());
    let (row, col) = shape.checked_row_col(id)?;
    Ok(GridCell {
        id,
        lat: lat[row],
        lon: lon[col],
    })
}

/// Extract `variable[:, row, col]`.
///
/// `variable.data` must have the `(ntime, shape.nlat, shape.nlon)` layout that
/// [`GriddedDataset::with_variable`] enforces.
pub fn slice_cell(variable: &GridVariable, shape: GridShape, row: usize, col: usize) -> Vec<f32> {
    let cells = shape.len();
    let offset = row * shape.nlon + col;
    (0..variable.ntime)
        .map(|t| variable.data[t * cells + offset])
        .collect()
}

/// Time series of `variable` at cell `id` of `dataset`.
///
/// # Errors
///
/// - `InvalidSelection` if `id` is outside `[0, nlat * nlon)`
/// - `MissingVariable` if the dataset has no variable named `variable`
pub fn resolve_time_series(
    id: CellId,
    dataset: &GriddedDataset,
    variable: &str,
) -> DashboardResult<TimeSeries> {
    let shape = dataset.shape();
    let (row, col) = shape.checked_row_col(id)?;

    let var = dataset
        .variable(variable)
        .ok_or_else(|| DashboardError::MissingVariable(variable.to_string()))?;

    let values = slice_cell(var, shape, row, col);

    let (times, time_units, timestamps) = match dataset.time() {
        Some(axis) => (axis.values.clone(), axis.units.clone(), axis.decode()),
        None => ((0..var.ntime).map(|t| t as f64).collect(), None, None),
    };

    assert_eq!(
        times.len(),
        values.len(),
        "time axis and variable '{}' disagree on length",
        variable
    );

    debug!(
        id,
        row,
        col,
        variable,
        steps = values.len(),
        "Resolved grid cell time series"
    );

    Ok(TimeSeries {
        cell: GridCell {
            id,
            lat: dataset.lat()[row],
            lon: dataset.lon()[col],
        },
        variable: variable.to_string(),
        units: var.units.clone(),
        times,
        time_units,
        timestamps,
        values,
    })
}
