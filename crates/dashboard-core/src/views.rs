//! Pull-based queries over the session, recomputed per request.

use climate_common::{
    BoundingBox, CellId, DashboardError, DatasetSummary, GridCell, GriddedDataset,
};
use csv_loader::{ClimateTable, SeriesFilter, SeriesPoint, TableSummary};
use grid_index::{cell_coordinates, compute_visible_cells, resolve_time_series, TimeSeries};
use serde::Serialize;
use tracing::debug;

use crate::session::SessionState;

const NO_DATASET: &str = "Upload a NetCDF file to explore grid boxes.";
const NO_SELECTION: &str = "Click a grid box on the map to see its time series.";

/// What the time-series panel shows for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionView {
    /// Dataset generation the view was computed against
    pub generation: u64,
    pub selected: Option<CellId>,
    /// Info line shown above the chart
    pub info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<TimeSeries>,
    /// Shown in place of the chart when there is no series
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl SelectionView {
    fn empty(generation: u64, selected: Option<CellId>, info: String, placeholder: String) -> Self {
        Self {
            generation,
            selected,
            info,
            series: None,
            placeholder: Some(placeholder),
        }
    }
}

/// The cells to plot on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellsView {
    pub generation: u64,
    pub bbox: BoundingBox,
    pub cells: Vec<GridCell>,
}

/// `(year, value, series)` triples of `table` matching `filter`.
pub fn series_points(table: &ClimateTable, filter: &SeriesFilter) -> Vec<SeriesPoint> {
    table.series_points(filter)
}

/// Info line and time series for the selected cell.
///
/// Never fails: a missing dataset, a missing selection, a stale identifier or
/// a missing variable each produce a placeholder instead of a series.
pub fn selection_view(session: &SessionState, variable: &str) -> SelectionView {
    let generation = session.generation();
    let selected = session.selected();

    let Some(dataset) = session.dataset() else {
        return SelectionView::empty(
            generation,
            selected,
            "No dataset loaded.".to_string(),
            NO_DATASET.to_string(),
        );
    };

    let Some(id) = selected else {
        return SelectionView::empty(
            generation,
            None,
            "No grid box selected.".to_string(),
            NO_SELECTION.to_string(),
        );
    };

    let (lat, lon) = match cell_coordinates(id, dataset.lat(), dataset.lon()) {
        Ok(coords) => coords,
        Err(e) => return placeholder_for(generation, id, e.to_string(), e),
    };
    let info = format!("Grid box {} at lat {:.4}, lon {:.4}", id, lat, lon);

    match resolve_time_series(id, dataset, variable) {
        Ok(series) => SelectionView {
            generation,
            selected: Some(id),
            info,
            series: Some(series),
            placeholder: None,
        },
        Err(e) => placeholder_for(generation, id, info, e),
    }
}

fn placeholder_for(generation: u64, id: CellId, info: String, err: DashboardError) -> SelectionView {
    debug!(id, kind = err.code(), error = %err, "No series for selection");
    SelectionView::empty(generation, Some(id), info, err.placeholder())
}

/// Cells of the current dataset inside `bbox`, or `None` with no dataset.
pub fn visible_cells(session: &SessionState, bbox: &BoundingBox) -> Option<CellsView> {
    let dataset = session.dataset()?;
    Some(CellsView {
        generation: session.generation(),
        bbox: *bbox,
        cells: compute_visible_cells(dataset.lat(), dataset.lon(), bbox),
    })
}

pub fn table_summary(table: &ClimateTable) -> TableSummary {
    table.summary()
}

pub fn dataset_summary(dataset: &GriddedDataset) -> DatasetSummary {
    dataset.summary()
}
