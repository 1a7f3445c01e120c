//! Enumerating grid cells inside a bounding box.

use climate_common::{BoundingBox, GridCell, GridShape};
use tracing::debug;

/// Every cell of the `lat x lon` grid in row-major order.
pub fn all_cells<'a>(lat: &'a [f64], lon: &'a [f64]) -> impl Iterator<Item = GridCell> + 'a {
    let shape = GridShape::new(lat.len(), lon.len());
    lat.iter().enumerate().flat_map(move |(row, &cell_lat)| {
        lon.iter().enumerate().map(move |(col, &cell_lon)| GridCell {
            id: shape.flat_index(row, col),
            lat: cell_lat,
            lon: cell_lon,
        })
    })
}

/// Cells whose center lies inside `bbox` (edges inclusive), in row-major order.
///
/// Identifiers refer to the full grid, not to the filtered list, so they
/// stay valid for [`resolve_time_series`](crate::resolve_time_series)
/// whatever box was used. Empty coordinate arrays give an empty result.
pub fn compute_visible_cells(lat: &[f64], lon: &[f64], bbox: &BoundingBox) -> Vec<GridCell> {
    let cells: Vec<GridCell> = all_cells(lat, lon)
        .filter(|cell| bbox.contains(cell.lat, cell.lon))
        .collect();

    debug!(
        nlat = lat.len(),
        nlon = lon.len(),
        visible = cells.len(),
        bbox = %bbox.to_bbox_string(),
        "Computed visible grid cells"
    );

    cells
}
