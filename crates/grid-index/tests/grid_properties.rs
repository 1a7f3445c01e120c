//! Properties tying the visible-cell index to the resolver.

use std::collections::HashSet;

use climate_common::{BoundingBox, DashboardError, GridShape};
use grid_index::{all_cells, cell_coordinates, compute_visible_cells, resolve_time_series};
use test_utils::{
    coordinates_only_dataset, create_test_dataset, cube_value, fixtures::grid, linspace,
    santa_barbara_dataset,
};

fn sb_box() -> BoundingBox {
    let (min_lat, max_lat, min_lon, max_lon) = grid::SB_BOX;
    BoundingBox::from_ranges((min_lat, max_lat), (min_lon, max_lon))
}

// ============================================================================
// Bounding box filtering
// ============================================================================

#[test]
fn test_santa_barbara_box_keeps_inclusive_edge() {
    let cells = compute_visible_cells(&grid::SB_LAT, &grid::SB_LON, &sb_box());
    let ids: Vec<_> = cells.iter().map(|c| c.id).collect();

    // row 1 (34.4) and row 2 (34.6, on the edge) at col 1 (-119.7)
    assert_eq!(ids, vec![4, 7]);
    assert_eq!((cells[0].lat, cells[0].lon), (34.4, -119.7));
    assert_eq!((cells[1].lat, cells[1].lon), (34.6, -119.7));
}

#[test]
fn test_longitude_edge_is_inclusive() {
    let (min_lat, max_lat, min_lon, _) = grid::SB_BOX;
    let bbox = BoundingBox::from_ranges((min_lat, max_lat), (min_lon, -119.3));
    let ids: Vec<_> = compute_visible_cells(&grid::SB_LAT, &grid::SB_LON, &bbox)
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![4, 5, 7, 8]);
}

#[test]
fn test_box_outside_grid_is_empty() {
    let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
    assert!(compute_visible_cells(&grid::SB_LAT, &grid::SB_LON, &bbox).is_empty());
}

// ============================================================================
// Round-trip between index and resolver
// ============================================================================

#[test]
fn test_every_visible_id_round_trips() {
    let lat = linspace(30.0, 0.25, 17);
    let lon = linspace(-125.0, 0.25, 23);
    let bbox = BoundingBox::from_ranges((31.0, 33.0), (-124.0, -121.0));
    let shape = GridShape::new(lat.len(), lon.len());

    let cells = compute_visible_cells(&lat, &lon, &bbox);
    assert!(cells.len() <= shape.len());

    let ids: HashSet<_> = cells.iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), cells.len(), "identifiers must be unique");

    for cell in &cells {
        let (row, col) = shape.row_col(cell.id).unwrap();
        assert_eq!(row as i64, cell.id / lon.len() as i64);
        assert_eq!(col as i64, cell.id % lon.len() as i64);
        assert_eq!(cell_coordinates(cell.id, &lat, &lon).unwrap(), (cell.lat, cell.lon));
    }
}

#[test]
fn test_resolver_agrees_with_coordinate_lookup() {
    let ds = santa_barbara_dataset(5);
    for cell in all_cells(ds.lat(), ds.lon()) {
        let series = resolve_time_series(cell.id, &ds, "tasmin").unwrap();
        let coords = cell_coordinates(cell.id, ds.lat(), ds.lon()).unwrap();
        assert_eq!((series.cell.lat, series.cell.lon), coords);
    }
}

#[test]
fn test_resolved_values_come_from_the_right_cell() {
    let lat = linspace(0.0, 1.0, 4);
    let lon = linspace(0.0, 1.0, 7);
    let ds = create_test_dataset(&lat, &lon, 6, "tasmin");

    // row 2, col 5
    let series = resolve_time_series(2 * 7 + 5, &ds, "tasmin").unwrap();
    let expected: Vec<f32> = (0..6).map(|t| cube_value(t, 2, 5)).collect();
    assert_eq!(series.values, expected);
    assert_eq!(series.times.len(), 6);
    assert!(series.timestamps.is_some());
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_id_equal_to_cell_count_is_invalid() {
    let ds = santa_barbara_dataset(2);
    let result = resolve_time_series(9, &ds, "tasmin");
    assert!(matches!(result, Err(DashboardError::InvalidSelection { id: 9, cells: 9 })));
}

#[test]
fn test_negative_id_is_invalid() {
    let ds = santa_barbara_dataset(2);
    assert!(matches!(
        resolve_time_series(-1, &ds, "tasmin"),
        Err(DashboardError::InvalidSelection { id: -1, .. })
    ));
    assert!(matches!(
        cell_coordinates(-1, ds.lat(), ds.lon()),
        Err(DashboardError::InvalidSelection { .. })
    ));
}

#[test]
fn test_coordinates_work_without_variable() {
    let ds = coordinates_only_dataset(&grid::SB_LAT, &grid::SB_LON);
    assert_eq!(cell_coordinates(5, ds.lat(), ds.lon()).unwrap(), (34.4, -119.3));
    assert!(matches!(
        resolve_time_series(5, &ds, "tasmin"),
        Err(DashboardError::MissingVariable(_))
    ));
}
