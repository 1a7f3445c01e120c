//! Session state and pull-based views for the climate dashboard.
//!
//! The session holds three slots (table, gridded dataset, selected cell) and
//! changes only through the named transitions on [`SessionState`]. Views are
//! recomputed from the current state on every request.

pub mod click;
pub mod session;
pub mod views;

pub use click::parse_cell_id;
pub use session::SessionState;
pub use views::{
    dataset_summary, selection_view, series_points, table_summary, visible_cells, CellsView,
    SelectionView,
};
