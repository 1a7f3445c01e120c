//! The dashboard session: table, dataset and selection slots.

use climate_common::{CellId, DashboardError, DashboardResult, GriddedDataset};
use csv_loader::ClimateTable;
use tracing::{debug, info, warn};

use crate::click::parse_cell_id;

/// State of one dashboard session.
///
/// Each slot can be set and read on its own. The service mutates the session
/// only through the `on_*` transitions, which apply the cross-slot policy:
/// replacing the dataset clears the selection, because a cell identifier is
/// only meaningful against the grid it was taken from.
#[derive(Debug, Default)]
pub struct SessionState {
    table: Option<ClimateTable>,
    table_error: Option<DashboardError>,
    dataset: Option<GriddedDataset>,
    selected: Option<CellId>,
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Slots
    // ------------------------------------------------------------------

    pub fn table(&self) -> Option<&ClimateTable> {
        self.table.as_ref()
    }

    pub fn set_table(&mut self, table: Option<ClimateTable>) {
        self.table = table;
    }

    /// Why the table slot is empty, if loading failed.
    pub fn table_error(&self) -> Option<&DashboardError> {
        self.table_error.as_ref()
    }

    pub fn dataset(&self) -> Option<&GriddedDataset> {
        self.dataset.as_ref()
    }

    /// Replace the dataset slot without touching the selection.
    pub fn set_dataset(&mut self, dataset: Option<GriddedDataset>) {
        self.dataset = dataset;
    }

    pub fn selected(&self) -> Option<CellId> {
        self.selected
    }

    pub fn set_selected(&mut self, selected: Option<CellId>) {
        self.selected = selected;
    }

    /// Number of datasets accepted by [`SessionState::on_dataset_uploaded`].
    ///
    /// Zero until the first upload. Cell lists and selections carry this
    /// value so the front end can discard ones from an older grid.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Startup load finished.
    pub fn on_table_loaded(&mut self, result: DashboardResult<ClimateTable>) {
        match result {
            Ok(table) => {
                info!(
                    rows = table.len(),
                    columns = table.columns().len(),
                    dropped_rows = table.dropped_rows(),
                    "Climate table loaded"
                );
                self.table = Some(table);
                self.table_error = None;
            }
            Err(e) => {
                warn!(error = %e, kind = e.code(), "Climate table unavailable");
                self.table = None;
                self.table_error = Some(e);
            }
        }
    }

    /// An upload finished parsing.
    ///
    /// On success the dataset is replaced, the selection is cleared and the
    /// new generation is returned. On failure nothing changes.
    pub fn on_dataset_uploaded(
        &mut self,
        result: DashboardResult<GriddedDataset>,
    ) -> DashboardResult<u64> {
        match result {
            Ok(dataset) => {
                let shape = dataset.shape();
                self.dataset = Some(dataset);
                self.selected = None;
                self.generation += 1;
                info!(
                    generation = self.generation,
                    nlat = shape.nlat,
                    nlon = shape.nlon,
                    "Dataset replaced, selection cleared"
                );
                Ok(self.generation)
            }
            Err(e) => {
                warn!(error = %e, "Upload rejected, keeping previous dataset");
                Err(e)
            }
        }
    }

    /// A map point was clicked; `raw` is its hover text.
    ///
    /// Returns the new selection, or `None` if `raw` is not an integer, in
    /// which case the previous selection is kept.
    pub fn on_cell_clicked(&mut self, raw: &str) -> Option<CellId> {
        match parse_cell_id(raw) {
            Ok(id) => {
                debug!(id, "Grid cell selected");
                self.selected = Some(id);
                Some(id)
            }
            Err(e) => {
                warn!(payload = raw, error = %e, "Ignoring unparseable cell click");
                None
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> GriddedDataset {
        let axis: Vec<f64> = (0..n).map(|i| i as f64).collect();
        GriddedDataset::new(axis.clone(), axis)
    }

    #[test]
    fn test_new_session_is_empty() {
        let s = SessionState::new();
        assert!(s.table().is_none());
        assert!(s.dataset().is_none());
        assert!(s.selected().is_none());
        assert_eq!(s.generation(), 0);
    }

    #[test]
    fn test_failed_table_load_is_recorded() {
        let mut s = SessionState::new();
        s.on_table_loaded(Err(DashboardError::NotFound("nothing".into())));
        assert!(s.table().is_none());
        assert!(matches!(s.table_error(), Some(DashboardError::NotFound(_))));
    }

    #[test]
    fn test_click_then_bad_click_keeps_selection() {
        let mut s = SessionState::new();
        assert_eq!(s.on_cell_clicked("7"), Some(7));
        assert_eq!(s.on_cell_clicked("not-a-number"), None);
        assert_eq!(s.selected(), Some(7));
    }

    #[test]
    fn test_upload_resets_selection_and_bumps_generation() {
        let mut s = SessionState::new();
        s.on_dataset_uploaded(Ok(grid(3))).unwrap();
        s.on_cell_clicked("8");

        let generation = s.on_dataset_uploaded(Ok(grid(2))).unwrap();
        assert_eq!(generation, 2);
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn test_failed_upload_changes_nothing() {
        let mut s = SessionState::new();
        s.on_dataset_uploaded(Ok(grid(3))).unwrap();
        s.on_cell_clicked("4");

        let err = s
            .on_dataset_uploaded(Err(DashboardError::UploadError("bad".into())))
            .unwrap_err();
        assert_eq!(err.code(), "UploadError");
        assert_eq!(s.selected(), Some(4));
        assert_eq!(s.generation(), 1);
        assert_eq!(s.dataset().unwrap().shape().len(), 9);
    }

    #[test]
    fn test_plain_setters_do_not_apply_policy() {
        let mut s = SessionState::new();
        s.set_selected(Some(3));
        s.set_dataset(Some(grid(2)));
        assert_eq!(s.selected(), Some(3));
        assert_eq!(s.generation(), 0);
    }
}
