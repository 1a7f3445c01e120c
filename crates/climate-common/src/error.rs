//! Error types for the climate dashboard.

use thiserror::Error;

/// Result type alias using DashboardError.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Every failure the dashboard surfaces to a user.
///
/// None of these terminate a session: each is recovered where it occurs and
/// turned into a placeholder message or a log line.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DashboardError {
    /// No CSV file with a recognized name exists under the search root.
    #[error("No climate CSV found: {0}")]
    NotFound(String),

    /// The CSV could not be parsed with or without the preamble skip.
    #[error("Failed to parse climate CSV: {0}")]
    ParseError(String),

    /// The uploaded file could not be opened as a gridded dataset.
    #[error("Failed to read uploaded dataset: {0}")]
    UploadError(String),

    /// A cell identifier outside `[0, cells)`.
    #[error("Grid cell {id} is out of range (grid has {cells} cells)")]
    InvalidSelection { id: i64, cells: usize },

    /// The dataset is valid but lacks the requested variable.
    #[error("Variable '{0}' not present in dataset")]
    MissingVariable(String),
}

impl DashboardError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::NotFound(_) => "NotFound",
            DashboardError::ParseError(_) => "ParseError",
            DashboardError::UploadError(_) => "UploadError",
            DashboardError::InvalidSelection { .. } => "InvalidSelection",
            DashboardError::MissingVariable(_) => "MissingVariable",
        }
    }

    /// Short message shown in place of a chart or map.
    pub fn placeholder(&self) -> String {
        match self {
            DashboardError::NotFound(_) => "No climate data file was found.".to_string(),
            DashboardError::ParseError(_) => "The climate data file could not be read.".to_string(),
            DashboardError::UploadError(_) => {
                "The uploaded file is not a readable NetCDF dataset.".to_string()
            }
            DashboardError::InvalidSelection { .. } => {
                "The selected grid box is not part of the current dataset.".to_string()
            }
            DashboardError::MissingVariable(name) => {
                format!("The dataset has no '{}' variable to plot.", name)
            }
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            DashboardError::InvalidSelection { .. } => 400,
            DashboardError::NotFound(_) | DashboardError::MissingVariable(_) => 404,
            DashboardError::ParseError(_) | DashboardError::UploadError(_) => 422,
        }
    }
}
