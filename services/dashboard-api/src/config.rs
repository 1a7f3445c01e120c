//! Dashboard service configuration.
//!
//! Layered: built-in defaults, then an optional YAML file, then environment
//! variables, then command-line flags (applied by `main`).

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use climate_common::BoundingBox;
use csv_loader::LoaderConfig;
use serde::{Deserialize, Serialize};

/// Variable plotted for a selected grid box when nothing else is configured.
pub const DEFAULT_VARIABLE: &str = "tasmin";

/// Upload size cap in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 256;

/// Service configuration.
///
/// ```yaml
/// csv:
///   root: /data/downloads
///   candidates: [climate_timeseries.csv]
///   preamble_lines: 8
/// grid:
///   variable: tasmax
///   bbox: { min_lon: -120.5, min_lat: 34.0, max_lon: -119.0, max_lat: 35.0 }
/// max_upload_mb: 128
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Where and how to load the climate CSV.
    pub csv: LoaderConfig,

    /// Map and grid box settings.
    pub grid: GridConfig,

    /// Largest accepted upload body, in megabytes.
    pub max_upload_mb: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            csv: LoaderConfig::default(),
            grid: GridConfig::default(),
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

/// Map settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Region whose grid cells are drawn on the map.
    pub bbox: BoundingBox,

    /// Data variable resolved for a clicked cell.
    pub variable: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            bbox: BoundingBox::default(),
            variable: DEFAULT_VARIABLE.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Defaults, overlaid with `path` if given, overlaid with the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Parse a YAML config file. Missing keys take their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Override fields from environment variables.
    ///
    /// Unparseable numbers are ignored; an unparseable `CLIMATE_GRID_BBOX`
    /// is an error.
    pub fn apply_env(&mut self) -> Result<()> {
        self.csv.apply_env();

        if let Ok(val) = std::env::var("CLIMATE_GRID_BBOX") {
            self.grid.bbox = BoundingBox::from_bbox_string(&val)
                .map_err(|e| anyhow!("CLIMATE_GRID_BBOX: {}", e))?;
        }

        if let Ok(val) = std::env::var("CLIMATE_GRID_VARIABLE") {
            let val = val.trim();
            if !val.is_empty() {
                self.grid.variable = val.to_string();
            }
        }

        if let Ok(val) = std::env::var("DASHBOARD_MAX_UPLOAD_MB") {
            if let Ok(mb) = val.trim().parse() {
                self.max_upload_mb = mb;
            }
        }

        Ok(())
    }

    /// Apply a `--data-root` flag.
    pub fn with_data_root(mut self, root: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.csv.root = root;
        }
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.csv.validate()?;

        self.grid
            .bbox
            .validate()
            .map_err(|e| format!("invalid grid bbox: {}", e))?;

        if self.grid.variable.trim().is_empty() {
            return Err("grid variable name must not be empty".to_string());
        }

        if self.max_upload_mb == 0 {
            return Err("max_upload_mb must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Upload cap in bytes, saturating at `usize::MAX`.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.variable, "tasmin");
        assert_eq!(config.grid.bbox, BoundingBox::new(-120.5, 34.0, -119.0, 35.0));
        assert_eq!(config.csv.preamble_lines, 8);
    }

    #[test]
    fn test_config_yaml_parsing() {
        let yaml = r#"
csv:
  root: /data/downloads
  candidates: [tmax.csv, data.csv]
  delimiter: ";"
grid:
  variable: tasmax
  bbox:
    min_lon: -121.0
    min_lat: 33.5
    max_lon: -118.5
    max_lat: 35.5
max_upload_mb: 64
"#;

        let config = DashboardConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.csv.root, PathBuf::from("/data/downloads"));
        assert_eq!(config.csv.candidates, vec!["tmax.csv", "data.csv"]);
        assert_eq!(config.csv.delimiter, ';');
        assert_eq!(config.csv.preamble_lines, 8, "unset keys keep defaults");
        assert_eq!(config.grid.variable, "tasmax");
        assert_eq!(config.grid.bbox.min_lat, 33.5);
        assert_eq!(config.max_upload_bytes(), 64 * 1024 * 1024);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = DashboardConfig::from_yaml_str("max_upload_mb: 10\n").unwrap();
        assert_eq!(config.grid, GridConfig::default());
        assert_eq!(config.csv, LoaderConfig::default());
    }

    #[test]
    fn test_validate_rejects_inverted_bbox() {
        let mut config = DashboardConfig::default();
        config.grid.bbox = BoundingBox::new(-119.0, 34.0, -120.5, 35.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_upload_cap() {
        let config = DashboardConfig {
            max_upload_mb: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_upload_cap_saturates() {
        let config = DashboardConfig {
            max_upload_mb: usize::MAX / 2,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.max_upload_bytes(), usize::MAX);
    }

    #[test]
    fn test_data_root_flag_overrides() {
        let config = DashboardConfig::default().with_data_root(Some(PathBuf::from("/srv/climate")));
        assert_eq!(config.csv.root, PathBuf::from("/srv/climate"));
    }

    // The only test in this crate that touches the process environment.
    #[test]
    fn test_env_overrides() {
        std::env::set_var("CLIMATE_GRID_VARIABLE", "pr");
        std::env::set_var("CLIMATE_GRID_BBOX", "-121, 33, -118, 36");
        std::env::set_var("DASHBOARD_MAX_UPLOAD_MB", "not a number");

        let config = DashboardConfig::load(None).unwrap();
        assert_eq!(config.grid.variable, "pr");
        assert_eq!(config.grid.bbox, BoundingBox::new(-121.0, 33.0, -118.0, 36.0));
        assert_eq!(config.max_upload_mb, DEFAULT_MAX_UPLOAD_MB);

        std::env::set_var("CLIMATE_GRID_BBOX", "-121,33");
        assert!(DashboardConfig::load(None).is_err());

        std::env::remove_var("CLIMATE_GRID_VARIABLE");
        std::env::remove_var("CLIMATE_GRID_BBOX");
        std::env::remove_var("DASHBOARD_MAX_UPLOAD_MB");
    }
}
