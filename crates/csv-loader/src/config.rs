//! Configuration for locating and parsing the climate CSV.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// File names recognized as the climate time-series CSV, in priority order.
pub const DEFAULT_CANDIDATES: &[&str] = &["climate_timeseries.csv", "climate_data.csv", "data.csv"];

/// Metadata lines preceding the header in files exported by the data portal.
pub const DEFAULT_PREAMBLE_LINES: usize = 8;

/// Configuration for the CSV loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory searched recursively for a candidate file.
    pub root: PathBuf,

    /// Exact file names that identify the CSV.
    pub candidates: Vec<String>,

    /// Lines skipped before the header on the first parse attempt.
    pub preamble_lines: usize,

    /// Field delimiter (single ASCII character).
    pub delimiter: char,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            candidates: DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            preamble_lines: DEFAULT_PREAMBLE_LINES,
            delimiter: ',',
        }
    }
}

impl LoaderConfig {
    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `CLIMATE_DATA_ROOT`, `CLIMATE_CSV_CANDIDATES`,
    /// `CLIMATE_CSV_PREAMBLE_LINES` and `CLIMATE_CSV_DELIMITER`.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("CLIMATE_DATA_ROOT") {
            self.root = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("CLIMATE_CSV_CANDIDATES") {
            let names = parse_candidates(&val);
            if !names.is_empty() {
                self.candidates = names;
            }
        }

        if let Ok(val) = std::env::var("CLIMATE_CSV_PREAMBLE_LINES") {
            if let Ok(lines) = val.trim().parse() {
                self.preamble_lines = lines;
            }
        }

        if let Ok(val) = std::env::var("CLIMATE_CSV_DELIMITER") {
            let val = if val == "\\t" { "\t".to_string() } else { val };
            if let Some(c) = val.chars().next() {
                self.delimiter = c;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.candidates.is_empty() {
            return Err("at least one CSV candidate name is required".to_string());
        }

        if let Some(bad) = self
            .candidates
            .iter()
            .find(|c| c.trim().is_empty() || c.contains('/') || c.contains('\\'))
        {
            return Err(format!("invalid CSV candidate name: '{}'", bad));
        }

        if !self.delimiter.is_ascii() {
            return Err(format!("delimiter must be ASCII, got '{}'", self.delimiter));
        }

        Ok(())
    }

    /// The delimiter as the byte the csv reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}

/// Split a comma-separated list of file names.
pub fn parse_candidates(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.preamble_lines, 8);
        assert_eq!(config.candidates.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_candidates() {
        assert_eq!(
            parse_candidates(" a.csv, ,b.csv "),
            vec!["a.csv".to_string(), "b.csv".to_string()]
        );
    }

    #[test]
    fn test_validate_rejects_paths() {
        let config = LoaderConfig {
            candidates: vec!["sub/data.csv".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_ascii_delimiter() {
        let config = LoaderConfig {
            delimiter: '§',
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.delimiter_byte(), b',');
    }
}
