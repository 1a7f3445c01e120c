//! The cleaned climate table and its series queries.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A year-keyed table of numeric series.
///
/// Column-oriented: `values[c][r]` is series `columns[c]` at `years[r]`.
/// Cells that were empty or non-numeric in the file are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateTable {
    key_name: String,
    years: Vec<i32>,
    columns: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
    dropped_rows: usize,
    source: Option<PathBuf>,
}

impl ClimateTable {
    /// An empty table with the given key header and series columns.
    pub fn with_columns(key_name: impl Into<String>, columns: Vec<String>) -> Self {
        let values = vec![Vec::new(); columns.len()];
        Self {
            key_name: key_name.into(),
            years: Vec::new(),
            columns,
            values,
            dropped_rows: 0,
            source: None,
        }
    }

    /// Append a row. Missing trailing values are padded with `None`; extra
    /// values are ignored.
    pub fn push_row(&mut self, year: i32, row: Vec<Option<f64>>) {
        self.years.push(year);
        let mut row = row.into_iter();
        for column in &mut self.values {
            column.push(row.next().flatten());
        }
    }

    pub fn with_dropped_rows(mut self, dropped: usize) -> Self {
        self.dropped_rows = dropped;
        self
    }

    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }

    /// Header of the key column as it appeared in the file.
    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Series column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(&self.values[index])
    }

    /// Rows excluded because their key was not a year.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Smallest and largest year, or `None` for an empty table.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = *self.years.iter().min()?;
        let max = *self.years.iter().max()?;
        Some((min, max))
    }

    /// `(year, value, series)` triples matching `filter`.
    ///
    /// Series are emitted in the order they were requested, each in table row
    /// order. Unknown or repeated column names are ignored, as are missing
    /// values.
    pub fn series_points(&self, filter: &SeriesFilter) -> Vec<SeriesPoint> {
        let mut points = Vec::new();
        let mut seen: Vec<&str> = Vec::new();

        for name in &filter.columns {
            if seen.contains(&name.as_str()) {
                continue;
            }
            seen.push(name);

            let Some(column) = self.column(name) else {
                continue;
            };

            for (year, value) in self.years.iter().zip(column) {
                if !filter.contains_year(*year) {
                    continue;
                }
                if let Some(value) = value {
                    points.push(SeriesPoint {
                        year: *year,
                        value: *value,
                        series: name.clone(),
                    });
                }
            }
        }

        points
    }

    pub fn summary(&self) -> TableSummary {
        let range = self.year_range();
        TableSummary {
            key: self.key_name.clone(),
            year_min: range.map(|r| r.0),
            year_max: range.map(|r| r.1),
            columns: self.columns.clone(),
            rows: self.len(),
            dropped_rows: self.dropped_rows,
        }
    }
}

/// Year interval and series selection from the dashboard controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesFilter {
    /// First year shown (inclusive)
    pub start_year: i32,
    /// Last year shown (inclusive)
    pub end_year: i32,
    /// Selected series names
    pub columns: Vec<String>,
}

impl SeriesFilter {
    pub fn new(start_year: i32, end_year: i32, columns: Vec<String>) -> Self {
        Self {
            start_year,
            end_year,
            columns,
        }
    }

    /// Everything in `table`: full year range, all columns.
    pub fn all(table: &ClimateTable) -> Self {
        let (start, end) = table.year_range().unwrap_or((0, -1));
        Self::new(start, end, table.columns().to_vec())
    }

    pub fn contains_year(&self, year: i32) -> bool {
        year >= self.start_year && year <= self.end_year
    }
}

/// One plotted point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
    pub series: String,
}

/// Control initialization data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub key: String,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub columns: Vec<String>,
    pub rows: usize,
    pub dropped_rows: usize,
}
