//! In-memory model of an uploaded gridded dataset.
//!
//! A dataset holds 1-D `lat` and `lon` coordinates, an optional time axis,
//! and any number of `(time, lat, lon)` variables stored flat in row-major
//! order. Shapes are checked once at construction so that slicing later can
//! index without further validation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::bbox::BoundingBox;
use crate::error::{DashboardError, DashboardResult};
use crate::grid::GridShape;
use crate::time::CfTimeUnits;

/// Time coordinate of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    /// Raw numeric offsets as stored in the file
    pub values: Vec<f64>,
    /// CF `units` attribute, e.g. "days since 1950-01-01"
    pub units: Option<String>,
    /// CF `calendar` attribute
    pub calendar: Option<String>,
}

impl TimeAxis {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            units: None,
            calendar: None,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn with_calendar(mut self, calendar: impl Into<String>) -> Self {
        self.calendar = Some(calendar.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Decode every value to a UTC timestamp.
    ///
    /// Returns `None` if the units are missing or unsupported, the calendar
    /// is not Gregorian, or any single value fails to decode.
    pub fn decode(&self) -> Option<Vec<DateTime<Utc>>> {
        if !CfTimeUnits::supports_calendar(self.calendar.as_deref()) {
            return None;
        }
        let units = CfTimeUnits::parse(self.units.as_deref()?)?;
        self.values.iter().map(|&v| units.decode(v)).collect()
    }
}

/// A 3-D variable indexed `(time, lat, lon)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridVariable {
    pub name: String,
    pub units: Option<String>,
    /// Number of time steps (first dimension)
    pub ntime: usize,
    /// Row-major data of length `ntime * nlat * nlon`
    pub data: Vec<f32>,
}

impl GridVariable {
    pub fn new(name: impl Into<String>, ntime: usize, data: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            units: None,
            ntime,
            data,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }
}

/// A gridded dataset with lat/lon coordinates and `(time, lat, lon)` variables.
#[derive(Debug, Clone, PartialEq)]
pub struct GriddedDataset {
    /// Where the dataset came from (original upload name or path)
    pub source: Option<String>,
    lat: Vec<f64>,
    lon: Vec<f64>,
    time: Option<TimeAxis>,
    variables: BTreeMap<String, GridVariable>,
}

impl GriddedDataset {
    /// Create a dataset from its coordinate arrays.
    pub fn new(lat: Vec<f64>, lon: Vec<f64>) -> Self {
        Self {
            source: None,
            lat,
            lon,
            time: None,
            variables: BTreeMap::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the time axis.
    ///
    /// Fails if a variable is already attached whose time dimension differs.
    pub fn with_time(mut self, time: TimeAxis) -> DashboardResult<Self> {
        if let Some(var) = self.variables.values().find(|v| v.ntime != time.len()) {
            return Err(DashboardError::UploadError(format!(
                "time axis has {} steps but variable '{}' has {}",
                time.len(),
                var.name,
                var.ntime
            )));
        }
        self.time = Some(time);
        Ok(self)
    }

    /// Attach a `(time, lat, lon)` variable, checking its shape.
    pub fn with_variable(mut self, variable: GridVariable) -> DashboardResult<Self> {
        let expected = variable.ntime * self.shape().len();
        if variable.data.len() != expected {
            return Err(DashboardError::UploadError(format!(
                "variable '{}' has {} values, expected {} ({} x {} x {})",
                variable.name,
                variable.data.len(),
                expected,
                variable.ntime,
                self.lat.len(),
                self.lon.len()
            )));
        }
        if let Some(time) = &self.time {
            if time.len() != variable.ntime {
                return Err(DashboardError::UploadError(format!(
                    "variable '{}' has {} time steps but time axis has {}",
                    variable.name,
                    variable.ntime,
                    time.len()
                )));
            }
        }
        self.variables.insert(variable.name.clone(), variable);
        Ok(self)
    }

    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    pub fn time(&self) -> Option<&TimeAxis> {
        self.time.as_ref()
    }

    pub fn shape(&self) -> GridShape {
        GridShape::new(self.lat.len(), self.lon.len())
    }

    pub fn variable(&self, name: &str) -> Option<&GridVariable> {
        self.variables.get(name)
    }

    pub fn variable_names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }

    /// Number of time steps, from the time axis or else the first variable.
    pub fn ntime(&self) -> usize {
        self.time
            .as_ref()
            .map(TimeAxis::len)
            .or_else(|| self.variables.values().next().map(|v| v.ntime))
            .unwrap_or(0)
    }

    pub fn summary(&self) -> DatasetSummary {
        let shape = self.shape();
        DatasetSummary {
            source: self.source.clone(),
            nlat: shape.nlat,
            nlon: shape.nlon,
            ntime: self.ntime(),
            variables: self.variable_names(),
            time_units: self.time.as_ref().and_then(|t| t.units.clone()),
            extent: BoundingBox::covering(&self.lat, &self.lon),
        }
    }
}

/// Overview of a dataset for the front end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub source: Option<String>,
    pub nlat: usize,
    pub nlon: usize,
    pub ntime: usize,
    pub variables: Vec<String>,
    pub time_units: Option<String>,
    pub extent: Option<BoundingBox>,
}
