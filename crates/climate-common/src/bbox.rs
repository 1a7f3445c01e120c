//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
///
/// Containment is inclusive on every edge: a point lying exactly on
/// `min_lat`, `max_lat`, `min_lon` or `max_lon` is inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Default for BoundingBox {
    /// The Santa Barbara coastal region shown on the map when nothing else
    /// is configured.
    fn default() -> Self {
        Self::new(-120.5, 34.0, -119.0, 35.0)
    }
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Create a bounding box from latitude and longitude ranges.
    pub fn from_ranges(lat: (f64, f64), lon: (f64, f64)) -> Self {
        Self::new(lon.0, lat.0, lon.1, lat.1)
    }

    /// Parse a bounding box string: "minlon,minlat,maxlon,maxlat"
    pub fn from_bbox_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let parse = |part: &str| {
            part.parse::<f64>()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))
        };

        let bbox = Self {
            min_lon: parse(parts[0])?,
            min_lat: parse(parts[1])?,
            max_lon: parse(parts[2])?,
            max_lat: parse(parts[3])?,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// The smallest box covering every coordinate pair of a grid.
    ///
    /// Returns `None` when either axis is empty or holds no finite value.
    pub fn covering(lat: &[f64], lon: &[f64]) -> Option<Self> {
        let (min_lat, max_lat) = finite_extent(lat)?;
        let (min_lon, max_lon) = finite_extent(lon)?;
        Some(Self::new(min_lon, min_lat, max_lon, max_lat))
    }

    /// Check that min <= max on both axes and that all edges are finite.
    pub fn validate(&self) -> Result<(), BboxParseError> {
        let edges = [self.min_lon, self.min_lat, self.max_lon, self.max_lat];
        if edges.iter().any(|v| !v.is_finite()) {
            return Err(BboxParseError::NonFinite);
        }
        if self.min_lon > self.max_lon || self.min_lat > self.max_lat {
            return Err(BboxParseError::Inverted(self.to_bbox_string()));
        }
        Ok(())
    }

    /// Check if a (lat, lon) point is contained within this bbox.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Format as "minlon,minlat,maxlon,maxlat".
    pub fn to_bbox_string(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

fn finite_extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid BBOX format: {0}. Expected 'minlon,minlat,maxlon,maxlat'")]
    InvalidFormat(String),

    #[error("Invalid number in BBOX: {0}")]
    InvalidNumber(String),

    #[error("BBOX edges must be finite")]
    NonFinite,

    #[error("BBOX minimum exceeds maximum: {0}")]
    Inverted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox_string() {
        let bbox = BoundingBox::from_bbox_string("-120.0,34.3,-119.4,34.6").unwrap();
        assert_eq!(bbox.min_lon, -120.0);
        assert_eq!(bbox.min_lat, 34.3);
        assert_eq!(bbox.max_lon, -119.4);
        assert_eq!(bbox.max_lat, 34.6);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = BoundingBox::from_ranges((34.3, 34.6), (-120.0, -119.4));
        assert!(bbox.contains(34.6, -119.4));
        assert!(bbox.contains(34.3, -120.0));
        assert!(!bbox.contains(34.2, -119.7));
        assert!(!bbox.contains(34.4, -119.3));
    }

    #[test]
    fn test_covering_skips_nan() {
        let bbox = BoundingBox::covering(&[34.6, f64::NAN, 34.2], &[-119.3, -120.1]).unwrap();
        assert_eq!(bbox, BoundingBox::new(-120.1, 34.2, -119.3, 34.6));
        assert!(BoundingBox::covering(&[], &[1.0]).is_none());
    }
}
