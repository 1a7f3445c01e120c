//! Synthetic gridded datasets with verifiable values.

use climate_common::{GridVariable, GriddedDataset, TimeAxis};

use crate::fixtures;

/// The value stored at `(t, row, col)` by [`create_cube`].
pub fn cube_value(t: usize, row: usize, col: usize) -> f32 {
    (t * 10_000 + row * 100 + col) as f32
}

/// Creates a `(time, lat, lon)` cube in row-major order.
///
/// Each value is `t * 10000 + row * 100 + col`, so a slice taken at the
/// wrong cell or in the wrong order is easy to spot.
///
/// # Example
///
/// ```
/// use test_utils::create_cube;
///
/// let cube = create_cube(2, 3, 4);
/// assert_eq!(cube.len(), 24);
/// assert_eq!(cube[5], 101.0);    // t=0, row=1, col=1
/// assert_eq!(cube[12], 10000.0); // t=1, row=0, col=0
/// ```
pub fn create_cube(ntime: usize, nlat: usize, nlon: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(ntime * nlat * nlon);
    for t in 0..ntime {
        for row in 0..nlat {
            for col in 0..nlon {
                data.push(cube_value(t, row, col));
            }
        }
    }
    data
}

/// Evenly spaced values `start, start + step, ...`.
pub fn linspace(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// A dataset over `lat` x `lon` with a daily time axis and a [`create_cube`]
/// variable named `variable`.
pub fn create_test_dataset(lat: &[f64], lon: &[f64], ntime: usize, variable: &str) -> GriddedDataset {
    let time = TimeAxis::new(linspace(0.0, 1.0, ntime)).with_units(fixtures::time::DAYS_SINCE_2000);
    let data = create_cube(ntime, lat.len(), lon.len());

    GriddedDataset::new(lat.to_vec(), lon.to_vec())
        .with_source("synthetic.nc")
        .with_time(time)
        .and_then(|ds| ds.with_variable(GridVariable::new(variable, ntime, data).with_units("K")))
        .expect("synthetic dataset shapes are consistent")
}

/// The 3 x 3 Santa Barbara grid with `ntime` days of `tasmin`.
pub fn santa_barbara_dataset(ntime: usize) -> GriddedDataset {
    create_test_dataset(&fixtures::grid::SB_LAT, &fixtures::grid::SB_LON, ntime, "tasmin")
}

/// A dataset with coordinates only.
pub fn coordinates_only_dataset(lat: &[f64], lon: &[f64]) -> GriddedDataset {
    GriddedDataset::new(lat.to_vec(), lon.to_vec()).with_source("coords.nc")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_layout() {
        let cube = create_cube(2, 2, 3);
        assert_eq!(cube[0], cube_value(0, 0, 0));
        assert_eq!(cube[4], cube_value(0, 1, 1));
        assert_eq!(cube[11], cube_value(1, 1, 2));
    }

    #[test]
    fn test_santa_barbara_dataset() {
        let ds = santa_barbara_dataset(4);
        assert_eq!(ds.shape().len(), 9);
        assert_eq!(ds.ntime(), 4);
        assert!(ds.variable("tasmin").is_some());
    }
}
