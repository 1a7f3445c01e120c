//! Native NetCDF reading using the netcdf library.
//!
//! The netcdf library requires a file path (it wraps libnetcdf/HDF5 which need
//! file handles). When reading from bytes, we write to a temp file first.
//!
//! On Linux, we use `/dev/shm` (memory-backed tmpfs) to minimize I/O latency.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Once;

use climate_common::{GridVariable, GriddedDataset, TimeAxis};
use tracing::{debug, info};

use crate::error::{NetCdfError, NetCdfResult};

const LAT_NAMES: &[&str] = &["lat", "latitude"];
const LON_NAMES: &[&str] = &["lon", "longitude"];
const TIME_NAME: &str = "time";

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist).
///
/// Call this early in `main()`, before any HDF5/NetCDF operations occur.
/// Safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Open a gridded dataset from a file on disk.
///
/// `lat`/`lon` (or `latitude`/`longitude`) are required. `time` and the data
/// variable named `variable` are optional; a file without the variable still
/// yields a dataset whose grid can be drawn.
///
/// # Errors
///
/// - `MissingData` if a coordinate variable is absent
/// - `InvalidFormat` if a coordinate is not 1-D or the data variable is not
///   `(time, lat, lon)` over the coordinate dimensions
pub fn open_gridded(path: &Path, variable: &str) -> NetCdfResult<GriddedDataset> {
    silence_hdf5_errors();

    let file = netcdf::open(path)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to open NetCDF: {}", e)))?;

    let (lat_name, lat) = read_coordinate(&file, LAT_NAMES)?;
    let (lon_name, lon) = read_coordinate(&file, LON_NAMES)?;

    let mut dataset = GriddedDataset::new(lat, lon);

    if let Some(time_var) = file.variable(TIME_NAME) {
        let axis = read_time_axis(&time_var)?;
        dataset = dataset
            .with_time(axis)
            .map_err(|e| NetCdfError::InvalidFormat(e.to_string()))?;
    }

    match file.variable(variable) {
        Some(var) => {
            let grid_var = read_grid_variable(&var, variable, &lat_name, &lon_name)?;
            dataset = dataset
                .with_variable(grid_var)
                .map_err(|e| NetCdfError::InvalidFormat(e.to_string()))?;
        }
        None => debug!(variable, "Data variable not present, loading coordinates only"),
    }

    let shape = dataset.shape();
    info!(
        path = %path.display(),
        nlat = shape.nlat,
        nlon = shape.nlon,
        ntime = dataset.ntime(),
        variables = ?dataset.variable_names(),
        "Opened gridded dataset"
    );

    Ok(dataset)
}

/// Load a gridded dataset from uploaded bytes.
///
/// The bytes are written to a uniquely named temp file, read with
/// [`open_gridded`] and the temp file is removed whether or not reading
/// succeeded. `source_name` is recorded as the dataset's source.
pub fn load_gridded_from_bytes(
    data: &[u8],
    variable: &str,
    source_name: Option<&str>,
) -> NetCdfResult<GriddedDataset> {
    if data.is_empty() {
        return Err(NetCdfError::InvalidFormat("upload is empty".to_string()));
    }

    // Use memory-backed filesystem on Linux for faster I/O
    let temp_dir = get_optimal_temp_dir();
    let temp_file = temp_dir.join(generate_temp_filename());

    let mut file = std::fs::File::create(&temp_file)?;
    if let Err(e) = file.write_all(data) {
        drop(file);
        let _ = std::fs::remove_file(&temp_file);
        return Err(e.into());
    }
    drop(file);

    let result = open_gridded(&temp_file, variable);

    // Clean up
    let _ = std::fs::remove_file(&temp_file);

    let dataset = result?;
    Ok(match source_name {
        Some(name) => dataset.with_source(name),
        None => dataset,
    })
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Read the first of `names` present in the file as a 1-D `f64` coordinate.
fn read_coordinate(file: &netcdf::File, names: &[&str]) -> NetCdfResult<(String, Vec<f64>)> {
    let (name, var) = names
        .iter()
        .find_map(|name| file.variable(name).map(|v| (name.to_string(), v)))
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", names[0])))?;

    let dims = var.dimensions();
    if dims.len() != 1 {
        return Err(NetCdfError::InvalidFormat(format!(
            "coordinate '{}' must be 1-D, found {} dimensions",
            name,
            dims.len()
        )));
    }
    let dim_name = dims[0].name();

    let values: Vec<f64> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;

    Ok((dim_name, values))
}

fn read_time_axis(var: &netcdf::Variable) -> NetCdfResult<TimeAxis> {
    if var.dimensions().len() != 1 {
        return Err(NetCdfError::InvalidFormat(
            "time coordinate must be 1-D".to_string(),
        ));
    }

    let values: Vec<f64> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read time: {}", e)))?;

    let mut axis = TimeAxis::new(values);
    if let Some(units) = get_str_attr(var, "units") {
        axis = axis.with_units(units);
    }
    if let Some(calendar) = get_str_attr(var, "calendar") {
        axis = axis.with_calendar(calendar);
    }
    Ok(axis)
}

/// Read a `(time, lat, lon)` variable, unpacking fill values and scaling.
fn read_grid_variable(
    var: &netcdf::Variable,
    name: &str,
    lat_dim: &str,
    lon_dim: &str,
) -> NetCdfResult<GridVariable> {
    let dims = var.dimensions();
    let dim_names: Vec<String> = dims.iter().map(|d| d.name()).collect();

    if dims.len() != 3 || dim_names[1] != lat_dim || dim_names[2] != lon_dim {
        return Err(NetCdfError::InvalidFormat(format!(
            "variable '{}' has dimensions {:?}, expected (time, {}, {})",
            name, dim_names, lat_dim, lon_dim
        )));
    }
    let ntime = dims[0].len();

    let raw: Vec<f64> = var
        .get_values(..)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to read {}: {}", name, e)))?;

    let scale_factor = get_f64_attr(var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f64_attr(var, "add_offset").unwrap_or(0.0);
    let fill_value = get_f64_attr(var, "_FillValue");
    let missing_value = get_f64_attr(var, "missing_value");

    // Apply fill masking, then scale and offset
    let data: Vec<f32> = raw
        .iter()
        .map(|&val| {
            if val.is_nan() || Some(val) == fill_value || Some(val) == missing_value {
                f32::NAN
            } else {
                (val * scale_factor + add_offset) as f32
            }
        })
        .collect();

    let mut grid_var = GridVariable::new(name, ntime, data);
    if let Some(units) = get_str_attr(var, "units") {
        grid_var = grid_var.with_units(units);
    }
    Ok(grid_var)
}

/// Get the optimal temp directory for NetCDF file operations.
///
/// On Linux, uses /dev/shm (memory-backed tmpfs) if available for faster I/O.
/// Falls back to the system temp directory on other platforms or if /dev/shm is unavailable.
fn get_optimal_temp_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let shm_path = Path::new("/dev/shm");
        if shm_path.is_dir() {
            let test_path = shm_path.join(format!(".gridded_test_{}", std::process::id()));
            if std::fs::write(&test_path, b"test").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return shm_path.to_path_buf();
            }
        }
    }

    std::env::temp_dir()
}

/// Unique temp file name from process ID, thread ID and a counter.
fn generate_temp_filename() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let pid = std::process::id();
    let tid = std::thread::current().id();
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("gridded_upload_{}_{:?}_{}.nc", pid, tid, count)
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

fn get_str_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_temp_dir() {
        let dir = get_optimal_temp_dir();
        assert!(dir.exists(), "Temp dir should exist");
    }

    #[test]
    fn test_temp_filename_uniqueness() {
        let name1 = generate_temp_filename();
        let name2 = generate_temp_filename();
        assert_ne!(name1, name2, "Temp filenames should be unique");
    }

    #[test]
    fn test_empty_upload_rejected() {
        let result = load_gridded_from_bytes(&[], "tasmin", None);
        assert!(matches!(result, Err(NetCdfError::InvalidFormat(_))));
    }

    #[test]
    fn test_garbage_upload_rejected() {
        let result = load_gridded_from_bytes(b"not a netcdf file", "tasmin", None);
        assert!(matches!(result, Err(NetCdfError::InvalidFormat(_))));
    }
}
