//! End-to-end tests for CSV discovery and parsing.

use climate_common::DashboardError;
use csv_loader::{load, parse_str, LoaderConfig, SeriesFilter};
use test_utils::{fixtures, temp_test_dir, write_test_file};

fn config_for(root: &std::path::Path) -> LoaderConfig {
    LoaderConfig {
        root: root.to_path_buf(),
        ..Default::default()
    }
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_preamble_skipped_and_bad_year_dropped() {
    let table = parse_str(&fixtures::csv::with_preamble(), 8, b',').unwrap();

    assert_eq!(table.years(), &[2020, 2021]);
    assert_eq!(table.dropped_rows(), 1);
    assert_eq!(table.key_name(), "Year");
}

#[test]
fn test_headers_are_trimmed() {
    let table = parse_str(&fixtures::csv::with_preamble(), 8, b',').unwrap();
    assert_eq!(
        table.columns(),
        &["Observed".to_string(), "RCP 4.5".to_string(), "RCP 8.5".to_string()]
    );
}

#[test]
fn test_missing_cell_is_none() {
    let table = parse_str(&fixtures::csv::with_preamble(), 8, b',').unwrap();
    assert_eq!(table.column("RCP 4.5").unwrap(), &[Some(56.0), None]);
}

#[test]
fn test_falls_back_when_no_preamble() {
    let table = parse_str(&fixtures::csv::without_preamble(), 8, b',').unwrap();
    assert_eq!(table.years(), &[2020, 2021]);
}

#[test]
fn test_long_file_without_preamble_is_not_truncated() {
    // Skipping 8 lines would land on a data row; that attempt must be rejected.
    let table = parse_str(&fixtures::csv::yearly_series(1990, 2020), 8, b',').unwrap();
    assert_eq!(table.len(), 31);
    assert_eq!(table.year_range(), Some((1990, 2020)));
}

#[test]
fn test_bad_key_row_after_skip_is_not_taken_as_header() {
    let mut text = String::from("Year,Observed\n");
    for year in 2000..=2006 {
        text.push_str(&format!("{},{}.5\n", year, year - 1950));
    }
    text.push_str("abc,60.0\n2010,60.5\n2011,61.5\n");

    let table = parse_str(&text, 8, b',').unwrap();
    assert_eq!(table.key_name(), "Year");
    assert_eq!(table.columns(), &["Observed".to_string()]);
    assert_eq!(table.years(), &[2000, 2001, 2002, 2003, 2004, 2005, 2006, 2010, 2011]);
    assert_eq!(table.dropped_rows(), 1);
}

#[test]
fn test_both_attempts_fail() {
    let result = parse_str("just one line of text", 8, b',');
    assert!(matches!(result, Err(DashboardError::ParseError(_))));
}

#[test]
fn test_empty_file_fails() {
    let result = parse_str("", 8, b',');
    assert!(matches!(result, Err(DashboardError::ParseError(_))));
}

#[test]
fn test_crlf_and_semicolon_delimiter() {
    let text = "Year;Observed\r\n2020;1.5\r\n2021;2.5\r\n";
    let table = parse_str(text, 0, b';').unwrap();
    assert_eq!(table.years(), &[2020, 2021]);
    assert_eq!(table.column("Observed").unwrap(), &[Some(1.5), Some(2.5)]);
}

#[test]
fn test_fractional_year_truncated() {
    let table = parse_str("Year,A\n2020.0,1\n2021.7,2\n", 0, b',').unwrap();
    assert_eq!(table.years(), &[2020, 2021]);
}

// ============================================================================
// Discovery + load
// ============================================================================

#[test]
fn test_load_from_nested_directory() {
    let dir = temp_test_dir();
    let path = write_test_file(
        dir.path(),
        "downloads/santa_barbara/climate_data.csv",
        &fixtures::csv::with_preamble(),
    );

    let table = load(&config_for(dir.path())).unwrap();
    assert_eq!(table.source(), Some(&path));
    assert_eq!(table.years(), &[2020, 2021]);
}

#[test]
fn test_no_matching_file_is_not_found() {
    let dir = temp_test_dir();
    write_test_file(dir.path(), "other.csv", &fixtures::csv::with_preamble());

    let result = load(&config_for(dir.path()));
    assert!(matches!(result, Err(DashboardError::NotFound(_))));
}

#[test]
fn test_custom_candidates() {
    let dir = temp_test_dir();
    write_test_file(dir.path(), "tmax.csv", &fixtures::csv::without_preamble());

    let config = LoaderConfig {
        candidates: vec!["tmax.csv".to_string()],
        ..config_for(dir.path())
    };
    assert_eq!(load(&config).unwrap().len(), 2);
}

#[test]
fn test_unparseable_file_is_parse_error() {
    let dir = temp_test_dir();
    write_test_file(dir.path(), "data.csv", "\"unterminated,quote\nonly\n");

    let result = load(&config_for(dir.path()));
    assert!(matches!(result, Err(DashboardError::ParseError(_))));
}

#[test]
fn test_filter_over_loaded_table() {
    let table = parse_str(&fixtures::csv::yearly_series(2000, 2010), 0, b',').unwrap();
    let filter = SeriesFilter::new(2005, 2007, vec!["Observed".to_string()]);

    let years: Vec<i32> = table.series_points(&filter).iter().map(|p| p.year).collect();
    assert_eq!(years, vec![2005, 2006, 2007]);
}
