//! Common test fixtures for climate dashboard tests.
//!
//! This module provides pre-defined test data that represents common
//! scenarios: portal CSV exports and a small coastal grid.

/// CSV text fixtures.
pub mod csv {
    /// The eight metadata lines the data portal writes before the header.
    pub const PREAMBLE: &str = "\
# Cal-Adapt climate data export
# Location: Santa Barbara, CA
# Variable: Annual average maximum temperature
# Units: degrees Fahrenheit
# Models: observed, RCP 4.5, RCP 8.5
# Source: LOCA downscaled CMIP5
# Generated: 2024-01-15
#";

    /// Header and rows following [`PREAMBLE`]; the `abc` row must be dropped.
    pub const BODY: &str = "\
Year ,Observed, RCP 4.5 ,RCP 8.5
2020,55.1,56.0,56.4
abc,60.0,61.0,62.0
2021,56.3,,57.9
";

    /// A portal export: preamble followed by [`BODY`].
    pub fn with_preamble() -> String {
        format!("{}\n{}", PREAMBLE, BODY)
    }

    /// The same table with the preamble stripped by hand.
    pub fn without_preamble() -> String {
        BODY.to_string()
    }

    /// A longer series without preamble, one row per year from `start` to `end`.
    pub fn yearly_series(start: i32, end: i32) -> String {
        let mut out = String::from("Year,Observed,RCP 8.5\n");
        for year in start..=end {
            let offset = (year - start) as f64;
            out.push_str(&format!("{},{:.1},{:.1}\n", year, 55.0 + offset * 0.1, 56.0 + offset * 0.2));
        }
        out
    }
}

/// Coordinate fixtures.
pub mod grid {
    /// Three latitude rows around Santa Barbara.
    pub const SB_LAT: [f64; 3] = [34.2, 34.4, 34.6];

    /// Three longitude columns around Santa Barbara.
    pub const SB_LON: [f64; 3] = [-120.1, -119.7, -119.3];

    /// Box as (min_lat, max_lat, min_lon, max_lon); 34.6 lies on its edge.
    pub const SB_BOX: (f64, f64, f64, f64) = (34.3, 34.6, -120.0, -119.4);
}

/// Common time values for testing.
pub mod time {
    /// CF units used by the synthetic datasets.
    pub const DAYS_SINCE_2000: &str = "days since 2000-01-01";
}
