//! Tolerant parsing of the climate CSV.
//!
//! Files exported by the data portal carry a fixed number of metadata lines
//! before the header. Hand-edited copies often do not. Parsing therefore
//! tries the preamble skip first and falls back to reading from line one.

use climate_common::{DashboardError, DashboardResult};
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::table::ClimateTable;

/// Parse CSV text into a [`ClimateTable`].
///
/// The first attempt skips `preamble_lines` lines; if it fails for any
/// reason, a second attempt parses from the first line. Only when both fail
/// is a `ParseError` returned.
pub fn parse_str(text: &str, preamble_lines: usize, delimiter: u8) -> DashboardResult<ClimateTable> {
    let text = text.trim_start_matches('\u{feff}');

    let first = match skip_lines(text, preamble_lines) {
        Some(body) => parse_body(body, delimiter),
        None => Err(format!("file has fewer than {} lines", preamble_lines)),
    };

    match first {
        Ok(table) => Ok(table),
        Err(reason) if preamble_lines > 0 => {
            debug!(
                preamble_lines,
                reason = %reason,
                "Parse with preamble skipped failed, retrying from first line"
            );
            parse_body(text, delimiter).map_err(|retry| {
                DashboardError::ParseError(format!(
                    "skipping {} lines: {}; from first line: {}",
                    preamble_lines, reason, retry
                ))
            })
        }
        Err(reason) => Err(DashboardError::ParseError(reason)),
    }
}

/// Coerce a key cell to an integer year.
///
/// Accepts anything that parses as a finite number and truncates toward
/// zero, so `"2020"`, `" 2020.0 "` and `"2020.9"` all give 2020.
pub fn coerce_year(raw: &str) -> Option<i32> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i32::MIN as f64 || truncated > i32::MAX as f64 {
        return None;
    }
    Some(truncated as i32)
}

fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Return the text after the first `n` lines, or `None` if there are fewer.
fn skip_lines(text: &str, n: usize) -> Option<&str> {
    if n == 0 {
        return Some(text);
    }
    text.match_indices('\n')
        .nth(n - 1)
        .map(|(offset, _)| &text[offset + 1..])
}

fn parse_body(body: &str, delimiter: u8) -> Result<ClimateTable, String> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(body.as_bytes());

    let header = reader
        .headers()
        .map_err(|e| format!("unreadable header: {}", e))?
        .clone();

    let names = normalize_headers(&header);
    if names.is_empty() || names.iter().all(|n| n.is_empty()) {
        return Err("no header row".to_string());
    }
    if names.len() < 2 {
        return Err(format!("header has a single column '{}'", names[0]));
    }
    if coerce_year(&names[0]).is_some() {
        return Err(format!("header starts with a data value '{}'", names[0]));
    }
    if names[1..].iter().all(|n| parse_value(n).is_some()) {
        return Err(format!("header series names are all numeric: {:?}", &names[1..]));
    }

    let mut table = ClimateTable::with_columns(names[0].clone(), names[1..].to_vec());
    let mut dropped = 0usize;

    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| format!("row {}: {}", index + 1, e))?;

        let Some(year) = record.get(0).and_then(coerce_year) else {
            dropped += 1;
            continue;
        };

        let values = record.iter().skip(1).map(parse_value).collect();
        table.push_row(year, values);
    }

    if dropped > 0 {
        debug!(dropped, "Dropped rows whose key is not a year");
    }

    Ok(table.with_dropped_rows(dropped))
}

/// Trim header names and disambiguate duplicates with a numeric suffix.
fn normalize_headers(header: &StringRecord) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());
    for raw in header.iter() {
        let base = raw.trim().to_string();
        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }
    names
}
