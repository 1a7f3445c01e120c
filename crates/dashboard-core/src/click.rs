//! Parsing of map click payloads.

use std::num::ParseIntError;

use climate_common::CellId;

/// Parse the hover text of a clicked map point as a cell identifier.
///
/// The front end attaches [`GridCell::hover_text`](climate_common::GridCell::hover_text)
/// to every plotted point, so the payload is a decimal integer, possibly
/// padded with whitespace. Range is not checked here.
pub fn parse_cell_id(raw: &str) -> Result<CellId, ParseIntError> {
    raw.trim().parse::<CellId>()
}
