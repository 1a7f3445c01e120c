//! CF-convention time axis decoding.
//!
//! NetCDF climate files store time as numeric offsets with a `units`
//! attribute like `"days since 1950-01-01"`. Only fixed-length units are
//! decoded; `months since` and `years since` have no unambiguous duration
//! and are left undecoded.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Calendars whose day length and leap rules match chrono's.
const GREGORIAN_CALENDARS: &[&str] = &["standard", "gregorian", "proleptic_gregorian"];

/// Offsets beyond this many milliseconds are rejected before conversion.
const MAX_OFFSET_MS: f64 = 1.0e15;

/// Unit of a CF time offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "days" | "day" | "d" => Some(Self::Days),
            "hours" | "hour" | "hr" | "hrs" | "h" => Some(Self::Hours),
            "minutes" | "minute" | "min" | "mins" => Some(Self::Minutes),
            "seconds" | "second" | "sec" | "secs" | "s" => Some(Self::Seconds),
            _ => None,
        }
    }

    fn seconds(&self) -> f64 {
        match self {
            Self::Days => 86_400.0,
            Self::Hours => 3_600.0,
            Self::Minutes => 60.0,
            Self::Seconds => 1.0,
        }
    }
}

/// A parsed `"<unit> since <reference>"` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfTimeUnits {
    pub unit: TimeUnit,
    pub epoch: DateTime<Utc>,
}

impl CfTimeUnits {
    /// Parse a CF `units` attribute. Returns `None` for anything that is not a
    /// fixed-length `since` expression.
    pub fn parse(units: &str) -> Option<Self> {
        let (unit, reference) = units.trim().split_once(" since ")?;
        let unit = TimeUnit::parse(unit.trim())?;
        let epoch = parse_reference_time(reference.trim())?;
        Some(Self { unit, epoch })
    }

    /// Whether values in `calendar` can be decoded with these units.
    pub fn supports_calendar(calendar: Option<&str>) -> bool {
        match calendar {
            None => true,
            Some(c) => GREGORIAN_CALENDARS.contains(&c.trim().to_lowercase().as_str()),
        }
    }

    /// Convert one offset to a UTC timestamp.
    pub fn decode(&self, offset: f64) -> Option<DateTime<Utc>> {
        if !offset.is_finite() {
            return None;
        }
        let ms = (offset * self.unit.seconds() * 1000.0).round();
        if ms.abs() > MAX_OFFSET_MS {
            return None;
        }
        self.epoch
            .checked_add_signed(Duration::milliseconds(ms as i64))
    }
}

/// Parse the reference timestamp of a CF units string.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (fractional seconds dropped),
/// `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM` and a bare date. A trailing
/// `Z` or `UTC` is ignored.
fn parse_reference_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let s = s.trim_end_matches("UTC").trim_end_matches('Z').trim();
    let s = match s.split_once('.') {
        Some((whole, _fraction)) if whole.contains(':') => whole,
        _ => s,
    };

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}
