//! Flexible date-string parsing.
//!
//! Turns loosely formatted user input like `"2024-11-08"`, `"08/11/2024"` or
//! `"2024-11-08T10:30:00Z"` into a canonical UTC timestamp. A [`DateFormat`]
//! controls how the first three numeric fields map to year, month and day;
//! any further numeric fields are time-of-day components in input order.
//!
//! Parsing is total: every malformed input is `None`, never a panic and never
//! a half-right timestamp. Impossible dates such as `"2024-02-31"` are
//! rejected rather than rolled over into the next month.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Characters that separate date/time fields. `T` and `Z` let ISO-8601
/// inputs like `2024-11-08T10:30:00Z` tokenize into plain numeric fields.
const DELIMITERS: &[char] = &[' ', ':', '-', '/', 'T', 'Z'];

/// A date needs at least year, month and day.
const DATE_FIELD_COUNT: usize = 3;

/// Field order for the leading date fields of an input string.
///
/// Built from a permutation of the symbols `y`, `m` and `d` via [`FromStr`]
/// (`"ymd"`, `"dmy"`, ...). Anything else fails fast with
/// [`DateFormatError`] instead of silently mis-reading every date after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateFormat {
    year: usize,
    month: usize,
    day: usize,
}

impl Default for DateFormat {
    /// Year, month, day.
    fn default() -> Self {
        DateFormat {
            year: 0,
            month: 1,
            day: 2,
        }
    }
}

/// The format string was not a permutation of `y`, `m`, `d`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid date format {0:?}: expected a permutation of 'y', 'm' and 'd'")]
pub struct DateFormatError(String);

impl FromStr for DateFormat {
    type Err = DateFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut year = None;
        let mut month = None;
        let mut day = None;
        for (index, symbol) in s.chars().enumerate() {
            let slot = match symbol {
                'y' => &mut year,
                'm' => &mut month,
                'd' => &mut day,
                _ => return Err(DateFormatError(s.to_string())),
            };
            if slot.replace(index).is_some() {
                return Err(DateFormatError(s.to_string()));
            }
        }
        match (year, month, day) {
            (Some(year), Some(month), Some(day)) => Ok(DateFormat { year, month, day }),
            _ => Err(DateFormatError(s.to_string())),
        }
    }
}

/// Parse a date/time string with the default year-month-day field order.
pub fn parse_default(raw: Option<&str>) -> Option<DateTime<Utc>> {
    parse(raw, DateFormat::default())
}

/// Parse a loosely formatted date/time string into a UTC timestamp.
///
/// The input is split on runs of space, colon, hyphen, slash, `T` and `Z`,
/// and every field that is not a finite number is dropped. The first three
/// numeric fields are year/month/day in the order given by `format`; up to
/// four more are hour, minute, second and millisecond, with anything past
/// that ignored. Fractional fields are truncated toward zero.
///
/// Returns `None` when fewer than three numeric fields remain, or when the
/// fields do not name a real calendar date and time of day.
pub fn parse(raw: Option<&str>, format: DateFormat) -> Option<DateTime<Utc>> {
    let fields = numeric_fields(raw.unwrap_or(""));
    if fields.len() < DATE_FIELD_COUNT {
        return None;
    }

    let year = int_field(fields[format.year])?;
    let month = int_field(fields[format.month])?;
    let day = int_field(fields[format.day])?;

    // hour, minute, second, millisecond
    let mut clock = [0i64; 4];
    for (slot, field) in clock.iter_mut().zip(&fields[DATE_FIELD_COUNT..]) {
        *slot = int_field(*field)?;
    }

    let date = NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )?;
    let time = date.and_hms_milli_opt(
        u32::try_from(clock[0]).ok()?,
        u32::try_from(clock[1]).ok()?,
        u32::try_from(clock[2]).ok()?,
        u32::try_from(clock[3]).ok()?,
    )?;
    Some(time.and_utc())
}

/// Split on delimiter runs, keeping only fields that read as finite numbers.
fn numeric_fields(raw: &str) -> Vec<f64> {
    raw.split(DELIMITERS)
        .filter(|field| !field.is_empty())
        .filter_map(|field| field.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .collect()
}

/// Truncate toward zero, refusing magnitudes no calendar field can hold.
fn int_field(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    if truncated.abs() > f64::from(i32::MAX) {
        return None;
    }
    Some(truncated as i64)
}
