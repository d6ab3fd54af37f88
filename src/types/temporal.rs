//! Calendar and clock types: date, datetime, time, year, yearmonth, duration.
//!
//! `default` formats are the ISO 8601 layouts; `any` tries a list of common
//! layouts; any other format string is a chrono strftime pattern.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value as JsonValue;

use crate::{
    data::{Cell, IsoDuration, Value},
    field::{DEFAULT_FORMAT, Field},
};

const ANY_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%d %b %Y",
    "%b %d, %Y",
];

const ANY_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

const ANY_TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

pub fn parse_date(field: &Field, cell: &Cell) -> Option<Value> {
    let JsonValue::String(text) = cell else {
        return None;
    };
    let text = text.trim();
    let parsed = match field.format.as_str() {
        DEFAULT_FORMAT => NaiveDate::parse_from_str(text, "%Y-%m-%d").ok(),
        "any" => ANY_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok()),
        pattern => NaiveDate::parse_from_str(text, pattern).ok(),
    };
    parsed.map(Value::Date)
}

pub fn parse_datetime(field: &Field, cell: &Cell) -> Option<Value> {
    let JsonValue::String(text) = cell else {
        return None;
    };
    let text = text.trim();
    let (body, offset) = split_offset(text);
    let value = match field.format.as_str() {
        DEFAULT_FORMAT => NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S%.f").ok(),
        "any" => ANY_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(body, fmt).ok()),
        pattern => {
            return NaiveDateTime::parse_from_str(text, pattern)
                .ok()
                .map(|value| Value::DateTime {
                    value,
                    offset: None,
                });
        }
    }?;
    Some(Value::DateTime { value, offset })
}

pub fn parse_time(field: &Field, cell: &Cell) -> Option<Value> {
    let JsonValue::String(text) = cell else {
        return None;
    };
    let text = text.trim();
    let (body, offset) = split_offset(text);
    let value = match field.format.as_str() {
        DEFAULT_FORMAT => NaiveTime::parse_from_str(body, "%H:%M:%S%.f").ok(),
        "any" => ANY_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(body, fmt).ok()),
        pattern => {
            return NaiveTime::parse_from_str(text, pattern)
                .ok()
                .map(|value| Value::Time {
                    value,
                    offset: None,
                });
        }
    }?;
    Some(Value::Time { value, offset })
}

/// Splits a trailing `Z` or `±hh:mm` designator from an ISO timestamp.
fn split_offset(text: &str) -> (&str, Option<FixedOffset>) {
    if let Some(body) = text.strip_suffix(['Z', 'z']) {
        return (body, FixedOffset::east_opt(0));
    }
    let bytes = text.as_bytes();
    if bytes.len() > 6 {
        let start = bytes.len() - 6;
        let sign = bytes[start];
        if (sign == b'+' || sign == b'-') && bytes[start + 3] == b':' {
            let hours = text[start + 1..start + 3].parse::<i32>().ok();
            let minutes = text[start + 4..].parse::<i32>().ok();
            if let (Some(hours), Some(minutes)) = (hours, minutes)
                && hours <= 23
                && minutes <= 59
            {
                let seconds = hours * 3600 + minutes * 60;
                let seconds = if sign == b'-' { -seconds } else { seconds };
                return (&text[..start], FixedOffset::east_opt(seconds));
            }
        }
    }
    (text, None)
}

pub fn parse_year(cell: &Cell) -> Option<Value> {
    match cell {
        JsonValue::String(text) => {
            let text = text.trim();
            if text.len() != 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            text.parse::<i32>().ok().map(Value::Year)
        }
        JsonValue::Number(number) => {
            let year = number.as_i64()?;
            i32::try_from(year)
                .ok()
                .filter(|year| *year >= 0)
                .map(Value::Year)
        }
        _ => None,
    }
}

pub fn parse_yearmonth(cell: &Cell) -> Option<Value> {
    let (year, month) = match cell {
        JsonValue::String(text) => {
            let (year, month) = text.trim().split_once('-')?;
            if !is_digits(year) || !is_digits(month) {
                return None;
            }
            (year.parse::<i32>().ok()?, month.parse::<u32>().ok()?)
        }
        JsonValue::Array(items) if items.len() == 2 => {
            let year = i32::try_from(items[0].as_i64()?).ok()?;
            let month = u32::try_from(items[1].as_i64()?).ok()?;
            (year, month)
        }
        _ => return None,
    };
    (1..=12)
        .contains(&month)
        .then_some(Value::YearMonth { year, month })
}

fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

pub fn parse_duration(cell: &Cell) -> Option<Value> {
    let JsonValue::String(text) = cell else {
        return None;
    };
    parse_iso_duration(text.trim()).map(Value::Duration)
}

/// Parses `PnYnMnWnDTnHnMnS`. Only the seconds component may be fractional.
pub fn parse_iso_duration(text: &str) -> Option<IsoDuration> {
    let rest = text.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => {
            if time.is_empty() {
                return None;
            }
            (date, Some(time))
        }
        None => (rest, None),
    };

    let mut duration = IsoDuration::default();
    let mut components = 0usize;

    for (amount, unit) in duration_components(date_part)? {
        let amount = whole(amount)?;
        match unit {
            'Y' => duration.years = amount,
            'M' => duration.months = amount,
            'W' => duration.weeks = amount,
            'D' => duration.days = amount,
            _ => return None,
        }
        components += 1;
    }

    if let Some(time_part) = time_part {
        for (amount, unit) in duration_components(time_part)? {
            match unit {
                'H' => duration.hours = whole(amount)?,
                'M' => duration.minutes = whole(amount)?,
                'S' => {
                    let seconds = amount.replace(',', ".").parse::<f64>().ok()?;
                    if !seconds.is_finite() || seconds < 0.0 {
                        return None;
                    }
                    duration.seconds = seconds;
                }
                _ => return None,
            }
            components += 1;
        }
    }

    (components > 0).then_some(duration)
}

fn whole(amount: &str) -> Option<u32> {
    if !is_digits(amount) {
        return None;
    }
    amount.parse().ok()
}

/// Splits `1Y2M` into `[("1", 'Y'), ("2", 'M')]`, rejecting repeated or
/// dangling units.
fn duration_components(part: &str) -> Option<Vec<(&str, char)>> {
    let mut components = Vec::new();
    let mut start = 0usize;
    for (idx, ch) in part.char_indices() {
        if ch.is_ascii_alphabetic() {
            let amount = &part[start..idx];
            if amount.is_empty() || components.iter().any(|(_, unit)| *unit == ch) {
                return None;
            }
            components.push((amount, ch));
            start = idx + ch.len_utf8();
        }
    }
    (start == part.len()).then_some(components)
}
