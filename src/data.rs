//! Raw cells as read from a source and the normalized values fields produce.
//!
//! A [`Cell`] is untyped: CSV sources yield strings while inline sources may
//! carry numbers, booleans, or nested JSON. [`Value`] is what a field's
//! parser hands back once a cell has been accepted.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use num_bigint::BigInt;
use rust_decimal::Decimal;
use serde_json::{Map, Value as JsonValue};

pub type Cell = JsonValue;

/// Stand-in for cells past the end of a short row.
pub static NULL_CELL: Cell = JsonValue::Null;

/// A sample is a bounded slice of rows, each row an ordered list of cells.
pub type Sample = [Vec<Cell>];

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    /// Whole number outside the `i64` range.
    BigInteger(BigInt),
    Number(Number),
    Boolean(bool),
    Date(NaiveDate),
    DateTime {
        value: NaiveDateTime,
        offset: Option<FixedOffset>,
    },
    Time {
        value: NaiveTime,
        offset: Option<FixedOffset>,
    },
    Year(i32),
    YearMonth {
        year: i32,
        month: u32,
    },
    Duration(IsoDuration),
    GeoPoint {
        lon: f64,
        lat: f64,
    },
    GeoJson(Map<String, JsonValue>),
    Object(Map<String, JsonValue>),
    Array(Vec<JsonValue>),
    Any(JsonValue),
}

/// `Decimal` covers about 28 significant digits; values beyond its range
/// fall back to `Big`.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Decimal(Decimal),
    Big(BigDecimal),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Decimal(d) => write!(f, "{d}"),
            Number::Big(d) => write!(f, "{d}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

/// ISO 8601 duration components. Calendar units are kept apart from clock
/// units because their length in seconds depends on the anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IsoDuration {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P")?;
        for (amount, unit) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if amount > 0 {
                write!(f, "{amount}{unit}")?;
            }
        }
        if self.hours > 0 || self.minutes > 0 || self.seconds > 0.0 {
            write!(f, "T")?;
            if self.hours > 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes > 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds > 0.0 {
                write!(f, "{}S", self.seconds)?;
            }
        }
        if *self == IsoDuration::default() {
            write!(f, "T0S")?;
        }
        Ok(())
    }
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::BigInteger(i) => i.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime { value, offset } => match offset {
                Some(offset) => format!("{}{}", value.format("%Y-%m-%dT%H:%M:%S%.f"), offset),
                None => value.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            },
            Value::Time { value, offset } => match offset {
                Some(offset) => format!("{}{}", value.format("%H:%M:%S%.f"), offset),
                None => value.format("%H:%M:%S%.f").to_string(),
            },
            Value::Year(y) => y.to_string(),
            Value::YearMonth { year, month } => format!("{year:04}-{month:02}"),
            Value::Duration(d) => d.to_string(),
            Value::GeoPoint { lon, lat } => format!("{lon},{lat}"),
            Value::GeoJson(map) | Value::Object(map) => JsonValue::Object(map.clone()).to_string(),
            Value::Array(items) => JsonValue::Array(items.clone()).to_string(),
            Value::Any(cell) => cell_text(cell),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// A cell is missing when it is absent (`null`) or a string listed among
/// the missing-value tokens.
pub fn is_missing(cell: &Cell, missing_values: &[String]) -> bool {
    match cell {
        JsonValue::Null => true,
        JsonValue::String(s) => missing_values.iter().any(|token| token == s),
        _ => false,
    }
}

/// Text rendering of a raw cell for notes and tables; strings are unquoted.
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
