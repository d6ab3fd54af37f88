//! Field descriptors and the closed set of semantic field types.
//!
//! [`FieldType::CANDIDATES`] fixes the order in which the detector races
//! types against a column; when two candidates cross the confidence
//! threshold on the same cell the earlier one wins.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::{
    config::{DEFAULT_FALSE_VALUES, DEFAULT_TRUE_VALUES},
    data::{Cell, Value, cell_text, is_missing},
    error::{CellError, Error, Result},
    types,
};

pub const DEFAULT_FORMAT: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Any,
    String,
    Integer,
    Number,
    Boolean,
    Date,
    DateTime,
    Time,
    Year,
    YearMonth,
    Duration,
    GeoPoint,
    GeoJson,
    Object,
    Array,
}

impl FieldType {
    /// Types raced during inference, most specific first. `any` is not a
    /// candidate: it is the starting type of every column and the fallback
    /// when nothing reaches the threshold.
    pub const CANDIDATES: [FieldType; 14] = [
        FieldType::YearMonth,
        FieldType::GeoPoint,
        FieldType::Duration,
        FieldType::GeoJson,
        FieldType::Object,
        FieldType::Array,
        FieldType::DateTime,
        FieldType::Time,
        FieldType::Date,
        FieldType::Integer,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Year,
        FieldType::String,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Any => "any",
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Time => "time",
            FieldType::Year => "year",
            FieldType::YearMonth => "yearmonth",
            FieldType::Duration => "duration",
            FieldType::GeoPoint => "geopoint",
            FieldType::GeoJson => "geojson",
            FieldType::Object => "object",
            FieldType::Array => "array",
        }
    }

    pub fn variants() -> Vec<&'static str> {
        FieldType::CANDIDATES
            .iter()
            .chain(std::iter::once(&FieldType::Any))
            .map(FieldType::as_str)
            .collect()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        FieldType::CANDIDATES
            .iter()
            .chain(std::iter::once(&FieldType::Any))
            .find(|ty| ty.as_str() == normalized)
            .copied()
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "Unknown field type '{value}'. Supported types: {}",
                    FieldType::variants().join(", ")
                ))
            })
    }
}

fn is_default_format(format: &str) -> bool {
    format == DEFAULT_FORMAT
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

const fn default_bare_number() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A single column descriptor. Keys this crate does not model are kept in
/// `extra` so patches and round-trips never lose them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default = "default_format", skip_serializing_if = "is_default_format")]
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub float_number: bool,
    #[serde(default = "default_bare_number", skip_serializing_if = "is_true")]
    pub bare_number: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_char: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_char: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub false_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_values: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Field {
            name: name.into(),
            field_type,
            format: default_format(),
            title: None,
            description: None,
            float_number: false,
            bare_number: true,
            group_char: None,
            decimal_char: None,
            true_values: None,
            false_values: None,
            missing_values: None,
            extra: Map::new(),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_float_number(mut self, float_number: bool) -> Self {
        self.float_number = float_number;
        self
    }

    pub fn true_values(&self) -> Vec<&str> {
        match &self.true_values {
            Some(values) => values.iter().map(String::as_str).collect(),
            None => DEFAULT_TRUE_VALUES.to_vec(),
        }
    }

    pub fn false_values(&self) -> Vec<&str> {
        match &self.false_values {
            Some(values) => values.iter().map(String::as_str).collect(),
            None => DEFAULT_FALSE_VALUES.to_vec(),
        }
    }

    /// Parses one raw cell under this field's type and options.
    ///
    /// Missing cells (per the field's own missing values, falling back to
    /// `schema_missing_values`) read as `Ok(None)`.
    pub fn read_cell(
        &self,
        cell: &Cell,
        schema_missing_values: &[String],
    ) -> Result<Option<Value>, CellError> {
        let missing = self
            .missing_values
            .as_deref()
            .unwrap_or(schema_missing_values);
        if is_missing(cell, missing) {
            return Ok(None);
        }
        self.parse(cell).map(Some)
    }

    /// Parses a cell already known to be present.
    pub fn parse(&self, cell: &Cell) -> Result<Value, CellError> {
        types::parse_cell(self, cell).ok_or_else(|| CellError {
            field: self.name.clone(),
            field_type: self.field_type,
            cell: cell_text(cell),
        })
    }

    /// Returns a copy with `patch` merged key-by-key over the descriptor.
    pub fn update(&self, patch: &Map<String, JsonValue>) -> Result<Field> {
        let mut descriptor = match serde_json::to_value(self)? {
            JsonValue::Object(map) => map,
            _ => return Err(Error::schema("Field descriptor must be an object")),
        };
        for (key, value) in patch {
            descriptor.insert(key.clone(), value.clone());
        }
        serde_json::from_value(JsonValue::Object(descriptor)).map_err(Error::Patch)
    }
}
