//! Field type registry: one cell parser per semantic type.
//!
//! Every parser is pure and returns `None` when the cell cannot be read as
//! the field's type. Callers decide whether that is an error or just a
//! negative vote during inference.

pub mod geo;
pub mod numeric;
pub mod structured;
pub mod temporal;
pub mod text;

use crate::{
    data::{Cell, Value},
    field::{Field, FieldType},
};

pub fn parse_cell(field: &Field, cell: &Cell) -> Option<Value> {
    match field.field_type {
        FieldType::Any => Some(Value::Any(cell.clone())),
        FieldType::String => text::parse_string(field, cell),
        FieldType::Integer => numeric::parse_integer(field, cell),
        FieldType::Number => numeric::parse_number(field, cell),
        FieldType::Boolean => numeric::parse_boolean(field, cell),
        FieldType::Date => temporal::parse_date(field, cell),
        FieldType::DateTime => temporal::parse_datetime(field, cell),
        FieldType::Time => temporal::parse_time(field, cell),
        FieldType::Year => temporal::parse_year(cell),
        FieldType::YearMonth => temporal::parse_yearmonth(cell),
        FieldType::Duration => temporal::parse_duration(cell),
        FieldType::GeoPoint => geo::parse_geopoint(field, cell),
        FieldType::GeoJson => geo::parse_geojson(field, cell),
        FieldType::Object => structured::parse_object(cell),
        FieldType::Array => structured::parse_array(cell),
    }
}
