use serde_json::Value as JsonValue;

use crate::{
    data::{Cell, Value},
    types::geo::decode_json_text,
};

pub fn parse_object(cell: &Cell) -> Option<Value> {
    match decode_json_text(cell)? {
        JsonValue::Object(map) => Some(Value::Object(map)),
        _ => None,
    }
}

pub fn parse_array(cell: &Cell) -> Option<Value> {
    match decode_json_text(cell)? {
        JsonValue::Array(items) => Some(Value::Array(items)),
        _ => None,
    }
}
