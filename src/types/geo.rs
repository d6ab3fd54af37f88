use serde_json::{Map, Value as JsonValue};

use crate::{
    data::{Cell, Value},
    field::Field,
};

const GEOMETRY_TYPES: &[&str] = &[
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
];

/// `default` is `"lon, lat"`; `array` is `[lon, lat]`; `object` is
/// `{"lon": .., "lat": ..}`. JSON text is accepted for the latter two.
pub fn parse_geopoint(field: &Field, cell: &Cell) -> Option<Value> {
    let (lon, lat) = match field.format.as_str() {
        "array" => match decode_json_text(cell)? {
            JsonValue::Array(items) if items.len() == 2 => {
                (coordinate(&items[0])?, coordinate(&items[1])?)
            }
            _ => return None,
        },
        "object" => match decode_json_text(cell)? {
            JsonValue::Object(map) if map.len() == 2 => {
                (coordinate(map.get("lon")?)?, coordinate(map.get("lat")?)?)
            }
            _ => return None,
        },
        _ => {
            let JsonValue::String(text) = cell else {
                return None;
            };
            let (lon, lat) = text.split_once(',')?;
            (lon.trim().parse::<f64>().ok()?, lat.trim().parse::<f64>().ok()?)
        }
    };
    let valid = lon.is_finite()
        && lat.is_finite()
        && (-180.0..=180.0).contains(&lon)
        && (-90.0..=90.0).contains(&lat);
    valid.then_some(Value::GeoPoint { lon, lat })
}

fn coordinate(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(number) => number.as_f64(),
        JsonValue::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Borrows structured cells as-is and decodes string cells as JSON text.
pub(crate) fn decode_json_text(cell: &Cell) -> Option<JsonValue> {
    match cell {
        JsonValue::String(text) => serde_json::from_str(text).ok(),
        JsonValue::Array(_) | JsonValue::Object(_) => Some(cell.clone()),
        _ => None,
    }
}

pub fn parse_geojson(field: &Field, cell: &Cell) -> Option<Value> {
    let JsonValue::Object(map) = decode_json_text(cell)? else {
        return None;
    };
    let valid = match field.format.as_str() {
        "topojson" => is_topology(&map),
        _ => is_geojson_object(&map),
    };
    valid.then_some(Value::GeoJson(map))
}

fn is_geojson_object(map: &Map<String, JsonValue>) -> bool {
    let Some(kind) = map.get("type").and_then(JsonValue::as_str) else {
        return false;
    };
    match kind {
        kind if GEOMETRY_TYPES.contains(&kind) => {
            matches!(map.get("coordinates"), Some(JsonValue::Array(_)))
        }
        "GeometryCollection" => match map.get("geometries") {
            Some(JsonValue::Array(items)) => items.iter().all(|item| match item {
                JsonValue::Object(inner) => is_geojson_object(inner),
                _ => false,
            }),
            _ => false,
        },
        "Feature" => match map.get("geometry") {
            Some(JsonValue::Null) => true,
            Some(JsonValue::Object(geometry)) => is_geojson_object(geometry),
            _ => false,
        },
        "FeatureCollection" => match map.get("features") {
            Some(JsonValue::Array(items)) => items.iter().all(|item| match item {
                JsonValue::Object(inner) => {
                    inner.get("type").and_then(JsonValue::as_str) == Some("Feature")
                        && is_geojson_object(inner)
                }
                _ => false,
            }),
            _ => false,
        },
        _ => false,
    }
}

fn is_topology(map: &Map<String, JsonValue>) -> bool {
    map.get("type").and_then(JsonValue::as_str) == Some("Topology")
        && matches!(map.get("objects"), Some(JsonValue::Object(_)))
}
