use std::{borrow::Cow, sync::OnceLock};

use regex::Regex;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::{
    data::{Cell, Value},
    field::Field,
};

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern"))
}

fn uri_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]+$").expect("static uri pattern")
    })
}

/// Only string cells are strings; formats narrow what is accepted.
pub fn parse_string(field: &Field, cell: &Cell) -> Option<Value> {
    let JsonValue::String(text) = cell else {
        return None;
    };
    let accepted = match field.format.as_str() {
        "email" => email_pattern().is_match(text),
        "uri" => uri_pattern().is_match(text),
        "uuid" => Uuid::parse_str(text).is_ok(),
        _ => true,
    };
    accepted.then(|| Value::String(text.clone()))
}

/// Trims leading/trailing whitespace while borrowing the original.
pub fn trim(input: &str) -> Cow<'_, str> {
    Cow::Borrowed(input.trim())
}

/// Removes every occurrence of `group` (a thousands separator), avoiding
/// allocation when it does not appear.
pub fn remove_group_char<'a>(input: &'a str, group: Option<&str>) -> Cow<'a, str> {
    match group {
        Some(group) if !group.is_empty() && input.contains(group) => {
            Cow::Owned(input.replace(group, ""))
        }
        _ => Cow::Borrowed(input),
    }
}

/// Rewrites a locale decimal separator to `.`.
pub fn normalize_decimal_char<'a>(input: Cow<'a, str>, decimal: Option<&str>) -> Cow<'a, str> {
    match decimal {
        Some(decimal) if !decimal.is_empty() && decimal != "." && input.contains(decimal) => {
            Cow::Owned(input.replace(decimal, "."))
        }
        _ => input,
    }
}

/// Applies a regex replacement while avoiding allocation when there are no matches.
pub fn regex_strip<'a>(input: Cow<'a, str>, regex: &Regex) -> Cow<'a, str> {
    if regex.is_match(&input) {
        Cow::Owned(regex.replace_all(&input, "").into_owned())
    } else {
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;
    use serde_json::json;

    #[test]
    fn string_accepts_only_string_cells() {
        let field = Field::new("s", FieldType::String);
        assert_eq!(
            parse_string(&field, &json!("hello")),
            Some(Value::String("hello".to_string()))
        );
        assert_eq!(parse_string(&field, &json!(1)), None);
        assert_eq!(parse_string(&field, &json!(true)), None);
    }

    #[test]
    fn string_formats_are_checked() {
        let email = Field::new("e", FieldType::String).with_format("email");
        assert!(parse_string(&email, &json!("someone@example.com")).is_some());
        assert!(parse_string(&email, &json!("someone at example")).is_none());

        let uri = Field::new("u", FieldType::String).with_format("uri");
        assert!(parse_string(&uri, &json!("https://example.com/a?b=c")).is_some());
        assert!(parse_string(&uri, &json!("not a uri")).is_none());

        let uuid = Field::new("g", FieldType::String).with_format("uuid");
        assert!(parse_string(&uuid, &json!("550e8400-e29b-41d4-a716-446655440000")).is_some());
        assert!(parse_string(&uuid, &json!("not-a-guid")).is_none());
    }

    #[test]
    fn separators_are_normalized_without_needless_allocation() {
        assert!(matches!(remove_group_char("1000", Some(",")), Cow::Borrowed(_)));
        assert_eq!(remove_group_char("1,000,000", Some(",")), "1000000");
        let decimal = normalize_decimal_char(Cow::Borrowed("3,14"), Some(","));
        assert_eq!(decimal, "3.14");
    }
}
