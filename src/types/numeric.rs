use std::{str::FromStr, sync::OnceLock};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use crate::{
    data::{Cell, Number, Value},
    field::Field,
    types::text::{normalize_decimal_char, regex_strip, remove_group_char, trim},
};

fn integer_decoration() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\d+\-]+|\D+$").expect("static integer pattern"))
}

fn number_decoration() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\d+\-.]+|[^\d.]+$").expect("static number pattern"))
}

pub fn parse_integer(field: &Field, cell: &Cell) -> Option<Value> {
    match cell {
        JsonValue::Number(number) => {
            if let Some(value) = number.as_i64() {
                return Some(Value::Integer(value));
            }
            if let Some(value) = number.as_u64() {
                return Some(Value::BigInteger(BigInt::from(value)));
            }
            let float = number.as_f64()?;
            let in_range = float >= i64::MIN as f64 && float <= i64::MAX as f64;
            (float.fract() == 0.0 && in_range).then_some(Value::Integer(float as i64))
        }
        JsonValue::String(text) => {
            let mut token = trim(text);
            if !field.bare_number {
                token = regex_strip(token, integer_decoration());
            }
            parse_whole(&token)
        }
        _ => None,
    }
}

/// Digits with an optional sign; `i64` when it fits, `BigInt` otherwise.
fn parse_whole(token: &str) -> Option<Value> {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match token.parse::<i64>() {
        Ok(value) => Some(Value::Integer(value)),
        Err(_) => BigInt::from_str(token).ok().map(Value::BigInteger),
    }
}

pub fn parse_number(field: &Field, cell: &Cell) -> Option<Value> {
    match cell {
        JsonValue::Number(number) => {
            if field.float_number {
                number.as_f64().map(|v| Value::Number(Number::Float(v)))
            } else {
                parse_decimal(&number.to_string()).map(Value::Number)
            }
        }
        JsonValue::String(text) => {
            let token = remove_group_char(text.trim(), field.group_char.as_deref());
            let mut token = normalize_decimal_char(token, field.decimal_char.as_deref());
            if !field.bare_number {
                token = regex_strip(token, number_decoration());
            }
            if token.is_empty() {
                return None;
            }
            if field.float_number {
                token
                    .parse::<f64>()
                    .ok()
                    .map(|v| Value::Number(Number::Float(v)))
            } else {
                parse_decimal(&token).map(Value::Number)
            }
        }
        _ => None,
    }
}

/// `Decimal` first; tokens beyond its range or precision become `BigDecimal`.
fn parse_decimal(token: &str) -> Option<Number> {
    if token.contains('_') {
        return None;
    }
    if let Ok(value) = Decimal::from_str(token).or_else(|_| Decimal::from_scientific(token)) {
        return Some(Number::Decimal(value));
    }
    BigDecimal::from_str(token).ok().map(Number::Big)
}

pub fn parse_boolean(field: &Field, cell: &Cell) -> Option<Value> {
    match cell {
        JsonValue::Bool(flag) => Some(Value::Boolean(*flag)),
        JsonValue::String(text) => {
            let token = text.as_str();
            if field.true_values().contains(&token) {
                Some(Value::Boolean(true))
            } else if field.false_values().contains(&token) {
                Some(Value::Boolean(false))
            } else {
                None
            }
        }
        _ => None,
    }
}
