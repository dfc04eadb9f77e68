//! Lenient field deserializers for request bodies.
//!
//! Clients send numbers as strings and strings as numbers interchangeably, so
//! scalar fields are coerced to the column type instead of being rejected.
//! Every helper is meant to be used together with `#[serde(default)]`, an
//! absent field never reaches the deserializer.

use serde::de::{Deserialize, Deserializer, Error};
use serde_json::Value;

fn scalar_text<E: Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(E::custom(format!("expected a scalar value, found {}", other))),
    }
}

/// A text field where `null` is the same as leaving it out.
pub fn lenient_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
    where D: Deserializer<'de>
{
    scalar_text(Value::deserialize(de)?)
}

/// A nullable text column in a partial update.
///
/// `None` means "leave untouched" (the field was absent), `Some(None)` clears
/// the column.
pub fn text_patch<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
    where D: Deserializer<'de>
{
    scalar_text(Value::deserialize(de)?).map(Some)
}

pub fn lenient_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
    where D: Deserializer<'de>
{
    match Value::deserialize(de)? {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("{} is not a valid float", n))),
        Value::String(s) => s.trim().parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("\"{}\" is not a number", s))),
        other => Err(D::Error::custom(format!("expected a number, found {}", other))),
    }
}

/// Integers may also arrive as floats (truncated) or numeric strings.
pub fn lenient_i64<'de, D>(de: D) -> Result<Option<i64>, D::Error>
    where D: Deserializer<'de>
{
    match Value::deserialize(de)? {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_i64()
            .or_else(|| n.as_f64().filter(|x| x.is_finite()).map(|x| x.trunc() as i64))
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("{} is not a valid integer", n))),
        Value::String(s) => s.trim().parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("\"{}\" is not an integer", s))),
        other => Err(D::Error::custom(format!("expected an integer, found {}", other))),
    }
}
