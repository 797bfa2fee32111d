//! Forgiving field decoders for the level format.
//!
//! Level files are edited by hand. A field of the wrong type decodes to its
//! default instead of failing the whole document, and a malformed array
//! element decodes to the element's default so that indices still match the
//! text. Only broken JSON syntax is an error.
//!
//! Numbers follow the host page's coercion: floats are floored, numeric
//! strings are read as numbers.

#[cfg(test)]
#[path = "lenient_test.rs"]
mod lenient_test;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::camera::Cell;
use crate::model::Size;

// =============================================================
// Value readers
// =============================================================

/// Integer from a JSON number or numeric string. Out-of-range values saturate.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn int_of(v: &Value) -> Option<i64> {
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    let f = float_of(v)?;
    f.is_finite().then(|| f.floor() as i64)
}

/// Float from a JSON number or numeric string.
#[must_use]
pub fn float_of(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) => Some(f),
            Err(_) => None,
        },
        _ => None,
    }
}

/// Text of a string, number or bool; empty for anything else.
#[must_use]
pub fn string_of(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// `{ "x": .., "y": .. }` with both coordinates usable.
#[must_use]
pub fn cell_of(v: &Value) -> Option<Cell> {
    Some(Cell::new(int_of(v.get("x")?)?, int_of(v.get("y")?)?))
}

/// `{ "width": .., "height": .. }`; a missing or unusable side is 0.
#[must_use]
pub fn size_of(v: &Value) -> Option<Size> {
    if !v.is_object() {
        return None;
    }
    let side = |key: &str| v.get(key).and_then(int_of).unwrap_or_default();
    Some(Size { width: side("width"), height: side("height") })
}

// =============================================================
// `deserialize_with` adapters
// =============================================================

pub fn float<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(float_of(&Value::deserialize(d)?).unwrap_or_default())
}

pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(string_of(&Value::deserialize(d)?))
}

pub fn cell<'de, D: Deserializer<'de>>(d: D) -> Result<Cell, D::Error> {
    Ok(cell_of(&Value::deserialize(d)?).unwrap_or_default())
}

pub fn opt_cell<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Cell>, D::Error> {
    Ok(cell_of(&Value::deserialize(d)?))
}

pub fn size<'de, D: Deserializer<'de>>(d: D) -> Result<Size, D::Error> {
    Ok(size_of(&Value::deserialize(d)?).unwrap_or_default())
}

pub fn opt_size<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Size>, D::Error> {
    Ok(size_of(&Value::deserialize(d)?))
}

/// Array of `T`. A non-array is empty; an element that is not an object
/// becomes `T::default()` in place.
pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let Value::Array(items) = Value::deserialize(d)? else {
        return Ok(Vec::new());
    };
    Ok(items.into_iter().map(element).collect())
}

fn element<T: DeserializeOwned + Default>(v: Value) -> T {
    if !v.is_object() {
        return T::default();
    }
    serde_json::from_value(v).unwrap_or_default()
}
