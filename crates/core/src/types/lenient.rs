//! Forgiving serde helpers for numeric fields owned by the catalog store.
//!
//! Records arrive from a store the client does not control. A missing, null or
//! non-numeric `quantity` or `price` decodes as zero instead of failing the
//! whole product list. Numeric identifiers may arrive as strings, and edit
//! timestamps may be missing altogether.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Decode a stock quantity, treating anything unusable as zero.
///
/// Fractional numbers are truncated toward zero.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(quantity_from_value(&value))
}

/// Decode a price, treating anything unusable as zero.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_value(&value))
}

/// Decode a numeric identifier sent as a number or a numeric string.
///
/// Anything else decodes as the default identifier.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn id<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<i64> + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(id_from_value(&value).map_or_else(T::default, T::from))
}

/// Decode an RFC 3339 timestamp; missing or unparseable values become `None`.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself fails.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|at| at.with_timezone(&Utc)))
}

/// Encode a decimal as a JSON number, which is what the catalog store stores.
///
/// # Errors
///
/// Propagates serializer failures.
pub fn decimal_as_number<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract().is_zero()
        && let Some(whole) = value.to_i64()
    {
        return serializer.serialize_i64(whole);
    }
    serializer.serialize_f64(value.to_f64().unwrap_or_default())
}

#[allow(clippy::cast_possible_truncation)]
fn quantity_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

fn id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn decimal_from_value(value: &Value) -> Decimal {
    match value {
        // Go through the textual form so 19.99 stays exactly 19.99.
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            .unwrap_or_default(),
        Value::String(s) => Decimal::from_str(s.trim()).unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}
