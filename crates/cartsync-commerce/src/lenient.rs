//! Tolerant number parsing for storefront JSON.
//!
//! The backend serializes decimal prices as strings (`"125000"`), while pages
//! that wrote the cart record stored numbers. Both forms are accepted here.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Read a non-negative integer from a JSON number or numeric string.
///
/// Strings may contain thousands separators and an all-zero fraction
/// (`"1,250,000"`, `"125000.00"`). Negative, fractional and non-finite values
/// are rejected.
pub fn u64_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_f64)),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned
                .parse::<u64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().and_then(whole_f64))
        }
        _ => None,
    }
}

/// Read a signed integer from a JSON number or numeric string.
pub fn i64_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn whole_f64(f: f64) -> Option<u64> {
    // 2^64 as f64; anything at or above it does not fit.
    const LIMIT: f64 = 18_446_744_073_709_551_616.0;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < LIMIT).then(|| f as u64)
}

/// Deserialize a required price given as number or string.
pub fn price<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    u64_from_value(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid price: {value}")))
}

/// Deserialize an optional price; `null` or absent means `None`.
pub fn optional_price<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    u64_from_value(&value)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid price: {value}")))
}

/// Deserialize a stock count; unreadable values count as zero.
pub fn stock_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(i64_from_value(&value).unwrap_or(0))
}
