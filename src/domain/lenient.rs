//! Tolerant field deserializers for loosely shaped backend payloads.
//!
//! Used with `#[serde(deserialize_with = "...")]`. A field that arrives as
//! `null` or in an unexpected shape becomes its default instead of failing
//! the whole record, and with it the whole page.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `null` becomes `T::default()`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifier or free text: strings as-is, numbers and booleans rendered.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Count, amount or percentile: a JSON number or a numeric string.
pub fn number<'de, D, N>(deserializer: D) -> Result<Option<N>, D::Error>
where
    D: Deserializer<'de>,
    N: FromStr,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => parse_number(&n.to_string()),
        Value::String(s) => parse_number(s.trim()),
        _ => None,
    })
}

/// Whole number given as a float (`12.0`) still parses as an integer.
fn parse_number<N: FromStr>(raw: &str) -> Option<N> {
    raw.parse().ok().or_else(|| {
        raw.strip_suffix(".0")
            .and_then(|whole| whole.parse().ok())
    })
}

/// RFC 3339 string or Unix seconds.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    })
}

/// Nested record; anything that does not fit the shape is dropped.
pub fn nested<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}
