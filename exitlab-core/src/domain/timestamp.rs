//! Serde adapter for the backtester's `YYYY-MM-DD HH:MM:SS` timestamps.
//!
//! Use with `#[serde(with = "timestamp", default)]` on `Option<NaiveDateTime>`
//! fields. An empty string or `null` decodes to `None`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_str(&ts.format(FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDateTime::parse_from_str(s, FORMAT)
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{s}': {e}"))),
    }
}
