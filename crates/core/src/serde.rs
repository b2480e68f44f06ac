//! Serde helper functions for record and query deserialization.
//!
//! Upstream stores are not strict about optional timestamps (empty strings,
//! legacy formats), and query strings spell booleans in several ways. These
//! helpers normalize both at the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::derive::parse_timestamp;

/// Deserialize an optional timestamp leniently.
///
/// Missing, empty or unparseable values become `None` instead of failing the
/// whole record. Accepts the formats understood by [`parse_timestamp`].
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.as_deref().and_then(parse_timestamp))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Text(String),
}

/// Deserialize a boolean flag from a JSON bool or a query-string value.
///
/// `true`, `1`, `yes`, `on` and an empty value (`?flag`) are true;
/// `false`, `0`, `no`, `off` are false. Anything else is an error.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match FlagRepr::deserialize(deserializer)? {
        FlagRepr::Bool(value) => Ok(value),
        FlagRepr::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "" | "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid boolean flag: {other:?}"
            ))),
        },
    }
}
