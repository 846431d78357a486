//! Schema validation for raw upstream records.
//!
//! A schema is any serde-deserializable type with a stable name. Numeric and
//! boolean fields may opt into lenient coercion so `"5"` validates as `5`,
//! the way upstream systems that stringify everything expect.

use crate::domain::error::AdapterError;
use crate::domain::value_objects::Record;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;

/// A typed view of one upstream record.
pub trait Schema: DeserializeOwned + Send + 'static {
    /// Name reported in validation errors.
    const NAME: &'static str;

    /// Validate a record, rejecting it whole on any field error.
    fn from_record(record: Record) -> Result<Self, AdapterError> {
        serde_json::from_value(Value::Object(record)).map_err(|source| AdapterError::Validation {
            schema: Self::NAME,
            source,
        })
    }
}

fn coerce<T, E>(value: Value) -> Result<T, E>
where
    T: FromStr + DeserializeOwned,
    T::Err: Display,
    E: serde::de::Error,
{
    match value {
        Value::String(text) => text.trim().parse::<T>().map_err(E::custom),
        other => serde_json::from_value(other).map_err(E::custom),
    }
}

/// Accept a value in its native JSON form or as a string.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + DeserializeOwned,
    T::Err: Display,
{
    let value = Value::deserialize(deserializer)?;
    coerce(value)
}

/// Optional variant of [`lenient`]; `null` maps to `None`.
pub fn lenient_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + DeserializeOwned,
    T::Err: Display,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(value) => coerce(value).map(Some),
    }
}

/// Reject empty identifiers.
pub fn non_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    if text.trim().is_empty() {
        return Err(D::Error::custom("must not be empty"));
    }
    Ok(text)
}
