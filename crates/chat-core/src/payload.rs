//! Typed readers over raw API payloads
//!
//! A payload is one JSON object as received from the API. [`Fields`] reads
//! keys out of it and turns every shape mismatch into a [`PayloadError`]
//! naming the key. A key that is present with `null` reads as absent.

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use crate::error::{ModelError, ModelResult, PayloadError};
use crate::value_objects::Snowflake;

/// One decoded JSON object from the API
pub type Payload = Map<String, Value>;

/// Integer that does not name a variant of a closed enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized enum value {0}")]
pub struct UnknownVariant(pub u64);

/// Borrowed view over a payload with typed accessors
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    payload: &'a Payload,
}

impl<'a> Fields<'a> {
    pub fn new(payload: &'a Payload) -> Self {
        Self { payload }
    }

    /// The underlying payload
    pub fn payload(&self) -> &'a Payload {
        self.payload
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.payload.get(key).filter(|v| !v.is_null())
    }

    fn required(&self, key: &str) -> Result<&'a Value, PayloadError> {
        self.get(key).ok_or_else(|| missing(key))
    }

    /// Check whether a non-null value is present
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn snowflake(&self, key: &str) -> Result<Snowflake, PayloadError> {
        to_snowflake(key, self.required(key)?)
    }

    pub fn opt_snowflake(&self, key: &str) -> Result<Option<Snowflake>, PayloadError> {
        self.get(key).map(|v| to_snowflake(key, v)).transpose()
    }

    /// Array of ids, empty when absent
    pub fn snowflakes(&self, key: &str) -> Result<Vec<Snowflake>, PayloadError> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let items = value.as_array().ok_or_else(|| invalid(key, "an array"))?;
        items
            .iter()
            .enumerate()
            .map(|(i, v)| to_snowflake(&format!("{key}[{i}]"), v))
            .collect()
    }

    pub fn str(&self, key: &str) -> Result<&'a str, PayloadError> {
        self.required(key)?
            .as_str()
            .ok_or_else(|| invalid(key, "a string"))
    }

    pub fn opt_str(&self, key: &str) -> Result<Option<&'a str>, PayloadError> {
        self.get(key)
            .map(|v| v.as_str().ok_or_else(|| invalid(key, "a string")))
            .transpose()
    }

    pub fn string(&self, key: &str) -> Result<String, PayloadError> {
        self.str(key).map(str::to_owned)
    }

    pub fn opt_string(&self, key: &str) -> Result<Option<String>, PayloadError> {
        Ok(self.opt_str(key)?.map(str::to_owned))
    }

    /// Array of strings, empty when absent
    pub fn strings(&self, key: &str) -> Result<Vec<&'a str>, PayloadError> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let items = value.as_array().ok_or_else(|| invalid(key, "an array"))?;
        items
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_str()
                    .ok_or_else(|| invalid(&format!("{key}[{i}]"), "a string"))
            })
            .collect()
    }

    pub fn u64(&self, key: &str) -> Result<u64, PayloadError> {
        self.required(key)?
            .as_u64()
            .ok_or_else(|| invalid(key, "a non-negative integer"))
    }

    pub fn opt_u64(&self, key: &str) -> Result<Option<u64>, PayloadError> {
        self.get(key)
            .map(|v| v.as_u64().ok_or_else(|| invalid(key, "a non-negative integer")))
            .transpose()
    }

    pub fn opt_u32(&self, key: &str) -> Result<Option<u32>, PayloadError> {
        self.get(key)
            .map(|v| {
                v.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| invalid(key, "a 32-bit integer"))
            })
            .transpose()
    }

    pub fn i64(&self, key: &str) -> Result<i64, PayloadError> {
        self.required(key)?
            .as_i64()
            .ok_or_else(|| invalid(key, "an integer"))
    }

    pub fn opt_i64(&self, key: &str) -> Result<Option<i64>, PayloadError> {
        self.get(key)
            .map(|v| v.as_i64().ok_or_else(|| invalid(key, "an integer")))
            .transpose()
    }

    pub fn bool_or_false(&self, key: &str) -> Result<bool, PayloadError> {
        self.get(key)
            .map_or(Ok(false), |v| v.as_bool().ok_or_else(|| invalid(key, "a boolean")))
    }

    pub fn timestamp(&self, key: &str) -> Result<DateTime<FixedOffset>, PayloadError> {
        let raw = self.str(key)?;
        parse_timestamp(key, raw)
    }

    pub fn opt_timestamp(&self, key: &str) -> Result<Option<DateTime<FixedOffset>>, PayloadError> {
        self.opt_str(key)?
            .map(|raw| parse_timestamp(key, raw))
            .transpose()
    }

    pub fn object(&self, key: &str) -> Result<&'a Payload, PayloadError> {
        self.required(key)?
            .as_object()
            .ok_or_else(|| invalid(key, "an object"))
    }

    pub fn opt_object(&self, key: &str) -> Result<Option<&'a Payload>, PayloadError> {
        self.get(key)
            .map(|v| v.as_object().ok_or_else(|| invalid(key, "an object")))
            .transpose()
    }

    /// Closed enumeration stored as a small integer
    pub fn enum_value<E>(&self, key: &str) -> Result<E, PayloadError>
    where
        E: TryFrom<u64, Error = UnknownVariant>,
    {
        let raw = self.u64(key)?;
        E::try_from(raw).map_err(|UnknownVariant(value)| PayloadError::UnknownVariant {
            field: key.to_string(),
            value,
        })
    }

    /// Integer bitfield, zero when absent
    pub fn bits(&self, key: &str) -> Result<u64, PayloadError> {
        Ok(self.opt_u64(key)?.unwrap_or(0))
    }

    /// Decode a nested object, prefixing errors with the key
    pub fn nested<T>(
        &self,
        key: &str,
        decode: impl FnOnce(&'a Payload) -> ModelResult<T>,
    ) -> ModelResult<T> {
        let object = self.object(key)?;
        decode(object).map_err(|e| e.within(key))
    }

    /// Decode an optional nested object, prefixing errors with the key
    pub fn opt_nested<T>(
        &self,
        key: &str,
        decode: impl FnOnce(&'a Payload) -> ModelResult<T>,
    ) -> ModelResult<Option<T>> {
        self.opt_object(key)?
            .map(|object| decode(object).map_err(|e| e.within(key)))
            .transpose()
    }

    /// Decode every object of an array in order, empty when absent
    ///
    /// Errors are reported against `key[index]`.
    pub fn map_objects<T>(
        &self,
        key: &str,
        mut decode: impl FnMut(&'a Payload) -> ModelResult<T>,
    ) -> ModelResult<Vec<T>> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let items = value.as_array().ok_or_else(|| invalid(key, "an array"))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{key}[{i}]");
                let object = item
                    .as_object()
                    .ok_or_else(|| ModelError::from(invalid(&path, "an object")))?;
                decode(object).map_err(|e| e.within(&path))
            })
            .collect()
    }
}

fn to_snowflake(key: &str, value: &Value) -> Result<Snowflake, PayloadError> {
    match value {
        Value::String(raw) => Snowflake::parse(raw).map_err(|_| PayloadError::InvalidSnowflake {
            field: key.to_string(),
            value: raw.clone(),
        }),
        Value::Number(n) => n
            .as_u64()
            .map(Snowflake::new)
            .ok_or_else(|| PayloadError::InvalidSnowflake {
                field: key.to_string(),
                value: n.to_string(),
            }),
        _ => Err(invalid(key, "a snowflake string")),
    }
}

fn parse_timestamp(key: &str, raw: &str) -> Result<DateTime<FixedOffset>, PayloadError> {
    DateTime::parse_from_rfc3339(raw).map_err(|_| PayloadError::InvalidTimestamp {
        field: key.to_string(),
        value: raw.to_string(),
    })
}

fn missing(key: &str) -> PayloadError {
    PayloadError::MissingField {
        field: key.to_string(),
    }
}

fn invalid(key: &str, expected: &'static str) -> PayloadError {
    PayloadError::InvalidType {
        field: key.to_string(),
        expected,
    }
}

/// Build a payload from a `serde_json::json!` object literal
///
/// Returns an empty payload for anything that is not an object.
pub fn payload_from(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}
