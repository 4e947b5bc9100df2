//! Raw JSON capture for API-returned records.
//!
//! Records returned by the API keep the exact JSON text they were decoded
//! from, so that re-serializing them never drops fields the typed model does
//! not know about. Each record type derives its field-based (de)serializers
//! with `#[serde(remote = "Self")]` and wraps them with [`capture`] on the
//! way in and [`RawValue`] passthrough on the way out.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::de::StrRead;
use serde_json::value::RawValue;

/// The captured source text of a decoded record. `None` for values built in code.
pub(crate) type RawJson = Option<Box<RawValue>>;

/// Captures the JSON text of the next value and decodes typed fields from it.
///
/// Byte fidelity needs a `serde_json` reader (`from_str`, `from_slice`,
/// `from_reader`). Decoding from a `serde_json::Value` captures the value's
/// compact re-serialization instead, and non-JSON formats fail.
pub(crate) fn capture<'de, D, T, F>(deserializer: D, decode: F) -> Result<(T, Box<RawValue>), D::Error>
where
    D: Deserializer<'de>,
    F: FnOnce(&mut serde_json::Deserializer<StrRead<'_>>) -> serde_json::Result<T>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    let mut json = serde_json::Deserializer::from_str(raw.get());
    let value = decode(&mut json).map_err(de::Error::custom)?;
    json.end().map_err(de::Error::custom)?;
    Ok((value, raw))
}

/// Emits the captured text when present, otherwise defers to `fields`.
pub(crate) fn emit<S, F>(raw: &RawJson, serializer: S, fields: F) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    F: FnOnce(S) -> Result<S::Ok, S::Error>,
{
    match raw {
        Some(raw) => raw.serialize(serializer),
        None => fields(serializer),
    }
}
