//! API models for request and response payloads
//!
//! Request bodies arrive with every field optional so that missing fields can
//! be reported with the API's own messages; `validate` turns them into the
//! closed shapes the stores accept.

use serde::{Deserialize, Deserializer};

pub mod category;
pub mod photo;
pub mod user;

/// Trim a string field, treating blank values as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Deserialize a clearable field: absent is `None`, `null` is `Some(None)`
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// [`non_blank`] for clearable fields; a blank value clears
pub(crate) fn non_blank_or_clear(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(non_blank)
}
