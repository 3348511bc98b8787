//! Lenient request body shapes shared by several resources.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use super::error::{ApiError, ApiResult};

/// A single string or a list of strings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }

    /// First entry, if any.
    pub fn into_first(self) -> Option<String> {
        self.into_vec().into_iter().next()
    }
}

/// Category reference: a bare id or a populated `{ "_id": ... }` object.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CategoryInput {
    Id(String),
    Object {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl CategoryInput {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Object { id } => id,
        }
    }
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parse a path id, mapping failure to a 400 with `message`.
pub fn parse_id(raw: &str, message: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request(message))
}

/// Parse a comma separated id list, ignoring empty segments.
pub fn parse_id_list(raw: &str, message: &str) -> ApiResult<Vec<Uuid>> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| parse_id(id, message))
        .collect()
}

/// Trimmed, non-empty string or `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
