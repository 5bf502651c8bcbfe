use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One organization entry from the listing API
///
/// Only the fields the harvest needs are modelled; the list cache keeps the
/// API's raw JSON, so unknown fields survive untouched on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,

    #[serde(default)]
    pub shortname: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
}

/// Record id as the listing API sends it, either a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl Record {
    /// Short name usable as a URL path, if the record has a non-blank one
    pub fn short_name(&self) -> Option<&str> {
        self.shortname
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{}", id),
            Self::Text(id) => f.write_str(id),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
