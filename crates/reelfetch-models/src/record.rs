use serde::{Deserialize, Serialize};

/// Normalized lookup payload returned to callers.
///
/// `foreign_title` is either `Some(true)` or absent; it is never serialized
/// as `false`, so consumers must read a missing field as "not foreign".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MergedRecord {
    pub title: String,
    pub original_title: String,
    pub source_url: String,
    pub year: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_title: Option<bool>,
}

impl MergedRecord {
    pub fn is_foreign(&self) -> bool {
        self.foreign_title.unwrap_or(false)
    }
}
