use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-neutral title identifier (IMDb style, e.g. `tt0111161`).
///
/// Both metadata providers and the watch-history service key their lookups
/// on this value, so it is carried around unchanged once derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaReference(String);

impl MediaReference {
    /// Wrap a raw identifier. Returns `None` for empty input or anything
    /// containing a path separator.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the canonical `tt` + digits shape.
    pub fn is_imdb_shaped(&self) -> bool {
        self.0
            .strip_prefix("tt")
            .map(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    }

    /// Canonical title page for this identifier, used when a lookup was
    /// requested by bare identifier rather than by URL.
    pub fn canonical_url(&self) -> String {
        format!("https://www.imdb.com/title/{}/", self.0)
    }
}

impl fmt::Display for MediaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MediaReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_slashes() {
        assert!(MediaReference::new("").is_none());
        assert!(MediaReference::new("   ").is_none());
        assert!(MediaReference::new("tt1/2").is_none());
    }

    #[test]
    fn test_imdb_shape() {
        assert!(MediaReference::new("tt0111161").unwrap().is_imdb_shaped());
        assert!(!MediaReference::new("tt").unwrap().is_imdb_shaped());
        assert!(!MediaReference::new("nm0000151").unwrap().is_imdb_shaped());
    }

    #[test]
    fn test_canonical_url() {
        let reference = MediaReference::new("tt0111161").unwrap();
        assert_eq!(reference.canonical_url(), "https://www.imdb.com/title/tt0111161/");
    }
}
