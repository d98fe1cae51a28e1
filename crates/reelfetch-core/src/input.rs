//! Inbound payload parsing and identifier extraction.
//!
//! Two payload shapes are accepted: a bare title URL, or the legacy
//! newline-delimited form `title\n[summary\n]url` sent by older share-sheet
//! shortcuts. Both resolve to the URL's identifier segment.

use reelfetch_models::MediaReference;
use crate::error::LookupError;

/// Index of the identifier once a title URL is split on `/`:
/// `https:` / `` / host / `title` / `<id>`.
const IDENTIFIER_SEGMENT: usize = 4;

/// The URL carried by an inbound payload. Title and summary lines of the
/// legacy form are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupInput {
    url: String,
}

impl LookupInput {
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        // Some clients JSON-escape the slashes before form-encoding
        let normalized = raw.replace("\\/", "/");
        let lines: Vec<&str> = normalized
            .trim()
            .split('\n')
            .map(|line| line.trim_end_matches('\r').trim())
            .collect();

        let url = match lines.as_slice() {
            [url] | [_, url] | [_, _, url] => url.to_string(),
            _ => {
                return Err(LookupError::malformed(format!(
                    "expected a URL or up to three lines, got {} lines",
                    lines.len()
                )))
            }
        };

        if url.is_empty() {
            return Err(LookupError::malformed("no URL was provided"));
        }
        Ok(Self { url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn reference(&self) -> Result<MediaReference, LookupError> {
        extract_identifier(&self.url)
    }
}

/// Pull the identifier out of `https://<host>/title/<id>/...`.
pub fn extract_identifier(url: &str) -> Result<MediaReference, LookupError> {
    let segments: Vec<&str> = url.split('/').collect();
    if segments.len() <= IDENTIFIER_SEGMENT {
        return Err(LookupError::malformed(format!(
            "URL has {} path segments, expected at least {}: {}",
            segments.len(),
            IDENTIFIER_SEGMENT + 1,
            url
        )));
    }

    let segment = segments[IDENTIFIER_SEGMENT];
    let segment = segment.split(['?', '#']).next().unwrap_or_default();

    MediaReference::new(segment)
        .ok_or_else(|| LookupError::malformed(format!("URL has an empty identifier segment: {}", url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_identifier() {
        let id = extract_identifier("https://www.imdb.com/title/tt0111161/").unwrap();
        assert_eq!(id.as_str(), "tt0111161");

        let id = extract_identifier("https://m.imdb.com/title/tt0245429/reviews?ref_=tt_ov").unwrap();
        assert_eq!(id.as_str(), "tt0245429");

        // No trailing slash still has five segments
        let id = extract_identifier("https://www.imdb.com/title/tt0068646").unwrap();
        assert_eq!(id.as_str(), "tt0068646");
    }

    #[test]
    fn test_strips_query_and_fragment() {
        let id = extract_identifier("https://www.imdb.com/title/tt0068646?ref_=share").unwrap();
        assert_eq!(id.as_str(), "tt0068646");
        let id = extract_identifier("https://www.imdb.com/title/tt0068646#cast").unwrap();
        assert_eq!(id.as_str(), "tt0068646");
    }

    #[test]
    fn test_too_few_segments() {
        assert!(matches!(
            extract_identifier("https://www.imdb.com/title"),
            Err(LookupError::MalformedInput(_))
        ));
        assert!(extract_identifier("tt0111161").is_err());
        assert!(extract_identifier("").is_err());
    }

    #[test]
    fn test_empty_identifier_segment() {
        assert!(matches!(
            extract_identifier("https://www.imdb.com/title//"),
            Err(LookupError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_raw_url() {
        let input = LookupInput::parse("https://www.imdb.com/title/tt0111161/\r\n").unwrap();
        assert_eq!(input.url(), "https://www.imdb.com/title/tt0111161/");
        assert_eq!(input.reference().unwrap().as_str(), "tt0111161");
    }

    #[test]
    fn test_parse_legacy_forms() {
        let two = LookupInput::parse("Heat (1995)\r\nhttps://www.imdb.com/title/tt0113277/").unwrap();
        assert_eq!(two.url(), "https://www.imdb.com/title/tt0113277/");

        let three = LookupInput::parse("Heat\nA heist thriller.\nhttps://www.imdb.com/title/tt0113277/").unwrap();
        assert_eq!(three.url(), "https://www.imdb.com/title/tt0113277/");
        assert_eq!(three.reference().unwrap().as_str(), "tt0113277");
    }

    #[test]
    fn test_parse_unescapes_slashes() {
        let input = LookupInput::parse(r"https:\/\/www.imdb.com\/title\/tt0113277\/").unwrap();
        assert_eq!(input.url(), "https://www.imdb.com/title/tt0113277/");
    }

    #[test]
    fn test_parse_rejects_empty_and_too_many_lines() {
        assert!(matches!(LookupInput::parse(""), Err(LookupError::MalformedInput(_))));
        assert!(matches!(LookupInput::parse("a\nb\nc\nd"), Err(LookupError::MalformedInput(_))));
        // Trailing blank lines are trimmed away, leaving a single line
        assert_eq!(LookupInput::parse("title\n").unwrap().url(), "title");
        assert_eq!(LookupInput::parse("title\n \n").unwrap().url(), "title");
        assert!(matches!(LookupInput::parse("title\n\n"), Ok(_)));
    }
}
