use reelfetch_config::Config;
use reelfetch_models::{MediaReference, MergedRecord};
use reelfetch_sources::{OmdbClient, PrimaryProvider, SecondaryProvider, TmdbClient};
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::LookupError;
use crate::input::{extract_identifier, LookupInput};
use crate::merge::merge;

/// Fetch-both-then-merge pipeline.
#[derive(Clone)]
pub struct LookupService {
    primary: Arc<dyn PrimaryProvider>,
    secondary: Arc<dyn SecondaryProvider>,
}

impl LookupService {
    pub fn new(primary: Arc<dyn PrimaryProvider>, secondary: Arc<dyn SecondaryProvider>) -> Self {
        Self { primary, secondary }
    }

    /// Wire the OMDb and TMDB clients from configuration.
    pub fn from_config(config: &Config, http: Client) -> Self {
        Self::new(
            Arc::new(OmdbClient::new(http.clone(), config.omdb.clone())),
            Arc::new(TmdbClient::new(http, config.tmdb.clone())),
        )
    }

    /// Look up a title URL.
    pub async fn process(&self, url: &str) -> Result<MergedRecord, LookupError> {
        let reference = extract_identifier(url)?;
        self.process_reference(&reference, url).await
    }

    pub async fn process_input(&self, input: &LookupInput) -> Result<MergedRecord, LookupError> {
        self.process(input.url()).await
    }

    /// Look up an identifier directly. `source_url` is echoed in the record.
    pub async fn process_reference(
        &self,
        reference: &MediaReference,
        source_url: &str,
    ) -> Result<MergedRecord, LookupError> {
        let start = Instant::now();
        if !reference.is_imdb_shaped() {
            warn!(imdb_id = %reference, "Identifier does not look like an IMDb title id");
        }

        // Independent lookups; both must succeed
        let (primary, secondary) = futures::join!(
            self.primary.fetch_primary(reference),
            self.secondary.fetch_secondary(reference)
        );

        let primary = primary.map_err(LookupError::MergeUnavailable)?;
        let secondary = secondary.map_err(LookupError::MergeUnavailable)?;

        let record = merge(primary, secondary, source_url);
        info!(
            operation = "lookup",
            imdb_id = %reference,
            title = %record.title,
            foreign = record.is_foreign(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Lookup complete"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reelfetch_models::{PrimaryMetadata, SecondaryMetadata};
    use reelfetch_sources::{FetchError, FetchErrorKind, Provider};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubPrimary {
        result: Option<PrimaryMetadata>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PrimaryProvider for StubPrimary {
        async fn fetch_primary(&self, _reference: &MediaReference) -> Result<PrimaryMetadata, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .ok_or_else(|| FetchError::new(Provider::Omdb, FetchErrorKind::Rejected("Incorrect IMDb ID.".to_string())))
        }
    }

    struct StubSecondary {
        result: Option<SecondaryMetadata>,
    }

    #[async_trait]
    impl SecondaryProvider for StubSecondary {
        async fn fetch_secondary(&self, _reference: &MediaReference) -> Result<SecondaryMetadata, FetchError> {
            self.result
                .clone()
                .ok_or_else(|| FetchError::new(Provider::Tmdb, FetchErrorKind::NoMatch))
        }
    }

    fn good_primary() -> PrimaryMetadata {
        PrimaryMetadata {
            title: "Spirited Away".to_string(),
            year: "2001".to_string(),
            plot: Some("A girl works in a bathhouse for spirits.".to_string()),
        }
    }

    fn good_secondary() -> SecondaryMetadata {
        SecondaryMetadata {
            title: "Spirited Away".to_string(),
            original_title: "千と千尋の神隠し".to_string(),
            overview: Some("A young girl wanders into a world ruled by gods.".to_string()),
        }
    }

    fn service(primary: Option<PrimaryMetadata>, secondary: Option<SecondaryMetadata>) -> (LookupService, Arc<StubPrimary>) {
        let stub = Arc::new(StubPrimary {
            result: primary,
            calls: AtomicUsize::new(0),
        });
        let service = LookupService::new(stub.clone(), Arc::new(StubSecondary { result: secondary }));
        (service, stub)
    }

    #[tokio::test]
    async fn test_process_merges() {
        let (service, _) = service(Some(good_primary()), Some(good_secondary()));
        let url = "https://www.imdb.com/title/tt0245429/";

        let record = service.process(url).await.unwrap();
        assert_eq!(record.title, "Spirited Away");
        assert_eq!(record.original_title, "千と千尋の神隠し");
        assert_eq!(record.year, "2001");
        assert_eq!(record.summary, "A girl works in a bathhouse for spirits.");
        assert_eq!(record.source_url, url);
        assert_eq!(record.foreign_title, Some(true));
    }

    #[tokio::test]
    async fn test_empty_secondary_discards_primary() {
        let (service, stub) = service(Some(good_primary()), None);

        let err = service.process("https://www.imdb.com/title/tt0245429/").await.unwrap_err();
        match err {
            LookupError::MergeUnavailable(fetch) => {
                assert_eq!(fetch.provider, Provider::Tmdb);
                assert!(matches!(fetch.kind, FetchErrorKind::NoMatch));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The primary lookup ran but its result was dropped
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_primary_failure_is_merge_unavailable() {
        let (service, _) = service(None, Some(good_secondary()));
        let err = service.process("https://www.imdb.com/title/tt0245429/").await.unwrap_err();
        assert_eq!(err.fetch_error().unwrap().provider, Provider::Omdb);
    }

    #[tokio::test]
    async fn test_malformed_url_makes_no_calls() {
        let (service, stub) = service(Some(good_primary()), Some(good_secondary()));
        let err = service.process("https://www.imdb.com/").await.unwrap_err();
        assert!(matches!(err, LookupError::MalformedInput(_)));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_process_input_legacy() {
        let (service, _) = service(Some(good_primary()), Some(good_secondary()));
        let input = LookupInput::parse("Spirited Away\nhttps://www.imdb.com/title/tt0245429/").unwrap();
        let record = service.process_input(&input).await.unwrap();
        assert_eq!(record.source_url, "https://www.imdb.com/title/tt0245429/");
    }
}
