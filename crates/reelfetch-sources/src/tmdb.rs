//! TMDB client: the canonical-title metadata provider.
//!
//! Uses the `find` endpoint keyed on the external IMDb id, which returns
//! candidate lists per media kind. Only `movie_results` is consulted.

use async_trait::async_trait;
use reelfetch_config::TmdbConfig;
use reelfetch_models::{MediaReference, SecondaryMetadata};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{FetchError, FetchErrorKind, Provider};
use crate::traits::SecondaryProvider;

const PROVIDER: Provider = Provider::Tmdb;

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    movie_results: Vec<FindMovie>,
}

#[derive(Debug, Deserialize)]
struct FindMovie {
    title: Option<String>,
    original_title: Option<String>,
    overview: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(http: Client, config: TmdbConfig) -> Self {
        Self { http, config }
    }

    pub async fn find(&self, reference: &MediaReference) -> Result<SecondaryMetadata, FetchError> {
        let api_key = self.config.api_key().map_err(|e| FetchError::new(PROVIDER, e))?;
        let url = format!(
            "{}/3/find/{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(reference.as_str())
        );

        debug!(provider = %PROVIDER, imdb_id = %reference, "Fetching secondary metadata");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", api_key),
                ("language", self.config.language.as_str()),
                ("external_source", "imdb_id"),
            ])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::new(PROVIDER, FetchErrorKind::Status { status, body }));
        }

        let body: FindResponse = response
            .json()
            .await
            .map_err(|e| FetchError::malformed(PROVIDER, e.to_string()))?;

        first_candidate(body)
    }
}

#[async_trait]
impl SecondaryProvider for TmdbClient {
    async fn fetch_secondary(&self, reference: &MediaReference) -> Result<SecondaryMetadata, FetchError> {
        self.find(reference).await
    }
}

fn first_candidate(body: FindResponse) -> Result<SecondaryMetadata, FetchError> {
    let movie = body
        .movie_results
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::new(PROVIDER, FetchErrorKind::NoMatch))?;

    let title = movie
        .title
        .ok_or_else(|| FetchError::malformed(PROVIDER, "missing title"))?;
    let original_title = movie
        .original_title
        .ok_or_else(|| FetchError::malformed(PROVIDER, "missing original_title"))?;
    // TMDB sends "" rather than null when it has no overview
    let overview = movie.overview.filter(|o| !o.trim().is_empty());

    Ok(SecondaryMetadata {
        title,
        original_title,
        overview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reference() -> MediaReference {
        MediaReference::new("tt0245429").unwrap()
    }

    fn client_for(server: &MockServer) -> TmdbClient {
        TmdbClient::new(
            Client::new(),
            TmdbConfig {
                api_key: Some("tmdb-key".to_string()),
                base_url: server.uri(),
                language: "en-US".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_find_takes_first_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/find/tt0245429"))
            .and(query_param("api_key", "tmdb-key"))
            .and(query_param("language", "en-US"))
            .and(query_param("external_source", "imdb_id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "movie_results": [
                    {
                        "id": 129,
                        "title": "Spirited Away",
                        "original_title": "千と千尋の神隠し",
                        "overview": "A young girl wanders into a world ruled by gods."
                    },
                    {
                        "id": 1,
                        "title": "Second",
                        "original_title": "Second",
                        "overview": "Ignored."
                    }
                ],
                "tv_results": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let metadata = client_for(&server).find(&reference()).await.unwrap();
        assert_eq!(metadata.title, "Spirited Away");
        assert_eq!(metadata.original_title, "千と千尋の神隠し");
        assert_eq!(metadata.overview.as_deref(), Some("A young girl wanders into a world ruled by gods."));
    }

    #[tokio::test]
    async fn test_empty_results_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "movie_results": [],
                "person_results": []
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).find(&reference()).await.unwrap_err();
        assert_eq!(err.provider, Provider::Tmdb);
        assert!(matches!(err.kind, FetchErrorKind::NoMatch));
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).find(&reference()).await.unwrap_err();
        assert!(matches!(err.kind, FetchErrorKind::Status { status: 503, .. }));
    }

    #[test]
    fn test_blank_overview_is_absent() {
        let body: FindResponse = serde_json::from_value(json!({
            "movie_results": [{"title": "A", "original_title": "A", "overview": ""}]
        }))
        .unwrap();
        assert!(first_candidate(body).unwrap().overview.is_none());
    }

    #[test]
    fn test_missing_original_title_is_error() {
        let body: FindResponse = serde_json::from_value(json!({
            "movie_results": [{"title": "A"}]
        }))
        .unwrap();
        assert!(matches!(first_candidate(body).unwrap_err().kind, FetchErrorKind::Malformed(_)));
    }
}
