//! OMDb client: the plot-oriented metadata provider.
//!
//! `GET {base_url}/?apikey=<key>&i=<imdb id>` returns a flat JSON object with
//! capitalized keys. OMDb signals lookup failures with a 200 response carrying
//! `"Response": "False"` and an `Error` message.

use async_trait::async_trait;
use reelfetch_config::OmdbConfig;
use reelfetch_models::{MediaReference, PrimaryMetadata};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::error::{FetchError, FetchErrorKind, Provider};
use crate::traits::PrimaryProvider;

const PROVIDER: Provider = Provider::Omdb;

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    http: Client,
    config: OmdbConfig,
}

impl OmdbClient {
    pub fn new(http: Client, config: OmdbConfig) -> Self {
        Self { http, config }
    }

    pub async fn fetch(&self, reference: &MediaReference) -> Result<PrimaryMetadata, FetchError> {
        let api_key = self.config.api_key().map_err(|e| FetchError::new(PROVIDER, e))?;
        let url = format!("{}/", self.config.base_url.trim_end_matches('/'));

        debug!(provider = %PROVIDER, imdb_id = %reference, "Fetching primary metadata");

        let response = self
            .http
            .get(&url)
            .query(&[("apikey", api_key), ("i", reference.as_str())])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::transport(PROVIDER, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::new(PROVIDER, FetchErrorKind::Status { status, body }));
        }

        let body: OmdbResponse = response
            .json()
            .await
            .map_err(|e| FetchError::malformed(PROVIDER, e.to_string()))?;

        parse_response(body, reference)
    }
}

#[async_trait]
impl PrimaryProvider for OmdbClient {
    async fn fetch_primary(&self, reference: &MediaReference) -> Result<PrimaryMetadata, FetchError> {
        self.fetch(reference).await
    }
}

fn parse_response(body: OmdbResponse, reference: &MediaReference) -> Result<PrimaryMetadata, FetchError> {
    if body.response.as_deref() == Some("False") {
        let message = body.error.unwrap_or_else(|| "unknown error".to_string());
        return Err(FetchError::new(PROVIDER, FetchErrorKind::Rejected(message)));
    }

    let title = body
        .title
        .ok_or_else(|| FetchError::malformed(PROVIDER, "missing Title"))?;
    let year = body
        .year
        .ok_or_else(|| FetchError::malformed(PROVIDER, "missing Year"))?;

    let plot = match body.plot {
        Some(plot) if plot == "N/A" => {
            warn!(provider = %PROVIDER, imdb_id = %reference, "Plot reported as N/A");
            None
        }
        Some(plot) => Some(plot),
        None => {
            // Degrade rather than fail; operators need to see this though.
            error!(
                severity = "critical",
                provider = %PROVIDER,
                imdb_id = %reference,
                "Primary metadata response has no Plot field"
            );
            None
        }
    };

    Ok(PrimaryMetadata { title, year, plot })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reference() -> MediaReference {
        MediaReference::new("tt0111161").unwrap()
    }

    fn client_for(server: &MockServer, api_key: Option<&str>) -> OmdbClient {
        OmdbClient::new(
            Client::new(),
            OmdbConfig {
                api_key: api_key.map(str::to_string),
                base_url: server.uri(),
            },
        )
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("apikey", "secret"))
            .and(query_param("i", "tt0111161"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Title": "The Shawshank Redemption",
                "Year": "1994",
                "Plot": "Two imprisoned men bond over a number of years.",
                "Response": "True"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let metadata = client_for(&server, Some("secret")).fetch(&reference()).await.unwrap();
        assert_eq!(metadata.title, "The Shawshank Redemption");
        assert_eq!(metadata.year, "1994");
        assert_eq!(metadata.plot.as_deref(), Some("Two imprisoned men bond over a number of years."));
    }

    #[tokio::test]
    async fn test_missing_plot_degrades() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Title": "Obscure Short",
                "Year": "1921",
                "Response": "True"
            })))
            .mount(&server)
            .await;

        let metadata = client_for(&server, Some("secret")).fetch(&reference()).await.unwrap();
        assert_eq!(metadata.title, "Obscure Short");
        assert!(metadata.plot.is_none());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        /// Run `f` with a JSON subscriber installed and return the events it logged.
        fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<serde_json::Value>) {
            let logs = CapturedLogs::default();
            let writer = logs.clone();
            let subscriber = tracing_subscriber::fmt()
                .json()
                .with_max_level(tracing::Level::TRACE)
                .with_writer(move || writer.clone())
                .finish();

            let result = tracing::subscriber::with_default(subscriber, f);
            let raw = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
            let events = raw.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
            (result, events)
        }
    }

    fn is_critical(event: &serde_json::Value) -> bool {
        event["level"] == "ERROR" && event["fields"]["severity"] == "critical"
    }

    #[test]
    fn test_missing_plot_logs_critical() {
        let body: OmdbResponse =
            serde_json::from_value(json!({"Title": "Obscure Short", "Year": "1921", "Response": "True"})).unwrap();

        let (metadata, events) = CapturedLogs::capture(|| parse_response(body, &reference()));

        assert!(metadata.unwrap().plot.is_none());
        let critical: Vec<_> = events.iter().filter(|e| is_critical(e)).collect();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0]["fields"]["imdb_id"], "tt0111161");
    }

    #[test]
    fn test_na_plot_is_only_a_warning() {
        let body: OmdbResponse =
            serde_json::from_value(json!({"Title": "Obscure Short", "Year": "1921", "Plot": "N/A"})).unwrap();

        let (metadata, events) = CapturedLogs::capture(|| parse_response(body, &reference()));

        assert!(metadata.unwrap().plot.is_none());
        assert!(!events.iter().any(is_critical));
        assert!(events.iter().any(|e| e["level"] == "WARN"));
    }

    #[tokio::test]
    async fn test_missing_year_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Title": "No Year",
                "Plot": "Something happens."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, Some("secret")).fetch(&reference()).await.unwrap_err();
        assert_eq!(err.provider, Provider::Omdb);
        assert!(matches!(err.kind, FetchErrorKind::Malformed(_)));
    }

    #[tokio::test]
    async fn test_provider_error_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Response": "False",
                "Error": "Incorrect IMDb ID."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, Some("secret")).fetch(&reference()).await.unwrap_err();
        match err.kind {
            FetchErrorKind::Rejected(message) => assert_eq!(message, "Incorrect IMDb ID."),
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key!"))
            .mount(&server)
            .await;

        let err = client_for(&server, Some("secret")).fetch(&reference()).await.unwrap_err();
        assert!(matches!(err.kind, FetchErrorKind::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server, None).fetch(&reference()).await.unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_na_plot_is_absent() {
        let body = OmdbResponse {
            title: Some("T".to_string()),
            year: Some("2000".to_string()),
            plot: Some("N/A".to_string()),
            response: Some("True".to_string()),
            error: None,
        };
        assert!(parse_response(body, &reference()).unwrap().plot.is_none());
    }
}
