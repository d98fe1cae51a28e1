//! Lookup failures as HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reelfetch_core::LookupError;
use serde_json::json;

pub struct ApiError(LookupError);

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            LookupError::MalformedInput(_) => (StatusCode::BAD_REQUEST, "malformed_input"),
            LookupError::MergeUnavailable(e) if e.is_config() => {
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error")
            }
            LookupError::MergeUnavailable(_) => (StatusCode::BAD_GATEWAY, "upstream_unavailable"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Lookup failed");
        } else {
            tracing::warn!(status = %status, error = %self.0, "Rejected lookup input");
        }

        let body = json!({
            "error": self.0.to_string(),
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelfetch_config::ConfigError;
    use reelfetch_sources::{FetchError, FetchErrorKind, Provider};

    #[test]
    fn malformed_produces_400() {
        let response = ApiError::from(LookupError::malformed("no URL")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn provider_failure_produces_502() {
        let err = LookupError::MergeUnavailable(FetchError::new(Provider::Tmdb, FetchErrorKind::NoMatch));
        assert_eq!(ApiError::from(err).into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_key_produces_500() {
        let err = LookupError::MergeUnavailable(FetchError::new(
            Provider::Omdb,
            ConfigError::MissingKey("OMDB_API_KEY"),
        ));
        assert_eq!(
            ApiError::from(err).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
