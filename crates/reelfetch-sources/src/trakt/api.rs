use reelfetch_models::WatchedItem;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SinkError;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryCounts {
    #[serde(default)]
    pub movies: u32,
    #[serde(default)]
    pub episodes: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub added: HistoryCounts,
    #[serde(default)]
    pub not_found: serde_json::Value,
}

fn history_payload(items: &[WatchedItem]) -> serde_json::Value {
    let movies: Vec<_> = items
        .iter()
        .map(|item| {
            serde_json::json!({
                "watched_at": item.watched_at.to_rfc3339(),
                "ids": {
                    "imdb": item.reference.as_str()
                }
            })
        })
        .collect();

    serde_json::json!({ "movies": movies })
}

/// Append movies to the authenticated user's watch history.
pub async fn add_watch_history(
    client: &Client,
    api_url: &str,
    access_token: &str,
    client_id: &str,
    items: &[WatchedItem],
) -> Result<HistoryResponse, SinkError> {
    let url = format!("{}/sync/history", api_url.trim_end_matches('/'));

    let response = client
        .post(&url)
        .header("Authorization", format!("Bearer {}", access_token))
        .header("trakt-api-version", "2")
        .header("trakt-api-key", client_id)
        .header("Accept", "application/json")
        .header("Content-Type", "application/json")
        .json(&history_payload(items))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SinkError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let result: HistoryResponse = response.json().await.unwrap_or_default();
    debug!(added_movies = result.added.movies, "Trakt history updated");

    let not_found = result
        .not_found
        .get("movies")
        .and_then(|m| m.as_array())
        .map(|m| m.len())
        .unwrap_or(0);
    if not_found > 0 {
        warn!(not_found, "Trakt did not recognise some history items");
    }

    Ok(result)
}
