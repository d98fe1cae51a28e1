use async_trait::async_trait;
use reelfetch_config::TraktConfig;
use reelfetch_models::{Credential, WatchedItem};
use reqwest::Client;
use tracing::info;

use crate::error::SinkError;
use crate::traits::HistorySink;
use crate::trakt::api;

/// Watch-history writer for Trakt.
#[derive(Clone)]
pub struct TraktClient {
    client: Client,
    config: TraktConfig,
}

impl TraktClient {
    pub fn new(client: Client, config: TraktConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl HistorySink for TraktClient {
    async fn record_watch(&self, credential: &Credential, item: &WatchedItem) -> Result<(), SinkError> {
        let client_id = self.config.client_id()?;
        let result = api::add_watch_history(
            &self.client,
            &self.config.api_url,
            &credential.access_token,
            client_id,
            std::slice::from_ref(item),
        )
        .await?;

        info!(
            operation = "trakt_history",
            imdb_id = %item.reference,
            added = result.added.movies,
            "Recorded watch in Trakt history"
        );
        Ok(())
    }
}
