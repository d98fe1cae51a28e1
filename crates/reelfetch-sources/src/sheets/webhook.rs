use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tracing::debug;

use crate::error::SinkError;
use crate::traits::SheetSink;

/// POSTs `{"title": ..., "date": "YYYY-MM-DD"}` to a spreadsheet webhook.
pub struct WebhookSheet {
    http: Client,
    url: String,
}

impl WebhookSheet {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }
}

#[async_trait]
impl SheetSink for WebhookSheet {
    fn sink_name(&self) -> &str {
        "webhook"
    }

    async fn append_row(&self, title: &str, date: NaiveDate) -> Result<(), SinkError> {
        let payload = serde_json::json!({
            "title": title,
            "date": date.format("%Y-%m-%d").to_string(),
        });

        let response = self.http.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(sink = "webhook", title, "Appended spreadsheet row");
        Ok(())
    }
}
