//! Tracking-spreadsheet sinks.
//!
//! Every lookup can be appended as a `title, date` row, either to a local
//! CSV file or by POSTing to a webhook that fronts a hosted spreadsheet.

mod csv_file;
mod webhook;

pub use csv_file::CsvSheet;
pub use webhook::WebhookSheet;

use reelfetch_config::SheetsConfig;
use reqwest::Client;
use std::sync::Arc;

use crate::traits::SheetSink;

/// Build the configured sink, if any.
pub fn from_config(config: Option<&SheetsConfig>, http: Client) -> Option<Arc<dyn SheetSink>> {
    match config? {
        SheetsConfig::Csv { path } => Some(Arc::new(CsvSheet::new(path.clone()))),
        SheetsConfig::Webhook { url } => Some(Arc::new(WebhookSheet::new(http, url.clone()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_config() {
        assert!(from_config(None, Client::new()).is_none());

        let csv = SheetsConfig::Csv { path: PathBuf::from("/tmp/w.csv") };
        assert_eq!(from_config(Some(&csv), Client::new()).unwrap().sink_name(), "csv");

        let hook = SheetsConfig::Webhook { url: "https://example.com".to_string() };
        assert_eq!(from_config(Some(&hook), Client::new()).unwrap().sink_name(), "webhook");
    }
}
