use super::{http_client, load_config, token_refresher};
use crate::output::Output;
use color_eyre::Result;
use reelfetch_config::{Config, PathManager};
use reelfetch_core::{LookupInput, LookupRecorder, LookupService, RecordOptions};
use reelfetch_sources::{sheets, CsvSheet, SheetSink, TraktClient};
use reqwest::Client;
use std::sync::Arc;

/// The configured spreadsheet, or a CSV file in the data directory.
pub fn sheet_sink(paths: &PathManager, config: &Config, http: Client) -> Arc<dyn SheetSink> {
    sheets::from_config(config.sheets.as_ref(), http)
        .unwrap_or_else(|| Arc::new(CsvSheet::new(paths.default_sheet_file())))
}

pub async fn run_lookup(raw: &str, log_sheets: bool, log_trakt: bool, output: &Output) -> Result<()> {
    tracing::debug!(sheets = log_sheets, trakt = log_trakt, "Lookup command started");

    let paths = PathManager::default();
    let config = load_config(&paths)?;
    let http = http_client(&config)?;

    let input = LookupInput::parse(raw)?;
    let reference = input.reference()?;

    let service = LookupService::from_config(&config, http.clone());
    let record = service.process_reference(&reference, input.url()).await?;

    let mut recorder = LookupRecorder::new();
    if log_sheets {
        recorder = recorder.with_sheet(sheet_sink(&paths, &config, http.clone()));
    }
    if log_trakt {
        // Operator is present, so an expiring token may be refreshed here
        let refresher = token_refresher(&paths, &config, http.clone(), true);
        let sink = TraktClient::new(http, config.trakt.clone());
        recorder = recorder.with_history(Arc::new(sink), Arc::new(refresher));
    }

    let options = RecordOptions {
        sheets: log_sheets,
        history: log_trakt,
        refresh: true,
    };
    let outcome = recorder.record(&record, &reference, options).await;

    output.record(&record, &outcome);
    Ok(())
}
