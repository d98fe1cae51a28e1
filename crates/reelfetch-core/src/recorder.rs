use chrono::Local;
use reelfetch_models::{MediaReference, MergedRecord, WatchedItem};
use reelfetch_sources::{HistorySink, SheetSink};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::token::TokenRefresher;

/// Which side effects to run for a lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordOptions {
    pub sheets: bool,
    pub history: bool,
    /// Allow the history path to refresh the credential. Left off on the
    /// request-serving path.
    pub refresh: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkStatus {
    Skipped,
    Recorded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordOutcome {
    pub sheet: SinkStatus,
    pub history: SinkStatus,
}

/// Best-effort logging of a completed lookup. Sink failures are logged and
/// reported in the outcome but never fail the lookup itself.
#[derive(Clone, Default)]
pub struct LookupRecorder {
    sheet: Option<Arc<dyn SheetSink>>,
    history: Option<(Arc<dyn HistorySink>, Arc<TokenRefresher>)>,
}

impl LookupRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: Arc<dyn SheetSink>) -> Self {
        self.sheet = Some(sheet);
        self
    }

    pub fn with_history(mut self, sink: Arc<dyn HistorySink>, refresher: Arc<TokenRefresher>) -> Self {
        self.history = Some((sink, refresher));
        self
    }

    pub async fn record(
        &self,
        record: &MergedRecord,
        reference: &MediaReference,
        options: RecordOptions,
    ) -> RecordOutcome {
        let sheet = if options.sheets {
            self.record_sheet(record).await
        } else {
            SinkStatus::Skipped
        };

        let history = if options.history {
            self.record_history(reference, options.refresh).await
        } else {
            SinkStatus::Skipped
        };

        RecordOutcome { sheet, history }
    }

    async fn record_sheet(&self, record: &MergedRecord) -> SinkStatus {
        let Some(sheet) = &self.sheet else {
            return SinkStatus::Failed("no spreadsheet is configured".to_string());
        };

        let today = Local::now().date_naive();
        match sheet.append_row(&record.title, today).await {
            Ok(()) => {
                info!(sink = sheet.sink_name(), title = %record.title, "Appended spreadsheet row");
                SinkStatus::Recorded
            }
            Err(e) => {
                error!(sink = sheet.sink_name(), title = %record.title, error = %e, "Spreadsheet append failed");
                SinkStatus::Failed(e.to_string())
            }
        }
    }

    async fn record_history(&self, reference: &MediaReference, refresh: bool) -> SinkStatus {
        let Some((sink, refresher)) = &self.history else {
            return SinkStatus::Failed("watch history is not configured".to_string());
        };

        let credential = if refresh {
            refresher.ensure_fresh().await
        } else {
            refresher.current().await
        };
        let credential = match credential {
            Ok(credential) => credential,
            Err(e) => {
                error!(imdb_id = %reference, error = %e, "No usable watch-history credential");
                return SinkStatus::Failed(e.to_string());
            }
        };

        let item = WatchedItem::now(reference.clone());
        match sink.record_watch(&credential, &item).await {
            Ok(()) => {
                info!(imdb_id = %reference, "Recorded watch history");
                SinkStatus::Recorded
            }
            Err(e) => {
                error!(imdb_id = %reference, error = %e, "Watch history append failed");
                SinkStatus::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate, Utc};
    use reelfetch_config::CredentialStore;
    use reelfetch_models::Credential;
    use reelfetch_sources::SinkError;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MemorySheet {
        rows: Mutex<Vec<(String, NaiveDate)>>,
        fail: bool,
    }

    #[async_trait]
    impl SheetSink for MemorySheet {
        fn sink_name(&self) -> &str {
            "memory"
        }

        async fn append_row(&self, title: &str, date: NaiveDate) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError::Rejected {
                    status: 500,
                    body: "quota".to_string(),
                });
            }
            self.rows.lock().unwrap().push((title.to_string(), date));
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryHistory {
        items: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl HistorySink for MemoryHistory {
        async fn record_watch(&self, credential: &Credential, item: &WatchedItem) -> Result<(), SinkError> {
            self.items
                .lock()
                .unwrap()
                .push((credential.access_token.clone(), item.reference.to_string()));
            Ok(())
        }
    }

    fn record() -> MergedRecord {
        MergedRecord {
            title: "Heat".to_string(),
            original_title: "Heat".to_string(),
            source_url: "https://www.imdb.com/title/tt0113277/".to_string(),
            year: "1995".to_string(),
            summary: "A group of professional bank robbers.".to_string(),
            foreign_title: None,
        }
    }

    fn reference() -> MediaReference {
        MediaReference::new("tt0113277").unwrap()
    }

    fn refresher(dir: &TempDir, expires_in_hours: i64) -> Arc<TokenRefresher> {
        let store = CredentialStore::new(dir.path().join("trakt_token.json"));
        store
            .save(&Credential {
                access_token: "live".to_string(),
                refresh_token: "r".to_string(),
                created_at: (Utc::now() + Duration::hours(expires_in_hours)).timestamp() - 3600,
                expires_in: 3600,
            })
            .unwrap();
        Arc::new(TokenRefresher::new(store, Duration::hours(48)))
    }

    #[tokio::test]
    async fn test_skips_when_not_requested() {
        let sheet = Arc::new(MemorySheet::default());
        let recorder = LookupRecorder::new().with_sheet(sheet.clone());

        let outcome = recorder.record(&record(), &reference(), RecordOptions::default()).await;
        assert_eq!(outcome.sheet, SinkStatus::Skipped);
        assert_eq!(outcome.history, SinkStatus::Skipped);
        assert!(sheet.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_records_both_sinks() {
        let dir = TempDir::new().unwrap();
        let sheet = Arc::new(MemorySheet::default());
        let history = Arc::new(MemoryHistory::default());
        let recorder = LookupRecorder::new()
            .with_sheet(sheet.clone())
            .with_history(history.clone(), refresher(&dir, 24 * 30));

        let options = RecordOptions {
            sheets: true,
            history: true,
            refresh: false,
        };
        let outcome = recorder.record(&record(), &reference(), options).await;

        assert_eq!(outcome.sheet, SinkStatus::Recorded);
        assert_eq!(outcome.history, SinkStatus::Recorded);
        let rows = sheet.rows.lock().unwrap();
        assert_eq!(rows[0].0, "Heat");
        assert_eq!(rows[0].1, Local::now().date_naive());
        assert_eq!(
            history.items.lock().unwrap().as_slice(),
            &[("live".to_string(), "tt0113277".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failures_are_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let sheet = Arc::new(MemorySheet {
            rows: Mutex::new(Vec::new()),
            fail: true,
        });
        let history = Arc::new(MemoryHistory::default());
        let recorder = LookupRecorder::new()
            .with_sheet(sheet)
            .with_history(history.clone(), refresher(&dir, 12));

        let options = RecordOptions {
            sheets: true,
            history: true,
            refresh: false,
        };
        let outcome = recorder.record(&record(), &reference(), options).await;

        assert!(matches!(outcome.sheet, SinkStatus::Failed(_)));
        // Credential is inside the margin and refresh is not allowed here
        assert!(matches!(outcome.history, SinkStatus::Failed(_)));
        assert!(history.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_sink_fails() {
        let recorder = LookupRecorder::new();
        let options = RecordOptions {
            sheets: true,
            history: false,
            refresh: false,
        };
        let outcome = recorder.record(&record(), &reference(), options).await;
        assert!(matches!(outcome.sheet, SinkStatus::Failed(_)));
    }
}
