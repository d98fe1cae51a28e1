use async_trait::async_trait;
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::SinkError;
use crate::traits::SheetSink;

/// Appends rows to a local CSV file, writing a header when the file is new.
pub struct CsvSheet {
    path: PathBuf,
    // Serializes appends so concurrent lookups never interleave rows
    lock: Mutex<()>,
}

impl CsvSheet {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_blocking(&self, title: &str, date: NaiveDate) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let is_new = std::fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(["title", "date"])?;
        }
        let date = date.format("%Y-%m-%d").to_string();
        writer.write_record([title, date.as_str()])?;
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl SheetSink for CsvSheet {
    fn sink_name(&self) -> &str {
        "csv"
    }

    async fn append_row(&self, title: &str, date: NaiveDate) -> Result<(), SinkError> {
        let _guard = self.lock.lock().await;
        self.append_blocking(title, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_appends_with_single_header() {
        let dir = TempDir::new().unwrap();
        let sheet = CsvSheet::new(dir.path().join("sheets").join("watched.csv"));
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();

        sheet.append_row("Spirited Away", date).await.unwrap();
        sheet.append_row("Heat, Director's Cut", date).await.unwrap();

        let content = std::fs::read_to_string(sheet.path()).unwrap();
        assert_eq!(
            content,
            "title,date\nSpirited Away,2024-05-17\n\"Heat, Director's Cut\",2024-05-17\n"
        );
    }
}
