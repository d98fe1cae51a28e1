use clap::ValueEnum;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use owo_colors::OwoColorize;
use reelfetch_core::{RecordOutcome, SinkStatus};
use reelfetch_models::MergedRecord;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn message(&self, kind: &str, symbol: String, msg: &str) {
        match self.format {
            OutputFormat::Human if kind == "error" => eprintln!("{} {}", symbol, msg),
            OutputFormat::Human => println!("{} {}", symbol, msg),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": kind, "message": msg }));
            }
        }
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            self.message("success", "✓".green().to_string(), msg.as_ref());
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        self.message("error", "✗".red().to_string(), msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "info", "message": msg.as_ref() }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            self.message("warning", "⚠".yellow().to_string(), msg.as_ref());
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }
        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(data).unwrap_or_default()),
            OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(data).unwrap_or_default()),
            OutputFormat::Human => println!("{}", data),
        }
    }

    /// Print a lookup result and, when any sink ran, what happened to it.
    pub fn record(&self, record: &MergedRecord, outcome: &RecordOutcome) {
        match self.format {
            OutputFormat::Human => {
                if !self.quiet {
                    println!("{}", record_table(record));
                }
                for (sink, status) in [("Spreadsheet", &outcome.sheet), ("Watch history", &outcome.history)] {
                    match status {
                        SinkStatus::Skipped => {}
                        SinkStatus::Recorded => self.success(format!("{sink}: recorded")),
                        SinkStatus::Failed(reason) => self.error(format!("{sink}: {reason}")),
                    }
                }
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                // Same shape as the HTTP response
                let value = serde_json::to_value(record).unwrap_or_default();
                self.json(&value);
            }
        }
    }
}

fn record_table(record: &MergedRecord) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(&record.title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(&record.year),
    ]);
    if record.is_foreign() {
        table.add_row(vec![Cell::new("Original title"), Cell::new(&record.original_title)]);
    }
    table.add_row(vec![Cell::new("Summary"), Cell::new(&record.summary)]);
    table.add_row(vec![Cell::new("Source"), Cell::new(&record.source_url)]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}
