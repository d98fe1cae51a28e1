use anyhow::Result;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc, writer::BoxMakeWriter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// 0 = info, 1 = debug with hyper's connection chatter suppressed, 2+ = trace.
/// `RUST_LOG` wins unless `quiet` is set.
fn filter_directive(verbose_level: u8, quiet: bool) -> Option<&'static str> {
    if quiet {
        return Some("error");
    }
    match verbose_level {
        0 => None,
        1 => Some("debug,hyper::proto::h1=warn,hyper::client::pool=warn"),
        _ => Some("trace"),
    }
}

fn build_filter(verbose_level: u8, quiet: bool) -> EnvFilter {
    match filter_directive(verbose_level, quiet) {
        Some("error") => EnvFilter::new("error"),
        Some(directive) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// `reelfetch.log` rotates as `reelfetch.<date>`.
fn rotation_prefix(log_path: &Path) -> Result<(PathBuf, String)> {
    let dir = log_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
    let filename = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;
    let prefix = filename.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(filename);
    Ok((dir.to_path_buf(), prefix.to_string()))
}

pub fn init_logging(verbose_level: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let filter = build_filter(verbose_level, quiet);

    let json = std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or_else(|_| !io::stdout().is_terminal());

    let (writer, ansi) = match log_file {
        Some(log_path) => {
            let (dir, prefix) = rotation_prefix(&log_path)?;
            std::fs::create_dir_all(&dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, prefix);
            (BoxMakeWriter::new(appender), false)
        }
        None => (BoxMakeWriter::new(io::stderr), io::stderr().is_terminal()),
    };

    let registry = Registry::default().with(filter);

    if json {
        let json_layer = fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer);
        registry.with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(ansi)
            .with_writer(writer);
        registry.with(fmt_layer).init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(0, false), None);
        assert_eq!(filter_directive(3, true), Some("error"));
        assert_eq!(filter_directive(2, false), Some("trace"));
        assert!(filter_directive(1, false).unwrap().starts_with("debug"));
    }

    #[test]
    fn test_rotation_prefix() {
        let (dir, prefix) = rotation_prefix(Path::new("/var/log/reelfetch/reelfetch.log")).unwrap();
        assert_eq!(dir, PathBuf::from("/var/log/reelfetch"));
        assert_eq!(prefix, "reelfetch");

        let (_, prefix) = rotation_prefix(Path::new("logs/server")).unwrap();
        assert_eq!(prefix, "server");
    }
}
