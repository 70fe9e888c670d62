//! Timestamped logger for the CLI, writing to stderr or to a log file.

use anyhow::{Context, Result};
use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

pub struct CliLogger {
    level: LevelFilter,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl CliLogger {
    /// Logger writing to `log_file` when given, otherwise to stderr.
    pub fn new(level: LevelFilter, log_file: Option<&Path>) -> Result<Self> {
        let sink: Box<dyn Write + Send> = match log_file {
            Some(path) => Box::new(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?,
            ),
            None => Box::new(std::io::stderr()),
        };

        Ok(Self {
            level,
            sink: Mutex::new(sink),
        })
    }

    /// Installs the logger as the global `log` backend.
    pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
        let logger = Self::new(level, log_file)?;

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        log::debug!("logger initialized at {}", level);
        Ok(())
    }
}

/// `-v` count to level: warnings by default, then info, debug, trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn format_record(record: &Record) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!(
        "{} {} [{}] {}",
        timestamp,
        record.level(),
        record.target(),
        record.args()
    )
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_record(record);
        if let Ok(mut sink) = self.sink.lock() {
            // A failed log write must not take the command down
            let _ = writeln!(sink, "{}", line);
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.flush();
        }
    }
}
