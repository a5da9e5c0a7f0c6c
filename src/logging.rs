use anyhow::{Context, Result};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Flash message for TUI display
#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub level: Level,
    pub message: String,
    pub timestamp: Instant,
}

/// Writes to a rolling log file and forwards periodr's own warnings to the TUI
struct PeriodrLogger {
    file_writer: Arc<Mutex<RollingFileAppender>>,
    flash_tx: Option<Arc<Mutex<Sender<FlashMessage>>>>,
    file_level: LevelFilter,
    flash_level: LevelFilter,
}

impl PeriodrLogger {
    fn new(
        log_file_path: &Path,
        flash_tx: Option<Sender<FlashMessage>>,
        file_level: LevelFilter,
        flash_level: LevelFilter,
    ) -> Result<Self> {
        let log_dir = log_file_path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Invalid log file path {:?}", log_file_path))?;
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;

        // No size-based rotation in tracing-appender: daily, 3 files kept
        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(3)
            .filename_prefix(
                log_file_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("periodr"),
            )
            .filename_suffix(
                log_file_path
                    .extension()
                    .and_then(|s| s.to_str())
                    .unwrap_or("log"),
            )
            .build(log_dir)
            .context("Failed to create rotating file appender")?;

        Ok(PeriodrLogger {
            file_writer: Arc::new(Mutex::new(file_appender)),
            flash_tx: flash_tx.map(|tx| Arc::new(Mutex::new(tx))),
            file_level,
            flash_level,
        })
    }

    fn max_level(&self) -> LevelFilter {
        self.file_level.max(self.flash_level)
    }

    fn write_line(&self, level: Level, target: &str, message: &str) {
        if let Ok(mut writer) = self.file_writer.lock() {
            let _ = writeln!(
                writer,
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                level,
                target,
                message
            );
        }
    }

    /// Only records from this crate reach the screen; dependency noise stays in the file
    fn flash(&self, level: Level, target: &str, message: String) {
        if !target.starts_with(env!("CARGO_CRATE_NAME")) {
            return;
        }
        let Some(tx) = &self.flash_tx else {
            return;
        };
        if let Ok(tx) = tx.lock() {
            // Receiver gone means the TUI has exited
            let _ = tx.send(FlashMessage {
                level,
                message,
                timestamp: Instant::now(),
            });
        }
    }
}

impl Log for PeriodrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = record.args().to_string();
        let level = record.level();

        if level <= self.file_level {
            self.write_line(level, record.target(), &message);
        }
        if level <= self.flash_level {
            self.flash(level, record.target(), message);
        }
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.file_writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Parse a config level string; unknown values fall back to info
pub fn parse_level(level_str: &str) -> LevelFilter {
    match level_str.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Install the file + flash logger as the global logger (TUI mode only)
pub fn init_logger(
    log_file_path: &Path,
    flash_tx: Option<Sender<FlashMessage>>,
    file_level: &str,
    flash_level: &str,
) -> Result<()> {
    let logger = PeriodrLogger::new(
        log_file_path,
        flash_tx,
        parse_level(file_level),
        parse_level(flash_level),
    )?;
    let max_level = logger.max_level();

    log::set_boxed_logger(Box::new(logger)).context("Failed to set global logger")?;
    log::set_max_level(max_level);

    Ok(())
}
