//! Log capture module.
//!
//! The engine logs through the `log` facade. Hosts that draw their own UI can
//! install `CaptureLogger` to receive formatted log lines through a callback
//! and show them wherever they like.

use crate::error::{FormitaError, FormitaResult};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Arc, Mutex};

type LogCallback = Box<dyn Fn(String) + Send + Sync>;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Logger that forwards formatted records to a callback
///
pub struct CaptureLogger {
    max_level: LevelFilter,
    log_callback: Arc<Mutex<Option<LogCallback>>>,
}

impl CaptureLogger {
    pub fn new(max_level: LevelFilter) -> Self {
        CaptureLogger {
            max_level,
            log_callback: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_log_callback(&self, callback: LogCallback) {
        if let Ok(mut guard) = self.log_callback.lock() {
            *guard = Some(callback);
        }
        // A poisoned lock only means lines are not captured
    }

    /// Register as the global logger. Fails if a logger is already set.
    ///
    pub fn install(self) -> FormitaResult<()> {
        let max_level = self.max_level;
        log::set_logger(Box::leak(Box::new(self)))
            .map_err(|e| FormitaError::Logger(e.to_string()))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(callback) = self.log_callback.lock() {
                if let Some(ref cb) = *callback {
                    cb(format_log(record));
                }
            }
        }
    }

    fn flush(&self) {}
}
