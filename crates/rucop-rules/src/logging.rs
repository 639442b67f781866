//! Logging module for the autocorrect engine
//!
//! Records pass boundaries, edit-conflict deferrals, and round-trip
//! verification failures for debugging and verification purposes.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<EngineLogger>> = Mutex::new(None);

/// Logger for engine operations
pub struct EngineLogger {
    file: File,
}

impl EngineLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self { file })
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }
}

/// Initialize the global logger
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("/tmp/rucop-engine-{}.log", timestamp))
    });

    let logger = EngineLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

/// Log a message to the global logger
pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(message);
        }
    }
}

/// Check if logging is enabled
pub fn is_enabled() -> bool {
    if let Ok(guard) = LOGGER.lock() {
        guard.is_some()
    } else {
        false
    }
}

/// Log the start of an autocorrect pass
pub fn log_pass_start(pass: usize) {
    log(&format!("--- pass {} ---", pass));
}

/// Log a deferred plan whose edits conflict with an accepted plan
pub fn log_conflict(cop_name: &str) {
    log(&format!(
        "Deferred correction from {}: edits conflict with an earlier plan",
        cop_name
    ));
}

/// Log a plan rejected because its output failed to re-parse
pub fn log_verify_failure(cop_name: &str) {
    log(&format!(
        "Rejected correction from {}: corrected text failed to re-parse",
        cop_name
    ));
}
