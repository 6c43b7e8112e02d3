/// Test helpers shared by the unit tests

use std::sync::{Arc, Mutex};
use crate::log::{self, LogEntry, LogSeverity, Logger};

/// Logger recording every entry, installed as the process-wide logger
///
/// Tests using it must be `#[serial]`.
pub struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    /// The test's handle (restores the default logger when dropped)
    owner: bool,
}

impl CaptureLogger {
    /// Install a fresh capture logger and return a handle on its entries
    pub fn install() -> Self {
        let entries = Arc::new(Mutex::new(Vec::new()));
        log::set_logger(Self { entries: Arc::clone(&entries), owner: false });
        Self { entries, owner: true }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Entries logged by `source` (tests in other threads may log concurrently)
    pub fn entries_from(&self, source: &str) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.source == source)
            .cloned()
            .collect()
    }

    /// Messages logged at `severity`
    pub fn messages(&self, severity: LogSeverity) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.severity == severity)
            .map(|entry| entry.message.clone())
            .collect()
    }

    /// Whether a warning containing `text` was logged
    pub fn has_warning(&self, text: &str) -> bool {
        self.messages(LogSeverity::Warn).iter().any(|m| m.contains(text))
    }

    pub fn count_warnings(&self, text: &str) -> usize {
        self.messages(LogSeverity::Warn).iter().filter(|m| m.contains(text)).count()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

impl Drop for CaptureLogger {
    fn drop(&mut self) {
        if self.owner {
            log::reset_logger();
        }
    }
}
