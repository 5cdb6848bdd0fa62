//! Notice reporting abstraction
//!
//! The core never prints. Everything a user should see (file counts, the
//! empty-match policy message, the final upload status) goes through a
//! [`NoticeSink`] so the host decides how it is rendered.

use std::sync::Mutex;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

/// Receiver for leveled user-facing messages
pub trait NoticeSink: Send + Sync {
    fn debug(&self, message: &str);

    fn info(&self, message: &str);

    fn warning(&self, message: &str);

    /// Report a failure; the run will end with a failed status
    fn error(&self, message: &str);

    fn notice(&self, level: Level, message: &str) {
        match level {
            Level::Debug => self.debug(message),
            Level::Info => self.info(message),
            Level::Warning => self.warning(message),
            Level::Error => self.error(message),
        }
    }
}

/// Forwards notices to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NoticeSink for LogSink {
    fn debug(&self, message: &str) {
        log::debug!("{message}");
    }

    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn warning(&self, message: &str) {
        log::warn!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Keeps every notice in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices in the order they were emitted
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Messages emitted at exactly `level`
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages_at(level).iter().any(|m| m.contains(needle))
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

impl NoticeSink for MemorySink {
    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warning(&self, message: &str) {
        self.push(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.info("one");
        sink.notice(Level::Warning, "two");
        sink.error("three");

        let entries = sink.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], (Level::Info, "one".to_string()));
        assert_eq!(entries[1], (Level::Warning, "two".to_string()));
        assert!(sink.contains(Level::Error, "thr"));
        assert!(sink.messages_at(Level::Debug).is_empty());
    }
}
