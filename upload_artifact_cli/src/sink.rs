//! Notice sink for the terminal and CI runners
//!
//! Under GitHub Actions notices become workflow commands so warnings and
//! errors show up as annotations. Elsewhere they are printed to stderr,
//! coloured when stderr is a terminal.

use colored::*;
use std::io::{self, Write};
use std::sync::Mutex;
use upload_artifact_core::notice::{Level, NoticeSink};

use crate::terminal;

/// How notices are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStyle {
    /// `::warning::…` workflow commands
    GithubActions,
    Color,
    Plain,
}

impl SinkStyle {
    /// Pick the style for the current process
    pub fn detect() -> Self {
        if terminal::is_github_actions() {
            Self::GithubActions
        } else if terminal::stderr_supports_color() {
            Self::Color
        } else {
            Self::Plain
        }
    }
}

pub struct WorkflowSink {
    style: SinkStyle,
    out: Mutex<Box<dyn Write + Send>>,
}

impl WorkflowSink {
    /// Sink writing to stderr in the detected style
    pub fn new() -> Self {
        Self::with_writer(SinkStyle::detect(), Box::new(io::stderr()))
    }

    pub fn with_writer(style: SinkStyle, out: Box<dyn Write + Send>) -> Self {
        Self {
            style,
            out: Mutex::new(out),
        }
    }

    pub fn style(&self) -> SinkStyle {
        self.style
    }

    fn emit(&self, level: Level, message: &str) {
        if level == Level::Debug && self.style != SinkStyle::GithubActions {
            log::debug!("{message}");
            return;
        }

        let Some(line) = format_line(self.style, level, message) else {
            return;
        };
        if let Ok(mut out) = self.out.lock() {
            // Nothing sensible to do if stderr is gone
            let _ = writeln!(out, "{line}");
        }
    }
}

impl Default for WorkflowSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeSink for WorkflowSink {
    fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn warning(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }
}

/// Render one notice; `None` when the style drops it
pub fn format_line(style: SinkStyle, level: Level, message: &str) -> Option<String> {
    match style {
        SinkStyle::GithubActions => Some(match level {
            Level::Debug => format!("::debug::{}", escape_data(message)),
            Level::Info => message.to_string(),
            Level::Warning => format!("::warning::{}", escape_data(message)),
            Level::Error => format!("::error::{}", escape_data(message)),
        }),
        SinkStyle::Color => match level {
            Level::Debug => None,
            Level::Info => Some(message.to_string()),
            Level::Warning => Some(format!("{} {message}", "warning:".yellow().bold())),
            Level::Error => Some(format!("{} {message}", "error:".red().bold())),
        },
        SinkStyle::Plain => match level {
            Level::Debug => None,
            Level::Info => Some(message.to_string()),
            Level::Warning => Some(format!("warning: {message}")),
            Level::Error => Some(format!("error: {message}")),
        },
    }
}

/// Escape a workflow command payload so newlines survive
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
