mod formatters;

pub use formatters::{JsonFormatter, TextFormatter};

use anyhow::Result;
use upload_artifact_core::{PreviewEntry, RunReport};

/// Output format enumeration
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Formatter for this format
    pub fn formatter(self, use_color: bool) -> Box<dyn OutputFormatter> {
        match self {
            Self::Text => Box::new(TextFormatter::new(use_color)),
            Self::Json => Box::new(JsonFormatter::new(true)),
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format what a plan would upload
    fn format_preview(&self, entries: &[PreviewEntry]) -> Result<String>;

    /// Format the outcome of an upload run
    fn format_report(&self, report: &RunReport) -> Result<String>;
}
