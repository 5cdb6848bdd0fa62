//! Pattern expansion and root resolution errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// A search path could not be compiled as a glob
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The matched paths do not share any ancestor (e.g. different drives)
    #[error("No common root directory for: {}", format_paths(paths))]
    NoCommonRoot { paths: Vec<PathBuf> },
}

impl SearchError {
    pub fn invalid_pattern(pattern: &str, reason: &str) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn no_common_root(paths: Vec<PathBuf>) -> Self {
        Self::NoCommonRoot { paths }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
