//! Run inputs
//!
//! The settings an upload run is driven by, independent of where they came
//! from (CLI flags, config file, CI environment).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::Result;
use crate::error::ValidationError;
use crate::planner::{ArtifactMode, SearchPathGroup};
use crate::policy::{NoFilesFoundAction, PolicyConfig};
use crate::search::pattern::EXCLUDE_PREFIX;

/// Default artifact name when none is configured
pub const DEFAULT_ARTIFACT_NAME: &str = "artifact";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadInputs {
    /// Name of the combined artifact; ignored in individual mode
    pub artifact_name: String,
    /// Upload each search path as its own artifact
    pub individual: bool,
    /// Search path lines; `!` lines are exclusions
    pub search_path: Vec<String>,
    pub if_no_files_found: NoFilesFoundAction,
    pub retention_days: Option<u32>,
    /// Directory relative search paths are resolved against
    pub working_directory: PathBuf,
}

impl UploadInputs {
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
            individual: false,
            search_path: Vec::new(),
            if_no_files_found: NoFilesFoundAction::default(),
            retention_days: None,
            working_directory: working_directory.into(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.artifact_name = name.to_string();
        self
    }

    pub fn with_individual(mut self, individual: bool) -> Self {
        self.individual = individual;
        self
    }

    /// Append search path lines; multi-line strings are split on newlines
    pub fn with_search_path<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for text in paths {
            self.search_path.extend(split_search_path(text.as_ref()));
        }
        self
    }

    pub fn with_if_no_files_found(mut self, action: NoFilesFoundAction) -> Self {
        self.if_no_files_found = action;
        self
    }

    pub fn with_retention_days(mut self, days: Option<u32>) -> Self {
        self.retention_days = days;
        self
    }

    /// Check the inputs before any filesystem work happens
    pub fn validate(&self) -> Result<()> {
        if !self.search_path.iter().any(|line| !is_exclusion(line)) {
            return Err(ValidationError::missing_field("path").into());
        }

        if !self.individual && self.artifact_name.trim().is_empty() {
            return Err(ValidationError::invalid_parameter(
                "name",
                "must not be empty unless individual artifacts are requested",
            )
            .into());
        }

        if self.retention_days == Some(0) {
            return Err(
                ValidationError::invalid_parameter("retention-days", "must be positive").into(),
            );
        }

        Ok(())
    }

    pub fn mode(&self) -> ArtifactMode {
        if self.individual {
            ArtifactMode::Individual
        } else {
            ArtifactMode::Combined {
                name: self.artifact_name.clone(),
            }
        }
    }

    /// Group the search path lines for planning
    ///
    /// Combined mode searches all lines together. Individual mode makes one
    /// group per include line, each carrying every exclusion line.
    pub fn groups(&self) -> Vec<SearchPathGroup> {
        if !self.individual {
            return vec![SearchPathGroup::new(self.search_path.iter().cloned())];
        }

        let exclusions: Vec<&String> = self
            .search_path
            .iter()
            .filter(|line| is_exclusion(line))
            .collect();

        self.search_path
            .iter()
            .filter(|line| !is_exclusion(line))
            .map(|include| {
                SearchPathGroup::new(
                    std::iter::once(include)
                        .chain(exclusions.iter().copied())
                        .cloned(),
                )
            })
            .collect()
    }

    pub fn policy(&self) -> PolicyConfig {
        PolicyConfig {
            if_no_files_found: self.if_no_files_found,
            retention_days: self.retention_days,
        }
    }
}

/// Split a multi-line search path into trimmed, non-empty lines
pub fn split_search_path(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_exclusion(line: &str) -> bool {
    line.trim_start().starts_with(EXCLUDE_PREFIX)
}
