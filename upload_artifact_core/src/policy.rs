//! Upload policy
//!
//! Decides what happens to a planned artifact: skip it, fail it, or build the
//! request for the upload collaborator. Also classifies what the collaborator
//! reported back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::Result;
use crate::error::ValidationError;
use crate::notice::NoticeSink;
use crate::planner::{NameSource, PlannedArtifact};
use crate::upload::UploadResponse;

/// Above this many files an advisory about pre-archiving is emitted
pub const LARGE_ARTIFACT_FILE_COUNT: usize = 10_000;

/// What to do when a search path matched nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoFilesFoundAction {
    /// Output a warning but do not fail
    #[default]
    Warn,
    /// Fail the run
    Error,
    /// Stay quiet; the run does not fail
    Ignore,
}

impl NoFilesFoundAction {
    pub const VARIANTS: &'static [&'static str] = &["warn", "error", "ignore"];

    /// Outcome for an empty search result
    pub fn outcome(self, label: &str) -> Outcome {
        let message = no_files_message(label);
        match self {
            Self::Warn | Self::Ignore => Outcome::Skip(message),
            Self::Error => Outcome::Fail(message),
        }
    }

    /// Emit the message for an empty search result at this action's level
    pub fn report(self, message: &str, sink: &dyn NoticeSink) {
        match self {
            Self::Warn => sink.warning(message),
            Self::Error => sink.error(message),
            Self::Ignore => sink.info(message),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for NoFilesFoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoFilesFoundAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "ignore" => Ok(Self::Ignore),
            other => Err(ValidationError::invalid_parameter(
                "if-no-files-found",
                &format!(
                    "unrecognized value '{other}'. Available options: {}",
                    Self::VARIANTS.join(", ")
                ),
            )),
        }
    }
}

pub fn no_files_message(label: &str) -> String {
    format!("No files were found with the provided path: {label}. No artifacts will be uploaded.")
}

/// Settings the policy needs from the run configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyConfig {
    pub if_no_files_found: NoFilesFoundAction,
    pub retention_days: Option<u32>,
}

/// Everything the upload collaborator needs for one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRequest {
    pub artifact_name: String,
    pub files: Vec<PathBuf>,
    pub root: PathBuf,
    pub retention_days: Option<u32>,
}

/// Decision for one planned artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing matched and the action tolerates it
    Skip(String),
    /// The artifact failed; the run will report failure
    Fail(String),
    /// Hand the request to the uploader
    Proceed(UploadRequest),
}

/// Final state of one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum ArtifactStatus {
    Skipped,
    Uploaded,
    Failed(String),
}

impl ArtifactStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Evaluate a planned artifact against the policy, emitting the branch notices
pub fn resolve(
    planned: &PlannedArtifact,
    config: &PolicyConfig,
    sink: &dyn NoticeSink,
) -> Result<Outcome> {
    let result = &planned.result;

    if result.is_empty() {
        let outcome = config.if_no_files_found.outcome(&planned.label);
        if let Outcome::Skip(message) | Outcome::Fail(message) = &outcome {
            config.if_no_files_found.report(message, sink);
        }
        return Ok(outcome);
    }

    let count = result.files_to_upload.len();
    let plural = if count == 1 { "" } else { "s" };
    sink.info(&format!(
        "With the provided path, there will be {count} file{plural} uploaded"
    ));

    let root = result
        .root_directory
        .clone()
        .ok_or_else(|| ValidationError::missing_field("root directory"))?;
    sink.debug(&format!("Root artifact directory is {}", root.display()));

    if count > LARGE_ARTIFACT_FILE_COUNT {
        sink.warning(
            "There are over 10,000 files in this artifact, consider creating an archive before upload to improve the upload performance.",
        );
    }

    match planned.name_source {
        NameSource::RootDirectory => {
            sink.info("Using the root directory of the individual path as the artifact name.")
        }
        NameSource::FileName => {
            sink.info("Using the name of the individual file as the artifact name.")
        }
        NameSource::Configured => {}
    }

    let artifact_name = planned
        .name
        .clone()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ValidationError::missing_field("artifact name"))?;

    Ok(Outcome::Proceed(UploadRequest {
        artifact_name,
        files: result.files_to_upload.clone(),
        root,
        retention_days: config.retention_days,
    }))
}

/// Classify what the uploader reported for `artifact_name`
pub fn classify(
    artifact_name: &str,
    response: &UploadResponse,
    sink: &dyn NoticeSink,
) -> ArtifactStatus {
    let failed = response.failed_items.len();
    if failed > 0 {
        let message = format!(
            "An error was encountered when uploading {artifact_name}. There were {failed} items that failed to upload."
        );
        sink.error(&message);
        ArtifactStatus::Failed(message)
    } else {
        sink.info(&format!(
            "Artifact {artifact_name} has been successfully uploaded!"
        ));
        ArtifactStatus::Uploaded
    }
}
