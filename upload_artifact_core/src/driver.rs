//! Top-level run driver
//!
//! Walks the planned artifacts in input order, applies the upload policy and
//! awaits each upload before the next search path is scanned. The run's
//! failure flag lives in the returned [`RunReport`]; nothing is global.

use serde::Serialize;
use std::path::PathBuf;

use crate::Result;
use crate::inputs::UploadInputs;
use crate::notice::NoticeSink;
use crate::planner::{ArtifactMode, ArtifactPlanner, PlannedArtifact};
use crate::policy::{self, ArtifactStatus, Outcome, PolicyConfig};
use crate::search::{FileSystem, PathMatcher};
use crate::upload::{ArtifactUploader, UploadOptions};

/// Final state of one artifact in a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    pub name: Option<String>,
    pub label: String,
    #[serde(flatten)]
    pub status: ArtifactStatus,
}

/// Everything a run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub artifacts: Vec<ArtifactReport>,
    /// Set once any artifact fails; never cleared
    pub failed: bool,
}

impl RunReport {
    pub fn record(&mut self, report: ArtifactReport) {
        if report.status.is_failed() {
            self.failed = true;
        }
        self.artifacts.push(report);
    }

    pub fn succeeded(&self) -> bool {
        !self.failed
    }

    pub fn count(&self, predicate: impl Fn(&ArtifactStatus) -> bool) -> usize {
        self.artifacts.iter().filter(|a| predicate(&a.status)).count()
    }
}

/// What `preview` would do with one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "message", rename_all = "lowercase")]
pub enum Decision {
    Upload,
    Skip(String),
    Fail(String),
}

impl Decision {
    pub fn is_fail(&self) -> bool {
        matches!(self, Decision::Fail(_))
    }
}

/// A planned artifact and the policy decision for it, without uploading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewEntry {
    pub label: String,
    pub name: Option<String>,
    pub root_directory: Option<PathBuf>,
    pub files: Vec<PathBuf>,
    #[serde(flatten)]
    pub decision: Decision,
}

/// Run the whole upload: plan, evaluate, transfer, classify
///
/// Input and pattern errors in combined mode are returned as `Err`. In
/// individual mode a failing search path is recorded and the next one is
/// still attempted.
pub async fn run(
    inputs: &UploadInputs,
    fs: &dyn FileSystem,
    uploader: &dyn ArtifactUploader,
    sink: &dyn NoticeSink,
) -> Result<RunReport> {
    inputs.validate()?;

    let groups = inputs.groups();
    let mode = inputs.mode();
    let policy = inputs.policy();
    let planner = ArtifactPlanner::new(PathMatcher::new(fs, &inputs.working_directory), sink);

    let mut report = RunReport::default();

    for (index, planned) in planner.plan(&groups, &mode)?.enumerate() {
        let planned = match planned {
            Ok(planned) => planned,
            Err(e) if mode == ArtifactMode::Individual => {
                let label = groups[index].label();
                sink.error(&format!("Failed to search {label}: {e}"));
                report.record(ArtifactReport {
                    name: None,
                    label,
                    status: ArtifactStatus::Failed(e.to_string()),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let status = match upload_planned(&planned, &policy, uploader, sink).await {
            Ok(status) => status,
            Err(e) => {
                let message = match &planned.name {
                    Some(name) => format!("Failed to upload {name}: {e}"),
                    None => format!("Failed to upload {}: {e}", planned.label),
                };
                sink.error(&message);
                ArtifactStatus::Failed(message)
            }
        };

        report.record(ArtifactReport {
            name: planned.name,
            label: planned.label,
            status,
        });
    }

    Ok(report)
}

async fn upload_planned(
    planned: &PlannedArtifact,
    policy: &PolicyConfig,
    uploader: &dyn ArtifactUploader,
    sink: &dyn NoticeSink,
) -> Result<ArtifactStatus> {
    match policy::resolve(planned, policy, sink)? {
        Outcome::Skip(_) => Ok(ArtifactStatus::Skipped),
        Outcome::Fail(message) => Ok(ArtifactStatus::Failed(message)),
        Outcome::Proceed(request) => {
            let options = UploadOptions {
                continue_on_error: false,
                retention_days: request.retention_days,
            };
            let response = uploader
                .upload_artifact(&request.artifact_name, &request.files, &request.root, &options)
                .await?;
            Ok(policy::classify(&request.artifact_name, &response, sink))
        }
    }
}

/// Plan and evaluate every artifact without calling an uploader
///
/// Errors are handled as in [`run`]: combined mode returns them, individual
/// mode turns them into a [`Decision::Fail`] entry for that search path.
pub fn preview(
    inputs: &UploadInputs,
    fs: &dyn FileSystem,
    sink: &dyn NoticeSink,
) -> Result<Vec<PreviewEntry>> {
    inputs.validate()?;

    let groups = inputs.groups();
    let mode = inputs.mode();
    let policy = inputs.policy();
    let planner = ArtifactPlanner::new(PathMatcher::new(fs, &inputs.working_directory), sink);

    let mut entries = Vec::new();
    for (index, planned) in planner.plan(&groups, &mode)?.enumerate() {
        let planned = match planned {
            Ok(planned) => planned,
            Err(e) if mode == ArtifactMode::Individual => {
                let label = groups[index].label();
                sink.error(&format!("Failed to search {label}: {e}"));
                entries.push(PreviewEntry {
                    label,
                    name: None,
                    root_directory: None,
                    files: Vec::new(),
                    decision: Decision::Fail(e.to_string()),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let decision = match policy::resolve(&planned, &policy, sink) {
            Ok(Outcome::Skip(message)) => Decision::Skip(message),
            Ok(Outcome::Fail(message)) => Decision::Fail(message),
            Ok(Outcome::Proceed(_)) => Decision::Upload,
            Err(e) => {
                sink.error(&format!("Failed to evaluate {}: {e}", planned.label));
                Decision::Fail(e.to_string())
            }
        };
        entries.push(PreviewEntry {
            label: planned.label,
            name: planned.name,
            root_directory: planned.result.root_directory,
            files: planned.result.files_to_upload,
            decision,
        });
    }

    Ok(entries)
}
