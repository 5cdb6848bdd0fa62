//! Upload Artifact Core Library
//!
//! Finds the files a CI job wants to keep, works out the directory they are
//! stored relative to, groups them into artifacts and decides what happens
//! when nothing matched. The transfer itself goes through the
//! [`ArtifactUploader`] trait; [`LocalArtifactStore`] is the bundled
//! filesystem-backed implementation.

pub mod driver;
pub mod error;
pub mod inputs;
pub mod notice;
pub mod planner;
pub mod policy;
pub mod search;
pub mod store;
pub mod upload;

// Re-export main types
pub use driver::{ArtifactReport, Decision, PreviewEntry, RunReport, preview, run};
pub use error::{Error, Result};
pub use inputs::{DEFAULT_ARTIFACT_NAME, UploadInputs};
pub use notice::{Level, LogSink, MemorySink, NoticeSink};
pub use planner::{ArtifactMode, ArtifactPlanner, NameSource, PlannedArtifact, SearchPathGroup};
pub use policy::{ArtifactStatus, NoFilesFoundAction, Outcome, PolicyConfig, UploadRequest};
pub use search::{
    EntryKind, FileSystem, LocalFileSystem, PathMatcher, SearchResult, find_files_to_upload,
};
pub use store::{ArtifactManifest, LocalArtifactStore};
pub use upload::{ArtifactUploader, UploadOptions, UploadResponse};
