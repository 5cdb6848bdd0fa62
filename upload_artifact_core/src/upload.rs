//! Upload collaborator contract
//!
//! The transfer itself is someone else's job. The core calls
//! [`ArtifactUploader::upload_artifact`] at most once per request and only
//! looks at which items failed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Result;
use crate::error::TransferError;

/// Characters an artifact name may not contain
pub const INVALID_NAME_CHARS: &[char] = &['"', ':', '<', '>', '|', '*', '?', '\r', '\n', '\\', '/'];

/// Options passed through to the uploader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOptions {
    /// Keep going after an item fails instead of abandoning the rest
    pub continue_on_error: bool,
    /// Days the store keeps the artifact; `None` uses the store default
    pub retention_days: Option<u32>,
}

/// What the uploader reports back
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub artifact_name: String,
    /// Total bytes transferred
    pub size: u64,
    /// Items that did not make it; empty means full success
    pub failed_items: Vec<PathBuf>,
}

/// Transfer service for a single artifact
#[async_trait]
pub trait ArtifactUploader: Send + Sync {
    /// Upload `files`, stored relative to `root`, under `artifact_name`
    ///
    /// Returns `Err` only when nothing could be attempted (bad name, name
    /// already taken). Per-item failures belong in `failed_items`.
    async fn upload_artifact(
        &self,
        artifact_name: &str,
        files: &[PathBuf],
        root: &Path,
        options: &UploadOptions,
    ) -> Result<UploadResponse>;
}

/// Reject names a store cannot represent as a single path segment
pub fn check_artifact_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TransferError::invalid_name(name, "name is empty").into());
    }

    if let Some(bad) = name.chars().find(|c| INVALID_NAME_CHARS.contains(c)) {
        return Err(TransferError::invalid_name(
            name,
            &format!("contains the invalid character {bad:?}"),
        )
        .into());
    }

    if name == "." || name == ".." {
        return Err(TransferError::invalid_name(name, "reserved path segment").into());
    }

    Ok(())
}
