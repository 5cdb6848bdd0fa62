//! Recording uploader for testing

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use upload_artifact_core::error::TransferError;
use upload_artifact_core::upload::{ArtifactUploader, UploadOptions, UploadResponse};
use upload_artifact_core::Result;

/// One call made to [`MockUploader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCall {
    pub artifact_name: String,
    pub files: Vec<PathBuf>,
    pub root: PathBuf,
    pub options: UploadOptions,
}

impl UploadCall {
    /// Files relative to the root, as the store would lay them out
    pub fn relative_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter_map(|f| f.strip_prefix(&self.root).ok().map(Path::to_path_buf))
            .collect()
    }
}

/// Uploader that records every request and answers from a script
///
/// Uploads succeed unless told otherwise with [`fail_items`] or
/// [`reject`].
///
/// [`fail_items`]: MockUploader::fail_items
/// [`reject`]: MockUploader::reject
#[derive(Default)]
pub struct MockUploader {
    calls: Mutex<Vec<UploadCall>>,
    failing: HashMap<String, usize>,
    rejected: HashSet<String>,
}

impl MockUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the first `count` files of `artifact_name` as failed items
    pub fn fail_items(mut self, artifact_name: &str, count: usize) -> Self {
        self.failing.insert(artifact_name.to_string(), count);
        self
    }

    /// Refuse `artifact_name` outright, as if it already existed
    pub fn reject(mut self, artifact_name: &str) -> Self {
        self.rejected.insert(artifact_name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<UploadCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// Names uploaded so far, in call order
    pub fn artifact_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|call| call.artifact_name)
            .collect()
    }
}

#[async_trait]
impl ArtifactUploader for MockUploader {
    async fn upload_artifact(
        &self,
        artifact_name: &str,
        files: &[PathBuf],
        root: &Path,
        options: &UploadOptions,
    ) -> Result<UploadResponse> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(UploadCall {
                artifact_name: artifact_name.to_string(),
                files: files.to_vec(),
                root: root.to_path_buf(),
                options: *options,
            });
        }

        if self.rejected.contains(artifact_name) {
            return Err(TransferError::artifact_exists(artifact_name).into());
        }

        let failed = self.failing.get(artifact_name).copied().unwrap_or(0);
        Ok(UploadResponse {
            artifact_name: artifact_name.to_string(),
            size: 0,
            failed_items: files.iter().take(failed).cloned().collect(),
        })
    }
}
