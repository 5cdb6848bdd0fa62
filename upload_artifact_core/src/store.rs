//! Filesystem-backed artifact store
//!
//! Each artifact is a directory `<store>/<name>/` holding the files at their
//! paths relative to the artifact root, plus a `<store>/<name>.json`
//! manifest with the retention information.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::Result;
use crate::error::{IoError, TransferError};
use crate::upload::{ArtifactUploader, UploadOptions, UploadResponse, check_artifact_name};

const MANIFEST_EXTENSION: &str = "json";

/// Metadata written next to every stored artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub name: String,
    /// Paths relative to the artifact directory, in upload order
    pub files: Vec<PathBuf>,
    pub size: u64,
    pub failed_items: usize,
    pub uploaded_at: DateTime<Utc>,
    pub retention_days: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ArtifactManifest {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }
}

/// Artifact store rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    store_dir: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(store_dir: impl Into<PathBuf>) -> Self {
        Self {
            store_dir: store_dir.into(),
        }
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    fn artifact_dir(&self, name: &str) -> PathBuf {
        self.store_dir.join(name)
    }

    fn manifest_path(&self, name: &str) -> PathBuf {
        self.store_dir.join(format!("{name}.{MANIFEST_EXTENSION}"))
    }

    /// Read the manifest of a stored artifact, if there is one
    pub async fn manifest(&self, name: &str) -> Result<Option<ArtifactManifest>> {
        let path = self.manifest_path(name);
        match fs::read(&path).await {
            Ok(bytes) => {
                let manifest = serde_json::from_slice(&bytes).map_err(|e| {
                    IoError::from_std(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                        .with_path(&path)
                })?;
                Ok(Some(manifest))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(IoError::from_std(e).with_path(&path).into()),
        }
    }

    /// Delete every artifact whose retention has run out, returning their names
    pub async fn prune_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>> {
        let mut pruned = Vec::new();

        let mut entries = match fs::read_dir(&self.store_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(pruned),
            Err(e) => return Err(IoError::from_std(e).with_path(&self.store_dir).into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == MANIFEST_EXTENSION)
                && let Some(stem) = path.file_stem()
            {
                names.push(stem.to_string_lossy().into_owned());
            }
        }
        names.sort();

        for name in names {
            let Some(manifest) = self.manifest(&name).await? else {
                continue;
            };
            if !manifest.is_expired(now) {
                continue;
            }

            let dir = self.artifact_dir(&name);
            if fs::try_exists(&dir).await? {
                fs::remove_dir_all(&dir).await?;
            }
            fs::remove_file(self.manifest_path(&name)).await?;
            log::info!("Removed expired artifact {name}");
            pruned.push(name);
        }

        Ok(pruned)
    }

    async fn copy_into(&self, file: &Path, root: &Path, target: &Path) -> Result<(PathBuf, u64)> {
        let relative = file.strip_prefix(root).map_err(|_| {
            IoError::other(&format!("{} is not under {}", file.display(), root.display()))
                .with_path(file)
        })?;
        let destination = target.join(relative);

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| IoError::from_std(e).with_path(parent))?;
        }
        let bytes = fs::copy(file, &destination)
            .await
            .map_err(|e| IoError::from_std(e).with_path(file))?;

        Ok((relative.to_path_buf(), bytes))
    }
}

#[async_trait]
impl ArtifactUploader for LocalArtifactStore {
    async fn upload_artifact(
        &self,
        artifact_name: &str,
        files: &[PathBuf],
        root: &Path,
        options: &UploadOptions,
    ) -> Result<UploadResponse> {
        check_artifact_name(artifact_name)?;

        let target = self.artifact_dir(artifact_name);
        let manifest_path = self.manifest_path(artifact_name);
        if fs::try_exists(&target).await? || fs::try_exists(&manifest_path).await? {
            return Err(TransferError::artifact_exists(artifact_name).into());
        }
        fs::create_dir_all(&target)
            .await
            .map_err(|e| IoError::from_std(e).with_path(&target))?;

        let mut stored = Vec::with_capacity(files.len());
        let mut failed_items = Vec::new();
        let mut size = 0;

        for (index, file) in files.iter().enumerate() {
            match self.copy_into(file, root, &target).await {
                Ok((relative, bytes)) => {
                    log::trace!("Stored {} ({bytes} bytes)", relative.display());
                    stored.push(relative);
                    size += bytes;
                }
                Err(e) => {
                    log::warn!("Failed to upload {}: {e}", file.display());
                    failed_items.push(file.clone());
                    if !options.continue_on_error {
                        failed_items.extend(files[index + 1..].iter().cloned());
                        break;
                    }
                }
            }
        }

        let uploaded_at = Utc::now();
        let manifest = ArtifactManifest {
            name: artifact_name.to_string(),
            files: stored,
            size,
            failed_items: failed_items.len(),
            uploaded_at,
            retention_days: options.retention_days,
            expires_at: options
                .retention_days
                .map(|days| uploaded_at + Duration::days(i64::from(days))),
        };
        let json = serde_json::to_vec_pretty(&manifest)
            .map_err(|e| IoError::other(&e.to_string()).with_path(&manifest_path))?;
        fs::write(&manifest_path, json)
            .await
            .map_err(|e| IoError::from_std(e).with_path(&manifest_path))?;

        log::debug!(
            "Stored artifact {artifact_name} in {} ({size} bytes)",
            target.display()
        );

        Ok(UploadResponse {
            artifact_name: artifact_name.to_string(),
            size,
            failed_items,
        })
    }
}
