//! Mock file system implementation for testing

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use upload_artifact_core::error::{IoError, IoErrorKind};
use upload_artifact_core::search::{EntryKind, FileSystem};
use upload_artifact_core::{Error, Result};

/// In-memory file tree
///
/// Parent directories of added files exist implicitly. Walks are ordered the
/// same way the real walker orders them, so results are comparable.
#[derive(Default)]
pub struct MockFileSystem {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    unreadable: HashSet<PathBuf>,
    walks: Mutex<Vec<PathBuf>>,
}

impl MockFileSystem {
    /// Create an empty mock file system
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the mock file system is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    /// Add a file, creating its parent directories
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: &[u8]) {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            self.create_directory(parent);
        }
        self.files.insert(path, content.to_vec());
    }

    /// Create a directory and all of its ancestors
    pub fn create_directory(&mut self, path: impl AsRef<Path>) {
        for ancestor in path.as_ref().ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.directories.insert(ancestor.to_path_buf());
        }
    }

    /// Make walking `dir` fail with a permission error
    pub fn deny_walk(&mut self, dir: impl AsRef<Path>) {
        self.unreadable.insert(dir.as_ref().to_path_buf());
    }

    /// Check if a file exists
    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        self.files.contains_key(path.as_ref())
    }

    /// Read a file from the mock file system
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = path.as_ref();
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Io(IoError::file_not_found(path)))
    }

    /// Directories walked so far, in call order
    pub fn walked(&self) -> Vec<PathBuf> {
        self.walks.lock().map(|w| w.clone()).unwrap_or_default()
    }

    /// Reset the mock file system
    pub fn reset(&mut self) {
        self.files.clear();
        self.directories.clear();
        self.unreadable.clear();
        if let Ok(mut walks) = self.walks.lock() {
            walks.clear();
        }
    }
}

impl FileSystem for MockFileSystem {
    fn entry_kind(&self, path: &Path) -> Result<Option<EntryKind>> {
        if self.files.contains_key(path) {
            Ok(Some(EntryKind::File))
        } else if self.directories.contains(path) {
            Ok(Some(EntryKind::Directory))
        } else {
            Ok(None)
        }
    }

    fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if let Ok(mut walks) = self.walks.lock() {
            walks.push(dir.to_path_buf());
        }

        if self.unreadable.contains(dir) {
            return Err(Error::Io(IoError {
                kind: IoErrorKind::PermissionDenied,
                path: Some(dir.to_path_buf()),
                source: None,
            }));
        }
        if !self.directories.contains(dir) {
            return Err(Error::Io(IoError::file_not_found(dir)));
        }

        // Component-wise path ordering is depth-first with siblings by name
        Ok(self
            .files
            .keys()
            .filter(|file| file.starts_with(dir) && file.as_path() != dir)
            .cloned()
            .collect())
    }
}
