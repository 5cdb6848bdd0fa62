//! Filesystem access used by the path matcher
//!
//! The matcher only ever needs two questions answered: what is at a path,
//! and which files live below a directory. Keeping that behind a trait lets
//! tests run against an in-memory tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::Result;
use crate::error::IoError;

/// What a path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Read-only view of a filesystem
pub trait FileSystem: Send + Sync {
    /// Kind of the entry at `path`, or `None` when nothing exists there
    fn entry_kind(&self, path: &Path) -> Result<Option<EntryKind>>;

    /// Every regular file below `dir`, recursively
    ///
    /// Order must be deterministic: depth-first, siblings sorted by file name.
    fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// The real filesystem, walked with `walkdir`
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    follow_links: bool,
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self { follow_links: true }
    }
}

impl LocalFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether symbolic links are followed while walking directories
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

impl FileSystem for LocalFileSystem {
    fn entry_kind(&self, path: &Path) -> Result<Option<EntryKind>> {
        match fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => Ok(Some(EntryKind::Directory)),
            Ok(_) => Ok(Some(EntryKind::File)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(IoError::from_std(e).with_path(path).into()),
        }
    }

    fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let walker = WalkDir::new(dir)
            .follow_links(self.follow_links)
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}
