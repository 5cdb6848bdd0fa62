//! File discovery for artifact uploads
//!
//! Turns a group of search paths into a [`SearchResult`]: the files to
//! upload, the directory they are relative to, and whether the group named a
//! single file.

mod filter;
pub mod fs;
pub mod matcher;
pub mod pattern;
pub mod root;

pub use fs::{EntryKind, FileSystem, LocalFileSystem};
pub use matcher::{Expansion, PathMatcher, PatternExpansion};
pub use pattern::SearchPattern;
pub use root::{ResolvedRoot, resolve_root};

use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::Result;
use crate::notice::NoticeSink;

/// Files found for one search path group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Absolute paths, unique, in discovery order
    pub files_to_upload: Vec<PathBuf>,
    /// Directory every file is relative to; `None` when nothing matched
    pub root_directory: Option<PathBuf>,
    /// The group named exactly one regular file
    pub is_single_file: bool,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.files_to_upload.is_empty()
    }
}

/// Expand `patterns` and resolve their root in one step
pub fn find_files_to_upload<S: AsRef<str>>(
    matcher: &PathMatcher<'_>,
    patterns: &[S],
    sink: &dyn NoticeSink,
) -> Result<SearchResult> {
    let expansion = matcher.expand(patterns)?;

    for file in &expansion.files {
        sink.debug(&format!(
            "File:{} was found using the provided searchPath",
            file.display()
        ));
    }
    report_case_conflicts(&expansion.files, sink);

    let resolved = resolve_root(&expansion.includes, &expansion.files)?;

    Ok(SearchResult {
        files_to_upload: expansion.files,
        root_directory: resolved.root_directory,
        is_single_file: resolved.is_single_file,
    })
}

/// Artifact stores compare paths case-insensitively; warn about paths that would collide
fn report_case_conflicts(files: &[PathBuf], sink: &dyn NoticeSink) {
    let mut seen: HashMap<String, &PathBuf> = HashMap::new();
    for file in files {
        let key = file.to_string_lossy().to_lowercase();
        if let Some(previous) = seen.get(&key) {
            sink.info(&format!(
                "Uploads are case insensitive: {} was detected that it will be overwritten by another file with the same path ({})",
                file.display(),
                previous.display()
            ));
        } else {
            seen.insert(key, file);
        }
    }
}
