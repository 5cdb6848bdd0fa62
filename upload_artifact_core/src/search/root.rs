//! Root directory inference
//!
//! The root is the directory the uploaded artifact is relative to. It is the
//! deepest common ancestor of everything matched, but never deeper than the
//! literal base of a search path that contributed files, so structure under
//! a directory the user named is preserved.

use std::path::PathBuf;

use super::fs::EntryKind;
use super::matcher::PatternExpansion;
use super::pattern::common_ancestor;
use crate::Result;

/// Resolved root for a set of matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoot {
    /// `None` when nothing matched
    pub root_directory: Option<PathBuf>,
    pub is_single_file: bool,
}

/// Compute the root directory and single-file flag for a match set
pub fn resolve_root(includes: &[PatternExpansion], files: &[PathBuf]) -> Result<ResolvedRoot> {
    if files.is_empty() {
        return Ok(ResolvedRoot {
            root_directory: None,
            is_single_file: false,
        });
    }

    if let ([only_file], [only_pattern]) = (files, includes)
        && only_pattern.literal_kind == Some(EntryKind::File)
        && only_pattern.pattern.absolute == *only_file
    {
        return Ok(ResolvedRoot {
            root_directory: Some(parent_of(only_file)),
            is_single_file: true,
        });
    }

    let mut candidates: Vec<PathBuf> = files.iter().map(|f| parent_of(f)).collect();
    candidates.extend(
        includes
            .iter()
            .filter(|include| include.hits > 0)
            .map(floor_of),
    );

    Ok(ResolvedRoot {
        root_directory: Some(common_ancestor(&candidates)?),
        is_single_file: false,
    })
}

/// The shallowest directory a contributing pattern allows the root to be at
fn floor_of(include: &PatternExpansion) -> PathBuf {
    match include.literal_kind {
        Some(EntryKind::File) => parent_of(&include.pattern.absolute),
        _ => include.pattern.base.clone(),
    }
}

fn parent_of(path: &std::path::Path) -> PathBuf {
    path.parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| path.to_path_buf())
}
