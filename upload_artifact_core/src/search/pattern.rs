//! Search path parsing and lexical path helpers

use std::path::{Component, Path, PathBuf};

use crate::Result;
use crate::error::SearchError;

/// Characters that turn a path segment into a glob segment
const GLOB_CHARS: &[char] = &['*', '?', '[', '{'];

/// Prefix marking a search path as an exclusion
pub const EXCLUDE_PREFIX: char = '!';

/// One line of a search path, resolved against the working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    /// The text as the user wrote it (without the `!` prefix)
    pub raw: String,
    /// Absolute, lexically normalized form
    pub absolute: PathBuf,
    /// Leading segments that contain no wildcard
    pub base: PathBuf,
    /// True when no segment contains a wildcard
    pub is_literal: bool,
    /// True for `!pattern` lines
    pub is_exclude: bool,
}

impl SearchPattern {
    /// Parse one search path line relative to `working_directory`
    pub fn parse(line: &str, working_directory: &Path) -> Result<Self> {
        let trimmed = line.trim();
        let (is_exclude, raw) = match trimmed.strip_prefix(EXCLUDE_PREFIX) {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };

        if raw.is_empty() {
            return Err(SearchError::invalid_pattern(line, "empty search path").into());
        }

        let absolute = normalize(&working_directory.join(raw));
        let base = search_base(&absolute);
        let is_literal = base == absolute;

        Ok(Self {
            raw: raw.to_string(),
            absolute,
            base,
            is_literal,
            is_exclude,
        })
    }

    /// Pattern text handed to the glob compiler
    pub fn glob_text(&self) -> String {
        self.absolute.to_string_lossy().into_owned()
    }
}

/// Whether a single path segment contains glob syntax
pub fn has_glob_chars(segment: &str) -> bool {
    segment.contains(GLOB_CHARS)
}

/// Leading components of `path` up to (not including) the first glob segment
pub fn search_base(path: &Path) -> PathBuf {
    let mut base = PathBuf::new();
    for component in path.components() {
        if let Component::Normal(segment) = component
            && has_glob_chars(&segment.to_string_lossy())
        {
            break;
        }
        base.push(component);
    }
    base
}

/// Remove `.` and resolve `..` without touching the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` above the filesystem root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                None | Some(Component::ParentDir) | Some(Component::CurDir) => {
                    normalized.push(component);
                }
            },
            other => normalized.push(other),
        }
    }
    normalized
}

/// Deepest directory that contains every path in `paths`
///
/// Fails when the paths do not share even a root (different drives, or
/// unrelated relative paths).
pub fn common_ancestor(paths: &[PathBuf]) -> Result<PathBuf> {
    let Some((first, rest)) = paths.split_first() else {
        return Err(SearchError::no_common_root(Vec::new()).into());
    };

    let mut shared: Vec<Component<'_>> = first.components().collect();
    for path in rest {
        let matching = shared
            .iter()
            .zip(path.components())
            .take_while(|(a, b)| **a == *b)
            .count();
        shared.truncate(matching);
    }

    if shared.is_empty() {
        return Err(SearchError::no_common_root(paths.to_vec()).into());
    }

    Ok(shared.iter().collect())
}
