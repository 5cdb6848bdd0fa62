//! Expansion of search paths into a concrete file list

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::filter::{ExcludeFilter, IncludeMatcher};
use super::fs::{EntryKind, FileSystem};
use super::pattern::{SearchPattern, normalize};
use crate::Result;

/// Outcome of expanding one include pattern
#[derive(Debug, Clone)]
pub struct PatternExpansion {
    pub pattern: SearchPattern,
    /// What the literal path pointed at; `None` for globs and missing paths
    pub literal_kind: Option<EntryKind>,
    /// Files this pattern matched, before cross-pattern deduplication
    pub hits: usize,
}

/// Files matched by a set of patterns, plus how each pattern contributed
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub files: Vec<PathBuf>,
    pub includes: Vec<PatternExpansion>,
}

/// Expands search paths against a [`FileSystem`]
pub struct PathMatcher<'a> {
    fs: &'a dyn FileSystem,
    working_directory: PathBuf,
}

impl<'a> PathMatcher<'a> {
    /// A relative `working_directory` is resolved against the process's
    /// current directory, so every matched path comes back absolute.
    pub fn new(fs: &'a dyn FileSystem, working_directory: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            working_directory: absolute_directory(working_directory.into()),
        }
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// Absolute, deduplicated paths of every file the patterns match
    pub fn match_patterns<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Vec<PathBuf>> {
        Ok(self.expand(patterns)?.files)
    }

    /// Expand the patterns, keeping per-pattern details for root resolution
    pub fn expand<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Expansion> {
        let parsed = patterns
            .iter()
            .map(|line| SearchPattern::parse(line.as_ref(), &self.working_directory))
            .collect::<Result<Vec<_>>>()?;

        let excludes: Vec<&SearchPattern> = parsed.iter().filter(|p| p.is_exclude).collect();
        let exclude_filter = ExcludeFilter::new(&excludes)?;

        let mut seen = HashSet::new();
        let mut expansion = Expansion::default();

        for pattern in parsed.iter().filter(|p| !p.is_exclude) {
            let (literal_kind, candidates) = self.expand_one(pattern)?;
            let mut hits = 0;

            for file in candidates {
                if exclude_filter.is_excluded(&file) {
                    log::trace!("Excluded {}", file.display());
                    continue;
                }
                hits += 1;
                if seen.insert(file.clone()) {
                    expansion.files.push(file);
                }
            }

            log::debug!("Search path '{}' matched {hits} file(s)", pattern.raw);
            expansion.includes.push(PatternExpansion {
                pattern: pattern.clone(),
                literal_kind,
                hits,
            });
        }

        Ok(expansion)
    }

    fn expand_one(&self, pattern: &SearchPattern) -> Result<(Option<EntryKind>, Vec<PathBuf>)> {
        if pattern.is_literal {
            return match self.fs.entry_kind(&pattern.absolute)? {
                Some(EntryKind::File) => {
                    Ok((Some(EntryKind::File), vec![pattern.absolute.clone()]))
                }
                Some(EntryKind::Directory) => Ok((
                    Some(EntryKind::Directory),
                    self.fs.walk_files(&pattern.absolute)?,
                )),
                None => Ok((None, Vec::new())),
            };
        }

        // Compile before touching the filesystem so bad syntax always fails
        let matcher = IncludeMatcher::new(pattern)?;

        if self.fs.entry_kind(&pattern.base)? != Some(EntryKind::Directory) {
            return Ok((None, Vec::new()));
        }

        let files = self
            .fs
            .walk_files(&pattern.base)?
            .into_iter()
            .filter(|file| matcher.matches(file, &pattern.base))
            .collect();

        Ok((None, files))
    }
}

fn absolute_directory(directory: PathBuf) -> PathBuf {
    if directory.is_absolute() {
        return normalize(&directory);
    }
    match std::path::absolute(&directory) {
        Ok(absolute) => normalize(&absolute),
        Err(e) => {
            log::warn!(
                "Cannot resolve working directory {}: {e}",
                directory.display()
            );
            directory
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fs::LocalFileSystem;
    use std::fs;
    use tempfile::TempDir;

    fn create_workspace() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("build/sub")).unwrap();
        fs::create_dir_all(base.join("logs")).unwrap();
        fs::write(base.join("build/a.txt"), b"a").unwrap();
        fs::write(base.join("build/b.txt"), b"b").unwrap();
        fs::write(base.join("build/sub/c.bin"), b"c").unwrap();
        fs::write(base.join("build/skip.tmp"), b"t").unwrap();
        fs::write(base.join("logs/run.log"), b"l").unwrap();
        dir
    }

    fn names(dir: &TempDir, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_directory_expands_recursively() {
        let dir = create_workspace();
        let fs = LocalFileSystem::new();
        let matcher = PathMatcher::new(&fs, dir.path());

        let files = matcher.match_patterns(&["build"]).unwrap();
        assert_eq!(
            names(&dir, &files),
            vec!["build/a.txt", "build/b.txt", "build/skip.tmp", "build/sub/c.bin"]
        );
    }

    #[test]
    fn test_overlapping_patterns_deduplicate() {
        let dir = create_workspace();
        let fs = LocalFileSystem::new();
        let matcher = PathMatcher::new(&fs, dir.path());

        let files = matcher
            .match_patterns(&["build/*.txt", "build", "logs/*.log"])
            .unwrap();
        assert_eq!(
            names(&dir, &files),
            vec![
                "build/a.txt",
                "build/b.txt",
                "build/skip.tmp",
                "build/sub/c.bin",
                "logs/run.log"
            ]
        );
    }

    #[test]
    fn test_exclusions_apply_to_all_includes() {
        let dir = create_workspace();
        let fs = LocalFileSystem::new();
        let matcher = PathMatcher::new(&fs, dir.path());

        let files = matcher
            .match_patterns(&["build", "!build/*.tmp", "!build/sub"])
            .unwrap();
        assert_eq!(names(&dir, &files), vec!["build/a.txt", "build/b.txt"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let dir = create_workspace();
        let fs = LocalFileSystem::new();
        let matcher = PathMatcher::new(&fs, dir.path());

        assert!(matcher.match_patterns(&["missing/*.log"]).unwrap().is_empty());
        assert!(matcher.match_patterns(&["missing.txt"]).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_pattern_fails_even_without_base() {
        let dir = create_workspace();
        let fs = LocalFileSystem::new();
        let matcher = PathMatcher::new(&fs, dir.path());

        assert!(matcher.match_patterns(&["missing/[oops"]).is_err());
    }

    #[test]
    fn test_expansion_records_literal_kinds() {
        let dir = create_workspace();
        let fs = LocalFileSystem::new();
        let matcher = PathMatcher::new(&fs, dir.path());

        let expansion = matcher
            .expand(&["build/a.txt", "logs", "nothing", "build/*.txt"])
            .unwrap();
        let kinds: Vec<_> = expansion.includes.iter().map(|i| i.literal_kind).collect();
        let hits: Vec<_> = expansion.includes.iter().map(|i| i.hits).collect();

        assert_eq!(
            kinds,
            vec![
                Some(EntryKind::File),
                Some(EntryKind::Directory),
                None,
                None
            ]
        );
        assert_eq!(hits, vec![1, 1, 0, 2]);
        assert_eq!(expansion.files.len(), 3);
    }

    #[test]
    fn test_parent_relative_patterns_resolve_above_working_directory() {
        let dir = create_workspace();
        let fs = LocalFileSystem::new();
        let matcher = PathMatcher::new(&fs, dir.path().join("build/sub"));

        let files = matcher
            .match_patterns(&["./../../logs/*.log", "../a.txt"])
            .unwrap();
        assert_eq!(names(&dir, &files), vec!["logs/run.log", "build/a.txt"]);
    }

    #[test]
    fn test_relative_working_directory_yields_absolute_paths() {
        let fs = LocalFileSystem::new();
        let matcher = PathMatcher::new(&fs, ".");
        let cwd = std::env::current_dir().unwrap();

        assert!(matcher.working_directory().is_absolute());
        assert_eq!(matcher.working_directory(), cwd.as_path());

        // Tests run from the package directory
        let files = matcher.match_patterns(&["Cargo.toml"]).unwrap();
        assert_eq!(files, vec![cwd.join("Cargo.toml")]);
        assert!(files.iter().all(|f| f.is_absolute()));
    }
}
