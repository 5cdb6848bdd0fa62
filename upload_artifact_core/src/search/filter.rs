//! Glob compilation using globset
//!
//! `*` and `?` never cross a path separator; `**` spans any number of
//! directories.

use globset::{GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use std::path::Path;

use super::pattern::SearchPattern;
use crate::Result;
use crate::error::SearchError;

fn build_glob(pattern: &SearchPattern) -> Result<globset::Glob> {
    GlobBuilder::new(&pattern.glob_text())
        .literal_separator(true)
        .build()
        .map_err(|e| SearchError::invalid_pattern(&pattern.raw, &e.kind().to_string()).into())
}

/// Matcher for a single include pattern
#[derive(Debug, Clone)]
pub struct IncludeMatcher {
    matcher: GlobMatcher,
}

impl IncludeMatcher {
    pub fn new(pattern: &SearchPattern) -> Result<Self> {
        Ok(Self {
            matcher: build_glob(pattern)?.compile_matcher(),
        })
    }

    /// True when `file` matches, or sits inside a matching directory below `base`
    pub fn matches(&self, file: &Path, base: &Path) -> bool {
        file.ancestors()
            .take_while(|ancestor| *ancestor != base)
            .any(|candidate| self.matcher.is_match(candidate))
    }
}

/// Set of exclusion patterns applied after expansion
#[derive(Debug, Clone)]
pub struct ExcludeFilter {
    globset: Option<GlobSet>,
}

impl ExcludeFilter {
    pub fn new(patterns: &[&SearchPattern]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self { globset: None });
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(build_glob(pattern)?);
        }

        let globset = builder
            .build()
            .map_err(|e| SearchError::invalid_pattern("exclusions", &e.to_string()))?;

        Ok(Self {
            globset: Some(globset),
        })
    }

    /// Excluded when the file itself or any directory containing it matches
    pub fn is_excluded(&self, file: &Path) -> bool {
        match &self.globset {
            Some(set) => file.ancestors().any(|candidate| set.is_match(candidate)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> SearchPattern {
        SearchPattern::parse(line, Path::new("/work")).unwrap()
    }

    #[test]
    fn test_star_does_not_cross_separator() {
        let pattern = parse("out/*.log");
        let matcher = IncludeMatcher::new(&pattern).unwrap();

        assert!(matcher.matches(Path::new("/work/out/a.log"), &pattern.base));
        assert!(!matcher.matches(Path::new("/work/out/deep/a.log"), &pattern.base));
    }

    #[test]
    fn test_double_star_spans_directories() {
        let pattern = parse("out/**/*.log");
        let matcher = IncludeMatcher::new(&pattern).unwrap();

        assert!(matcher.matches(Path::new("/work/out/a.log"), &pattern.base));
        assert!(matcher.matches(Path::new("/work/out/x/y/a.log"), &pattern.base));
        assert!(!matcher.matches(Path::new("/work/out/x/a.txt"), &pattern.base));
    }

    #[test]
    fn test_matching_directory_includes_descendants() {
        let pattern = parse("build/*");
        let matcher = IncludeMatcher::new(&pattern).unwrap();

        assert!(matcher.matches(Path::new("/work/build/sub/deep/file.bin"), &pattern.base));
    }

    #[test]
    fn test_base_itself_is_not_a_match_candidate() {
        let pattern = parse("b*/x.txt");
        let matcher = IncludeMatcher::new(&pattern).unwrap();

        assert!(matcher.matches(Path::new("/work/build/x.txt"), &pattern.base));
        assert!(!matcher.matches(Path::new("/work/build/y.txt"), &pattern.base));
    }

    #[test]
    fn test_invalid_pattern() {
        let pattern = parse("build/[abc");
        let err = IncludeMatcher::new(&pattern).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Search(SearchError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_exclude_filter() {
        let tmp = parse("!build/*.tmp");
        let cache = parse("!build/cache");
        let filter = ExcludeFilter::new(&[&tmp, &cache]).unwrap();

        assert!(filter.is_excluded(Path::new("/work/build/a.tmp")));
        assert!(filter.is_excluded(Path::new("/work/build/cache/blob")));
        assert!(!filter.is_excluded(Path::new("/work/build/a.txt")));
    }

    #[test]
    fn test_empty_exclude_filter() {
        let filter = ExcludeFilter::new(&[]).unwrap();
        assert!(!filter.is_excluded(Path::new("/anything")));
    }
}
