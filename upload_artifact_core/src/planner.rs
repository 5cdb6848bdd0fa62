//! Artifact planning
//!
//! Maps search path groups onto artifacts: one combined artifact carrying the
//! configured name, or one artifact per group named after what it matched.

use serde::Serialize;
use std::path::Path;

use crate::Result;
use crate::error::ValidationError;
use crate::notice::NoticeSink;
use crate::search::{PathMatcher, SearchResult, find_files_to_upload};

/// Patterns searched together as one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPathGroup {
    pub patterns: Vec<String>,
}

impl SearchPathGroup {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Human readable form used in notices
    pub fn label(&self) -> String {
        self.patterns.join(", ")
    }
}

/// How search paths are grouped into artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactMode {
    /// Every group is searched together and uploaded under one name
    Combined { name: String },
    /// Each group becomes its own artifact
    Individual,
}

/// Where a planned artifact's name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSource {
    Configured,
    RootDirectory,
    FileName,
}

/// An artifact ready for policy evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedArtifact {
    /// `None` when an individual group matched nothing
    pub name: Option<String>,
    pub name_source: NameSource,
    pub label: String,
    pub result: SearchResult,
}

pub struct ArtifactPlanner<'a> {
    matcher: PathMatcher<'a>,
    sink: &'a dyn NoticeSink,
}

impl<'a> ArtifactPlanner<'a> {
    pub fn new(matcher: PathMatcher<'a>, sink: &'a dyn NoticeSink) -> Self {
        Self { matcher, sink }
    }

    /// Plan artifacts for `groups`
    ///
    /// The returned iterator searches lazily: a group's files are only looked
    /// up when the iterator reaches it. Combined mode always yields exactly one
    /// item; individual mode yields one per group.
    pub fn plan<'p>(
        &'p self,
        groups: &[SearchPathGroup],
        mode: &ArtifactMode,
    ) -> Result<impl Iterator<Item = Result<PlannedArtifact>> + use<'a, 'p>> {
        let units: Vec<(SearchPathGroup, Option<String>)> = match mode {
            ArtifactMode::Combined { name } => {
                if name.trim().is_empty() {
                    return Err(ValidationError::missing_field("name").into());
                }
                let combined =
                    SearchPathGroup::new(groups.iter().flat_map(|g| g.patterns.iter().cloned()));
                vec![(combined, Some(name.clone()))]
            }
            ArtifactMode::Individual => groups.iter().cloned().map(|g| (g, None)).collect(),
        };

        Ok(units
            .into_iter()
            .map(move |(group, name)| self.plan_group(&group, name)))
    }

    fn plan_group(
        &self,
        group: &SearchPathGroup,
        configured_name: Option<String>,
    ) -> Result<PlannedArtifact> {
        let result = find_files_to_upload(&self.matcher, &group.patterns, self.sink)?;

        let (name, name_source) = match configured_name {
            Some(name) => (Some(name), NameSource::Configured),
            None => derive_name(&result)?,
        };

        Ok(PlannedArtifact {
            name,
            name_source,
            label: group.label(),
            result,
        })
    }
}

/// Name for an individual artifact: the file stem of a single file, otherwise
/// the last segment of the root directory
pub fn derive_name(result: &SearchResult) -> Result<(Option<String>, NameSource)> {
    if result.is_single_file
        && let Some(file) = result.files_to_upload.first()
    {
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty());
        return match stem {
            Some(stem) => Ok((Some(stem), NameSource::FileName)),
            None => Err(unnamed(file)),
        };
    }

    match &result.root_directory {
        Some(root) => match root.file_name() {
            Some(segment) => Ok((
                Some(segment.to_string_lossy().into_owned()),
                NameSource::RootDirectory,
            )),
            None => Err(unnamed(root)),
        },
        None => Ok((None, NameSource::RootDirectory)),
    }
}

fn unnamed(path: &Path) -> crate::Error {
    ValidationError::invalid_configuration(&format!(
        "cannot derive an artifact name from {}",
        path.display()
    ))
    .into()
}
