//! Search and root resolution against an in-memory workspace

use proptest::prelude::*;
use std::path::PathBuf;
use upload_artifact_core::search::PathMatcher;
use upload_artifact_core::{Level, MemorySink, find_files_to_upload};
use upload_artifact_test_utils::TreeBuilder;

const WORKSPACE: &str = "/work";

fn path(relative: &str) -> PathBuf {
    PathBuf::from(WORKSPACE).join(relative)
}

#[test]
fn test_mixed_patterns_root_at_common_ancestor() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["build/a.txt", "out/report.pdf", "logs/x.log"])
        .build();
    let matcher = PathMatcher::new(&fs, WORKSPACE);

    let result = find_files_to_upload(
        &matcher,
        &["build/", "out/report.pdf"],
        &MemorySink::new(),
    )
    .unwrap();

    assert_eq!(
        result.files_to_upload,
        vec![path("build/a.txt"), path("out/report.pdf")]
    );
    assert_eq!(result.root_directory, Some(path("")));
    assert!(!result.is_single_file);
}

#[test]
fn test_glob_root_is_not_deeper_than_literal_base() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["reports/2024/q1/summary.txt", "reports/2024/q1/detail.txt"])
        .build();
    let matcher = PathMatcher::new(&fs, WORKSPACE);

    let result =
        find_files_to_upload(&matcher, &["reports/**/*.txt"], &MemorySink::new()).unwrap();

    assert_eq!(result.root_directory, Some(path("reports")));
}

#[test]
fn test_glob_matching_a_directory_includes_its_contents() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["pkg/dist/a.js", "pkg/dist/sub/b.js", "pkg/src/c.ts"])
        .build();
    let matcher = PathMatcher::new(&fs, WORKSPACE);

    let files = matcher.match_patterns(&["*/dist"]).unwrap();

    assert_eq!(files, vec![path("pkg/dist/a.js"), path("pkg/dist/sub/b.js")]);
}

#[test]
fn test_excluded_directory_drops_everything_below_it() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["site/index.html", "site/cache/one.bin", "site/cache/deep/two.bin"])
        .build();
    let matcher = PathMatcher::new(&fs, WORKSPACE);

    let files = matcher.match_patterns(&["site", "!site/cache"]).unwrap();

    assert_eq!(files, vec![path("site/index.html")]);
}

#[test]
fn test_duplicate_matches_are_reported_once() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["build/a.txt", "build/b.txt"])
        .build();
    let matcher = PathMatcher::new(&fs, WORKSPACE);

    let files = matcher
        .match_patterns(&["build", "build/*.txt", "build/a.txt"])
        .unwrap();

    assert_eq!(files, vec![path("build/a.txt"), path("build/b.txt")]);
}

#[test]
fn test_case_conflicts_are_reported() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["docs/README.md", "docs/readme.md"])
        .build();
    let matcher = PathMatcher::new(&fs, WORKSPACE);
    let sink = MemorySink::new();

    let result = find_files_to_upload(&matcher, &["docs"], &sink).unwrap();

    assert_eq!(result.files_to_upload.len(), 2);
    assert!(sink.contains(Level::Info, "Uploads are case insensitive"));
}

#[test]
fn test_every_found_file_is_logged_at_debug() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["build/a.txt", "build/b.txt"])
        .build();
    let matcher = PathMatcher::new(&fs, WORKSPACE);
    let sink = MemorySink::new();

    find_files_to_upload(&matcher, &["build"], &sink).unwrap();

    let found: Vec<_> = sink
        .messages_at(Level::Debug)
        .into_iter()
        .filter(|m| m.ends_with("was found using the provided searchPath"))
        .collect();
    assert_eq!(found.len(), 2);
}

proptest! {
    #[test]
    fn prop_matching_is_idempotent_and_rooted(
        files in prop::collection::btree_set("[a-c]{1,2}(/[a-c]{1,2}){0,2}\\.txt", 1..12),
        pattern in prop::sample::select(vec!["**/*.txt", "a*", "*/b*", "."]),
    ) {
        let relative: Vec<&str> = files.iter().map(String::as_str).collect();
        let fs = TreeBuilder::new(WORKSPACE).files(&relative).build();
        let matcher = PathMatcher::new(&fs, WORKSPACE);

        let first = find_files_to_upload(&matcher, &[pattern], &MemorySink::new()).unwrap();
        let second = find_files_to_upload(&matcher, &[pattern], &MemorySink::new()).unwrap();
        prop_assert_eq!(&first, &second);

        if let Some(root) = &first.root_directory {
            for file in &first.files_to_upload {
                prop_assert!(file.starts_with(root));
            }
        } else {
            prop_assert!(first.files_to_upload.is_empty());
        }
    }
}
