//! End-to-end tests for the upload driver
//!
//! These run the whole plan/policy/upload sequence against an in-memory
//! workspace and a recording uploader.

use std::path::PathBuf;
use upload_artifact_core::{
    ArtifactStatus, Level, MemorySink, NoFilesFoundAction, UploadInputs, run,
};
use upload_artifact_test_utils::{MockUploader, TreeBuilder};

const WORKSPACE: &str = "/work";

fn path(relative: &str) -> PathBuf {
    PathBuf::from(WORKSPACE).join(relative)
}

#[tokio::test]
async fn test_combined_directory_upload() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["build/a.txt", "build/b.txt"])
        .build();
    let uploader = MockUploader::new();
    let sink = MemorySink::new();
    let inputs = UploadInputs::new(WORKSPACE).with_search_path(["build/"]);

    let report = run(&inputs, &fs, &uploader, &sink).await.unwrap();

    assert!(report.succeeded());
    let calls = uploader.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].artifact_name, "artifact");
    assert_eq!(calls[0].root, path("build"));
    assert_eq!(calls[0].files, vec![path("build/a.txt"), path("build/b.txt")]);
    assert!(!calls[0].options.continue_on_error);
    assert!(sink.contains(
        Level::Info,
        "With the provided path, there will be 2 files uploaded"
    ));
    assert!(sink.contains(Level::Info, "Artifact artifact has been successfully uploaded!"));
}

#[tokio::test]
async fn test_individual_directory_upload_uses_directory_name() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["build/a.txt", "build/b.txt"])
        .build();
    let uploader = MockUploader::new();
    let sink = MemorySink::new();
    let inputs = UploadInputs::new(WORKSPACE)
        .with_individual(true)
        .with_search_path(["build/"]);

    let report = run(&inputs, &fs, &uploader, &sink).await.unwrap();

    assert!(report.succeeded());
    assert_eq!(uploader.artifact_names(), vec!["build"]);
    assert!(sink.contains(
        Level::Info,
        "Using the root directory of the individual path as the artifact name."
    ));
}

#[tokio::test]
async fn test_individual_single_file_uses_file_stem() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["out/report.pdf", "out/other.pdf"])
        .build();
    let uploader = MockUploader::new();
    let sink = MemorySink::new();
    let inputs = UploadInputs::new(WORKSPACE)
        .with_individual(true)
        .with_search_path(["out/report.pdf"]);

    run(&inputs, &fs, &uploader, &sink).await.unwrap();

    let calls = uploader.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].artifact_name, "report");
    assert_eq!(calls[0].root, path("out"));
    assert_eq!(calls[0].relative_files(), vec![PathBuf::from("report.pdf")]);
    assert!(sink.contains(
        Level::Info,
        "Using the name of the individual file as the artifact name."
    ));
    assert!(sink.contains(
        Level::Info,
        "With the provided path, there will be 1 file uploaded"
    ));
}

#[tokio::test]
async fn test_no_match_with_error_action_fails_without_uploading() {
    let fs = TreeBuilder::new(WORKSPACE).file("build/a.txt").build();
    let uploader = MockUploader::new();
    let sink = MemorySink::new();
    let inputs = UploadInputs::new(WORKSPACE)
        .with_search_path(["missing/*.log"])
        .with_if_no_files_found(NoFilesFoundAction::Error);

    let report = run(&inputs, &fs, &uploader, &sink).await.unwrap();

    assert!(!report.succeeded());
    assert_eq!(uploader.call_count(), 0);
    assert_eq!(
        sink.messages_at(Level::Error),
        vec![
            "No files were found with the provided path: missing/*.log. No artifacts will be uploaded."
                .to_string()
        ]
    );
}

#[tokio::test]
async fn test_no_match_with_warn_action_is_not_a_failure() {
    let fs = TreeBuilder::new(WORKSPACE).directory("empty").build();
    let uploader = MockUploader::new();
    let sink = MemorySink::new();
    let inputs = UploadInputs::new(WORKSPACE).with_search_path(["empty/**"]);

    let report = run(&inputs, &fs, &uploader, &sink).await.unwrap();

    assert!(report.succeeded());
    assert_eq!(report.artifacts[0].status, ArtifactStatus::Skipped);
    assert_eq!(uploader.call_count(), 0);
    assert_eq!(sink.messages_at(Level::Warning).len(), 1);
    assert!(sink.messages_at(Level::Error).is_empty());
}

#[tokio::test]
async fn test_no_match_with_ignore_action_only_informs() {
    let fs = TreeBuilder::new(WORKSPACE).build();
    let uploader = MockUploader::new();
    let sink = MemorySink::new();
    let inputs = UploadInputs::new(WORKSPACE)
        .with_search_path(["nothing"])
        .with_if_no_files_found(NoFilesFoundAction::Ignore);

    let report = run(&inputs, &fs, &uploader, &sink).await.unwrap();

    assert!(report.succeeded());
    assert_eq!(uploader.call_count(), 0);
    assert!(sink.messages_at(Level::Warning).is_empty());
    assert!(sink.contains(Level::Info, "No files were found with the provided path: nothing"));
}

#[tokio::test]
async fn test_large_artifact_advisory() {
    let fs = TreeBuilder::new(WORKSPACE).many_files("big", 10_001).build();
    let uploader = MockUploader::new();
    let sink = MemorySink::new();
    let inputs = UploadInputs::new(WORKSPACE).with_search_path(["big"]);

    let report = run(&inputs, &fs, &uploader, &sink).await.unwrap();

    assert!(report.succeeded());
    assert_eq!(uploader.calls()[0].files.len(), 10_001);
    assert!(sink.contains(Level::Warning, "There are over 10,000 files in this artifact"));
}

#[tokio::test]
async fn test_exactly_ten_thousand_files_has_no_advisory() {
    let fs = TreeBuilder::new(WORKSPACE).many_files("big", 10_000).build();
    let uploader = MockUploader::new();
    let sink = MemorySink::new();
    let inputs = UploadInputs::new(WORKSPACE).with_search_path(["big"]);

    run(&inputs, &fs, &uploader, &sink).await.unwrap();

    assert!(sink.messages_at(Level::Warning).is_empty());
}

#[tokio::test]
async fn test_individual_mode_one_artifact_per_search_path() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["a/1.txt", "b/2.txt", "c/3.txt"])
        .build();
    let uploader = MockUploader::new();
    let sink = MemorySink::new();
    let inputs = UploadInputs::new(WORKSPACE)
        .with_individual(true)
        .with_search_path(["a\nb\nc"]);

    let report = run(&inputs, &fs, &uploader, &sink).await.unwrap();

    assert_eq!(report.artifacts.len(), 3);
    assert_eq!(uploader.artifact_names(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_failure_does_not_stop_later_artifacts() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["a/1.txt", "b/2.txt", "c/3.txt"])
        .build();
    let uploader = MockUploader::new().fail_items("a", 1).reject("b");
    let sink = MemorySink::new();
    let inputs = UploadInputs::new(WORKSPACE)
        .with_individual(true)
        .with_search_path(["a", "b", "c"]);

    let report = run(&inputs, &fs, &uploader, &sink).await.unwrap();

    assert!(!report.succeeded());
    assert_eq!(uploader.call_count(), 3);
    let statuses: Vec<_> = report.artifacts.iter().map(|a| &a.status).collect();
    assert!(statuses[0].is_failed());
    assert!(statuses[1].is_failed());
    assert_eq!(*statuses[2], ArtifactStatus::Uploaded);
    assert!(sink.contains(
        Level::Error,
        "An error was encountered when uploading a. There were 1 items that failed to upload."
    ));
    assert!(sink.contains(Level::Info, "Artifact c has been successfully uploaded!"));
}

#[tokio::test]
async fn test_exclusions_apply_to_every_individual_artifact() {
    let fs = TreeBuilder::new(WORKSPACE)
        .files(&["a/keep.txt", "a/skip.tmp", "b/keep.txt", "b/nested/skip.tmp"])
        .build();
    let uploader = MockUploader::new();
    let sink = MemorySink::new();
    let inputs = UploadInputs::new(WORKSPACE)
        .with_individual(true)
        .with_search_path(["a\nb\n!**/*.tmp"]);

    run(&inputs, &fs, &uploader, &sink).await.unwrap();

    let calls = uploader.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].files, vec![path("a/keep.txt")]);
    assert_eq!(calls[1].files, vec![path("b/keep.txt")]);
}

#[tokio::test]
async fn test_retention_is_passed_to_uploader() {
    let fs = TreeBuilder::new(WORKSPACE).file("dist/app.bin").build();
    let uploader = MockUploader::new();
    let inputs = UploadInputs::new(WORKSPACE)
        .with_name("app")
        .with_search_path(["dist"])
        .with_retention_days(Some(5));

    run(&inputs, &fs, &uploader, &MemorySink::new())
        .await
        .unwrap();

    assert_eq!(uploader.calls()[0].options.retention_days, Some(5));
}

#[tokio::test]
async fn test_combined_mode_propagates_walk_errors() {
    let mut fs = TreeBuilder::new(WORKSPACE).file("locked/a.txt").build();
    fs.deny_walk(path("locked"));
    let uploader = MockUploader::new();
    let inputs = UploadInputs::new(WORKSPACE).with_search_path(["locked"]);

    let result = run(&inputs, &fs, &uploader, &MemorySink::new()).await;

    let error = result.unwrap_err();
    assert!(error.is_filesystem_error());
    assert_eq!(uploader.call_count(), 0);
}

#[tokio::test]
async fn test_invalid_inputs_are_rejected_before_searching() {
    let fs = TreeBuilder::new(WORKSPACE).file("build/a.txt").build();
    let uploader = MockUploader::new();
    let inputs = UploadInputs::new(WORKSPACE).with_search_path(["!build/a.txt"]);

    let error = run(&inputs, &fs, &uploader, &MemorySink::new())
        .await
        .unwrap_err();

    assert!(error.is_usage_error());
    assert!(fs.walked().is_empty());
}
