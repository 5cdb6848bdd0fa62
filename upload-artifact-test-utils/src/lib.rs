//! Test utilities for upload-artifact
//!
//! This crate provides an in-memory filesystem, a recording uploader and a
//! builder for search path trees, for testing the core without touching
//! disk or a real artifact store.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::TreeBuilder;
pub use mocks::{MockFileSystem, MockUploader, UploadCall};
