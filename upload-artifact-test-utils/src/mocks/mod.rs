//! Mock implementations for testing

mod filesystem;
mod uploader;

pub use filesystem::MockFileSystem;
pub use uploader::{MockUploader, UploadCall};
