//! Error types for the upload-artifact core library
//!
//! Errors are grouped into categories so callers can decide what is fatal
//! for a single search path and what should stop the whole run.

use thiserror::Error;

pub mod io;
pub mod search;
pub mod transfer;
pub mod validation;

pub use self::io::{IoError, IoErrorKind};
pub use self::search::SearchError;
pub use self::transfer::TransferError;
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the core library
///
/// - I/O errors: filesystem access while scanning or copying
/// - Search errors: malformed patterns, disjoint roots
/// - Validation errors: bad inputs and configuration
/// - Transfer errors: raised by an upload collaborator before any item is sent
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Pattern expansion and root resolution errors
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Upload collaborator errors
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf());
        let io_error = match err.into_io_error() {
            Some(source) => IoError::from_std(source),
            None => IoError::other("filesystem loop detected while walking"),
        };
        match path {
            Some(path) => Self::Io(io_error.with_path(&path)),
            None => Self::Io(io_error),
        }
    }
}

impl Error {
    /// Whether this error comes from invalid user input rather than the environment
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Search(SearchError::InvalidPattern { .. })
        )
    }

    /// Whether this error was caused by the filesystem
    pub fn is_filesystem_error(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
