//! Errors raised by an upload collaborator before the transfer starts
//!
//! Partial failures are not errors: they come back as failed items in the
//! upload response and are classified by the upload policy.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    /// The artifact name contains characters the store cannot accept
    #[error("Artifact name '{name}' is not valid: {reason}")]
    InvalidName { name: String, reason: String },

    /// An artifact with the same name was already uploaded
    #[error("An artifact with the name '{name}' already exists")]
    ArtifactExists { name: String },
}

impl TransferError {
    pub fn invalid_name(name: &str, reason: &str) -> Self {
        Self::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn artifact_exists(name: &str) -> Self {
        Self::ArtifactExists {
            name: name.to_string(),
        }
    }
}
