//! Upload Artifact CLI Library
//!
//! Configuration, output formatting and terminal integration for the
//! `upload-artifact` binary.

pub mod config;
pub mod error;
pub mod output;
pub mod paths;
pub mod sink;
pub mod terminal;

pub use config::{CliOverrides, ConfigManager, UploadSettings};
pub use error::{CliError, CliResult, ErrorContext, ExitCode};
pub use sink::WorkflowSink;
