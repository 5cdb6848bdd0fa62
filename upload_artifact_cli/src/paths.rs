//! Centralized path management for the upload-artifact CLI
//!
//! Default locations for the local artifact store and the configuration
//! file.

use std::path::PathBuf;

/// The name of the application directory used across all platforms
const APP_DIR: &str = "upload-artifact";

/// The name of the artifact store subdirectory
const STORE_SUBDIR: &str = "store";

/// The name of the configuration file
const CONFIG_FILE: &str = "config.toml";

/// Returns the base data directory for the application
///
/// On Linux this is `~/.local/share/upload-artifact` (or under
/// `XDG_DATA_HOME`), on Windows `%APPDATA%/upload-artifact`. Falls back to
/// `.upload-artifact` in the current directory.
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".upload-artifact"))
}

/// Returns the default local artifact store directory
pub fn get_store_dir() -> PathBuf {
    get_data_dir().join(STORE_SUBDIR)
}

/// Returns the configuration directory
///
/// Kept apart from the data directory to follow platform conventions.
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".upload-artifact"))
}

/// Returns the default configuration file path
pub fn get_config_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE)
}
