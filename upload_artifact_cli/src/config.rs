//! Layered configuration for the upload command
//!
//! Priority, lowest to highest: built-in defaults, the TOML config file,
//! `INPUT_*` environment variables (as set by CI runners) and explicit
//! command line flags.

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use upload_artifact_core::inputs::split_search_path;
use upload_artifact_core::{DEFAULT_ARTIFACT_NAME, NoFilesFoundAction, UploadInputs};

use crate::paths;

/// Prefix of the environment variables CI runners pass inputs through
pub const ENV_PREFIX: &str = "INPUT_";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    #[serde(deserialize_with = "deserialize_text")]
    pub name: String,
    pub individual: bool,
    /// Search path lines; a string is split on newlines
    #[serde(deserialize_with = "deserialize_lines")]
    pub path: Vec<String>,
    pub if_no_files_found: NoFilesFoundAction,
    pub retention_days: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_path")]
    pub store_dir: Option<PathBuf>,
    pub follow_symlinks: bool,
    #[serde(default, deserialize_with = "deserialize_optional_path")]
    pub working_directory: Option<PathBuf>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_ARTIFACT_NAME.to_string(),
            individual: false,
            path: Vec::new(),
            if_no_files_found: NoFilesFoundAction::default(),
            retention_days: None,
            store_dir: None,
            follow_symlinks: true,
            working_directory: None,
        }
    }
}

impl UploadSettings {
    /// Core inputs, with relative paths resolved against `cwd`
    pub fn to_inputs(&self, cwd: &Path) -> UploadInputs {
        let working_directory = match &self.working_directory {
            Some(dir) => cwd.join(dir),
            None => cwd.to_path_buf(),
        };

        UploadInputs::new(working_directory)
            .with_name(&self.name)
            .with_individual(self.individual)
            .with_search_path(&self.path)
            .with_if_no_files_found(self.if_no_files_found)
            .with_retention_days(self.retention_days)
    }

    /// Store directory, falling back to the per-user data directory
    pub fn store_dir(&self, cwd: &Path) -> PathBuf {
        match &self.store_dir {
            Some(dir) => cwd.join(dir),
            None => paths::get_store_dir(),
        }
    }
}

/// Values given on the command line; unset fields leave lower layers alone
#[derive(Serialize, Debug, Clone, Default)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_no_files_found: Option<NoFilesFoundAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_symlinks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<PathBuf>,
}

/// Configuration manager for the layered settings
pub struct ConfigManager {
    config_path: PathBuf,
    explicit: bool,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Use the default config file, if it exists
    pub fn new() -> Self {
        Self {
            config_path: paths::get_config_path(),
            explicit: false,
        }
    }

    /// Use a specific config file, which must exist
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            explicit: true,
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load settings with layered priority: CLI > ENV > File > Defaults
    pub fn load(&self, overrides: &CliOverrides) -> Result<UploadSettings> {
        let mut figment = Figment::new();

        // Layer 1: Defaults
        figment = figment.merge(Serialized::defaults(UploadSettings::default()));

        // Layer 2: Config file
        if self.config_path.exists() {
            log::debug!("Loading configuration from {}", self.config_path.display());
            figment = figment.merge(Toml::file(&self.config_path));
        } else if self.explicit {
            anyhow::bail!(
                "Configuration file not found: {}",
                self.config_path.display()
            );
        }

        // Layer 3: Environment variables, INPUT_IF-NO-FILES-FOUND style
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX).map(|key| key.as_str().replace('-', "_").into()),
        );

        // Layer 4: Command line
        figment = figment.merge(Serialized::defaults(overrides));

        figment.extract().context("Failed to load configuration")
    }
}

/// Free-text input; the environment provider types `2024` or `true`, but
/// an artifact name or path that looks like one is still text
#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    String(String),
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl From<Text> for String {
    fn from(text: Text) -> Self {
        match text {
            Text::String(s) => s,
            Text::Bool(b) => b.to_string(),
            Text::Unsigned(n) => n.to_string(),
            Text::Signed(n) => n.to_string(),
            Text::Float(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lines {
    One(Text),
    Many(Vec<Text>),
}

fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Text::deserialize(deserializer).map(String::from)
}

fn deserialize_optional_path<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<Text>::deserialize(deserializer)?;
    Ok(text.map(|text| PathBuf::from(String::from(text))))
}

fn deserialize_lines<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Lines::deserialize(deserializer)? {
        Lines::One(text) => split_search_path(&String::from(text)),
        Lines::Many(lines) => lines
            .into_iter()
            .flat_map(|line| split_search_path(&String::from(line)))
            .collect(),
    })
}
