//! Application configuration

use std::path::PathBuf;

use anyrouter_config_core::types::{BUILTIN_PROVIDER_KEYS, STORAGE_KEY};
use serde::{Deserialize, Serialize};

/// Directory name under the platform data directory
const APP_DIR_NAME: &str = "anyrouter-config";

/// Where and under which key the configuration document lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Directory the document file is written to
    pub data_dir: PathBuf,
    /// Storage key (file stem of the document)
    pub storage_key: String,
    /// Provider identifiers offered without a custom definition
    pub builtin_providers: Vec<String>,
}

impl AppConfig {
    /// Platform default data directory:
    /// - Linux: `~/.local/share/anyrouter-config/`
    /// - macOS: `~/Library/Application Support/anyrouter-config/`
    /// - Windows: `%LOCALAPPDATA%/anyrouter-config/`
    ///
    /// Falls back to the working directory when the platform has none.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }

    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    #[must_use]
    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            storage_key: STORAGE_KEY.to_string(),
            builtin_providers: BUILTIN_PROVIDER_KEYS.iter().map(ToString::to_string).collect(),
        }
    }
}
