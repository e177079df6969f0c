// SPDX-License-Identifier: MPL-2.0
//! This module handles the editor's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[editor]` - History capacity and adjustment debounce window
//! - `[export]` - Default output format, quality and filename suffix
//! - `[remote]` - Processing service base URL and timeout
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `CLARIFI_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use clarifi_studio::config::{self, Config};
//!
//! let (mut config, _warning) = config::load();
//! config.editor.history_capacity = Some(20);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::domain::editing::{ExportQuality, HistoryCapacity};
use crate::error::{Error, Result};
use crate::media::codec::ExportFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "Clarifi";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "CLARIFI_CONFIG_DIR";

// =============================================================================
// Section Structs
// =============================================================================

/// Editing session settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorConfig {
    /// Number of undo snapshots kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_capacity: Option<usize>,

    /// Quiet period before slider changes are committed (ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: Some(DEFAULT_HISTORY_CAPACITY),
            debounce_ms: Some(DEFAULT_DEBOUNCE_MS),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,

    /// Lossy quality in 0.0..=1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,

    /// Suffix in `{name}_{suffix}.{ext}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: Some(ExportFormat::default()),
            quality: Some(DEFAULT_EXPORT_QUALITY),
            suffix: Some(DEFAULT_EXPORT_SUFFIX.to_string()),
        }
    }
}

/// Remote processing service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_REMOTE_BASE_URL.to_string()),
            timeout_secs: Some(DEFAULT_REMOTE_TIMEOUT_SECS),
        }
    }
}

// =============================================================================
// Main Config
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Config {
    /// History capacity, clamped to the supported range.
    #[must_use]
    pub fn history_capacity(&self) -> HistoryCapacity {
        self.editor
            .history_capacity
            .map_or_else(HistoryCapacity::default, HistoryCapacity::new)
    }

    /// Debounce window, capped at [`MAX_DEBOUNCE_MS`].
    #[must_use]
    pub fn debounce(&self) -> Duration {
        let ms = self
            .editor
            .debounce_ms
            .unwrap_or(DEFAULT_DEBOUNCE_MS)
            .min(MAX_DEBOUNCE_MS);
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn export_format(&self) -> ExportFormat {
        self.export.format.unwrap_or_default()
    }

    #[must_use]
    pub fn export_quality(&self) -> ExportQuality {
        self.export
            .quality
            .map_or_else(ExportQuality::default, ExportQuality::new)
    }

    #[must_use]
    pub fn export_suffix(&self) -> &str {
        self.export
            .suffix
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_EXPORT_SUFFIX)
    }

    #[must_use]
    pub fn remote_base_url(&self) -> &str {
        self.remote
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_REMOTE_BASE_URL)
    }

    #[must_use]
    pub fn remote_timeout(&self) -> Duration {
        let secs = self
            .remote
            .timeout_secs
            .unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS)
            .clamp(MIN_REMOTE_TIMEOUT_SECS, MAX_REMOTE_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}

// =============================================================================
// Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    let dir = base_dir
        .or_else(|| std::env::var_os(ENV_CONFIG_DIR).map(PathBuf::from))
        .or_else(|| dirs::config_dir().map(|path| path.join(APP_NAME)))?;
    Some(dir.join(CONFIG_FILE))
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default location.
///
/// Returns the config plus an optional warning when an existing file could
/// not be parsed (defaults are used in that case).
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable config");
                    return (Config::default(), Some(err.to_string()));
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
