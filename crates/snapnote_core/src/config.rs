//! Configuration types for snapnote.
//!
//! [`Settings`] is the immutable snapshot the paste pipeline reads for one
//! operation. [`Config`] is what gets persisted as TOML (typically at
//! `~/.config/snapnote/config.toml` on Unix systems): the vault location plus
//! the settings, flattened.
//!
//! # Example
//!
//! ```ignore
//! use snapnote_core::config::Config;
//!
//! let config = Config::load()?;
//! let settings = config.settings();
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SnapnoteError};
use crate::fs::FileSystem;
use crate::path_utils::normalize_folder;

/// Options that shape one paste operation.
///
/// Field names also accept the camelCase spelling used by existing plugin
/// settings files (`imageFolder`, `imageNotesFolder`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder for pasted images; empty means the vault root
    #[serde(alias = "imageFolder")]
    pub image_folder: String,

    /// Folder for generated notes; empty means the vault root
    #[serde(alias = "imageNotesFolder")]
    pub image_notes_folder: String,

    /// Ask for a name and tags before anything is written
    #[serde(alias = "showPreviewModal")]
    pub show_preview_modal: bool,

    /// Record the image in an `asset` frontmatter property
    #[serde(alias = "includeAssetProperty")]
    pub include_asset_property: bool,

    /// Vault-relative template note; empty disables templating
    #[serde(alias = "templateFile")]
    pub template_file: String,
}

impl Settings {
    /// Copy with folder identifiers normalized (no surrounding `/`).
    pub fn normalized(&self) -> Self {
        Self {
            image_folder: normalize_folder(&self.image_folder),
            image_notes_folder: normalize_folder(&self.image_notes_folder),
            template_file: self.template_file.trim().to_string(),
            ..self.clone()
        }
    }

    /// Set an option by key, as given on the command line.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "image_folder" | "imageFolder" => self.image_folder = normalize_folder(value),
            "image_notes_folder" | "imageNotesFolder" => {
                self.image_notes_folder = normalize_folder(value)
            }
            "show_preview_modal" | "showPreviewModal" => {
                self.show_preview_modal = parse_bool(key, value)?
            }
            "include_asset_property" | "includeAssetProperty" => {
                self.include_asset_property = parse_bool(key, value)?
            }
            "template_file" | "templateFile" => self.template_file = value.trim().to_string(),
            _ => return Err(SnapnoteError::UnknownConfigKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(SnapnoteError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// `Config` is a data structure that represents the parts of snapnote that the user can configure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Vault directory that pasted images and notes are written into
    #[serde(alias = "vault")]
    pub default_vault: PathBuf,

    /// Paste options
    #[serde(flatten)]
    pub settings: Settings,
}

impl Config {
    /// Create a new config with the given vault directory
    pub fn new(default_vault: PathBuf) -> Self {
        Self {
            default_vault,
            settings: Settings::default(),
        }
    }

    /// Snapshot of the paste options for one operation.
    pub fn settings(&self) -> Settings {
        self.settings.normalized()
    }

    /// Set a config value by key (`vault` or any [`Settings`] key).
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "vault" | "default_vault" => {
                self.default_vault = PathBuf::from(value);
                Ok(())
            }
            _ => self.settings.set(key, value),
        }
    }

    /// Load config from a specific path using a FileSystem.
    pub fn load_from<FS: FileSystem>(fs: &FS, path: &Path) -> Result<Self> {
        let contents = fs
            .read_to_string(path)
            .map_err(|e| SnapnoteError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to a specific path using a FileSystem.
    pub fn save_to<FS: FileSystem>(&self, fs: &FS, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs.create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs.write_file(path, &contents)
            .map_err(|e| SnapnoteError::FileWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(())
    }

    /// Load config from a FileSystem, returning a default if not found.
    pub fn load_from_or_default<FS: FileSystem>(
        fs: &FS,
        path: &Path,
        default_vault: PathBuf,
    ) -> Self {
        match Self::load_from(fs, path) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Using default config ({})", e);
                Self::new(default_vault)
            }
        }
    }
}

// ============================================================================
// Native-only implementation (not available in WASM)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl Default for Config {
    fn default() -> Self {
        let default_base = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("snapnote");

        Self::new(default_base)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Config {
    /// Get the config file path (~/.config/snapnote/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("snapnote").join("config.toml"))
    }

    /// Load config from default location, or return default if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            let contents = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            return Ok(config);
        }

        // Return default config if file doesn't exist
        Ok(Config::default())
    }

    /// Save config to default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(SnapnoteError::NoConfigDir)?;

        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        Ok(())
    }

    /// Initialize config with a vault directory and save it
    pub fn init(default_vault: PathBuf) -> Result<Self> {
        let config = Config::new(default_vault);
        config.save()?;
        Ok(config)
    }
}
