//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `MVB_ROOT_FOLDER`
//! 3. TOML config file `root_folder` key
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable config file never stops startup; defaults are
//! used and the rejection is returned as a [`ConfigSource`] for the caller to
//! log as a warning.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "MVB_ROOT_FOLDER";

/// Environment variable pointing at a TOML config file
pub const CONFIG_FILE_ENV: &str = "MVB_CONFIG";

/// Database file created inside the root folder
pub const DATABASE_FILE_NAME: &str = "movie-records.db";

/// Contents of the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Folder holding the database
    pub root_folder: Option<PathBuf>,
    /// Catalog CSV used to seed an empty database
    pub catalog_csv: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub recommendation: RecommendationSettings,
}

/// `[logging]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `[recommendation]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecommendationSettings {
    /// Size of the watch-history recommendation list (default: 6)
    pub result_count: usize,
    /// Similar movies requested per liked movie (default: 3)
    pub similar_per_liked: usize,
    /// Rows fetched for the top-ten fallback (default: 10)
    pub fallback_pool_limit: usize,
    /// Vocabulary cap for the feature vectorizer (default: 10000)
    pub max_features: usize,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            result_count: 6,
            similar_per_liked: 3,
            fallback_pool_limit: 10,
            max_features: 10_000,
        }
    }
}

impl TomlConfig {
    /// Parse a config file, failing on I/O or syntax errors
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse config file contents
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load the config file if one can be found, otherwise fall back to
    /// defaults. Nothing is logged; see [`ConfigSource::log`].
    pub fn load_from(explicit: Option<&Path>) -> (Self, ConfigSource) {
        let Some(path) = config_file_path(explicit) else {
            return (Self::default(), ConfigSource::Defaults);
        };

        match Self::load(&path) {
            Ok(config) => (config, ConfigSource::File(path)),
            Err(e) => (
                Self::default(),
                ConfigSource::Rejected {
                    path,
                    reason: e.to_string(),
                },
            ),
        }
    }
}

/// Where the active configuration came from
///
/// Config is read before the tracing subscriber exists, so the outcome is
/// returned and logged once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No config file found
    Defaults,
    /// Parsed from this file
    File(PathBuf),
    /// File found but unreadable or malformed; defaults used instead
    Rejected { path: PathBuf, reason: String },
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::Defaults => info!("No config file found, using defaults"),
            ConfigSource::File(path) => info!("Loaded config file: {}", path.display()),
            ConfigSource::Rejected { path, reason } => {
                warn!("Ignoring config file {}: {}", path.display(), reason)
            }
        }
    }
}

/// Locate the config file: explicit path, then `MVB_CONFIG`, then the
/// platform config directory (only if the file exists there)
pub fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir()
        .map(|d| d.join("mvb").join("config.toml"))
        .filter(|p| p.exists())
}

/// Resolve the root folder following the documented priority order
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mvb"))
        .unwrap_or_else(|| PathBuf::from("./mvb_data"))
}

/// Database file inside a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}
