//! Viewer configuration.
//!
//! Settings can be supplied as JSON (a file on native builds, a string from
//! the host page on the web). Every field is optional; missing fields take
//! their defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LINK_TEXT, DEFAULT_SCALE_STEP, DEFAULT_WINDOW_RADIUS};

/// Log level setting for the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Parse a level name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Rewrites an image path into the path of a variant of that image.
///
/// Replaces the first occurrence of `from` with `to`; a path without `from`
/// is returned unchanged. Typical use is a folder swap such as
/// `"/scans/"` → `"/scans/thumbs/"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRewrite {
    /// Text to look for
    pub from: String,
    /// Replacement text
    pub to: String,
}

impl PathRewrite {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn apply(&self, path: &str) -> String {
        if self.from.is_empty() {
            return path.to_string();
        }
        path.replacen(&self.from, &self.to, 1)
    }
}

/// Settings for one viewer instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Images built on each side of a target before the rest of the gallery
    pub window_radius: usize,

    /// Scale change per enlarge/shrink command
    pub scale_step: f32,

    /// Text for an image's external link
    pub link_text: String,

    /// Show the folder path and subfolder links above the gallery
    pub show_extra_info: bool,

    /// Folder to open when the page has no `folder` parameter
    pub folder: String,

    /// Derives a thumbnail path from an image path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_rewrite: Option<PathRewrite>,

    /// Derives the path opened by "view in a separate window"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_rewrite: Option<PathRewrite>,

    /// Log verbosity level
    pub log_level: LogLevel,
}

impl ViewerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            window_radius: DEFAULT_WINDOW_RADIUS,
            scale_step: DEFAULT_SCALE_STEP,
            link_text: DEFAULT_LINK_TEXT.to_string(),
            show_extra_info: true,
            folder: String::new(),
            thumbnail_rewrite: None,
            large_rewrite: None,
            log_level: LogLevel::default(),
        }
    }

    /// Thumbnail path for an image, if a thumbnail rewrite is configured.
    pub fn thumbnail_path(&self, source_path: &str) -> Option<String> {
        self.thumbnail_rewrite
            .as_ref()
            .map(|rewrite| rewrite.apply(source_path))
    }

    /// Path to open for "view in a separate window".
    pub fn large_path(&self, source_path: &str) -> String {
        match &self.large_rewrite {
            Some(rewrite) => rewrite.apply(source_path),
            None => source_path.to_string(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "folio-config.json"
    }

    /// Get the default config file path.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("folio").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("folio")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.window_radius, 10);
        assert_eq!(config.scale_step, 0.3);
        assert_eq!(config.link_text, "Link");
        assert!(config.show_extra_info);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ViewerConfig::from_json(r#"{"window_radius": 3, "log_level": "debug"}"#)
            .unwrap();
        assert_eq!(config.window_radius, 3);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.scale_step, 0.3);
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = ViewerConfig::new();
        config.folder = "scans/".to_string();
        config.thumbnail_rewrite = Some(PathRewrite::new("/full/", "/thumbs/"));
        let json = config.to_json().unwrap();
        assert_eq!(ViewerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_version_too_new() {
        let result = ViewerConfig::from_json(r#"{"version": 99}"#);
        assert!(matches!(
            result,
            Err(ConfigError::VersionTooNew {
                file_version: 99,
                supported_version: CONFIG_VERSION
            })
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ViewerConfig::from_json("{window_radius:"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_path_rewrites() {
        let rewrite = PathRewrite::new("/full/", "/thumbs/");
        assert_eq!(rewrite.apply("site/full/a.jpg"), "site/thumbs/a.jpg");
        assert_eq!(rewrite.apply("site/other/a.jpg"), "site/other/a.jpg");
        assert_eq!(PathRewrite::new("", "x").apply("a.jpg"), "a.jpg");

        let mut config = ViewerConfig::new();
        assert_eq!(config.thumbnail_path("a.jpg"), None);
        assert_eq!(config.large_path("a.jpg"), "a.jpg");
        config.large_rewrite = Some(PathRewrite::new(".jpg", "_large.jpg"));
        assert_eq!(config.large_path("a.jpg"), "a_large.jpg");
    }

    #[test]
    fn test_log_level_names() {
        assert_eq!(LogLevel::from_name("WARN"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_name(" trace "), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_name("loud"), None);
        assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    }
}
