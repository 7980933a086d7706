//! Configuration for the browser front-end
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/objscope/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! Command-line overrides (`--refresh`, `--theme`) are applied on top by `main`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod browser;
mod observability;
mod serialization;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use browser::{
    clamp_refresh, BrowserConfig, DemoConfig, FileBrowser, FileDemo, DEFAULT_REFRESH_SECS,
    MAX_REFRESH_SECS, MIN_REFRESH_SECS,
};
pub use observability::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the theme
pub const ENV_THEME: &str = "OBJSCOPE_THEME";
/// Environment variable overriding the refresh interval (seconds)
pub const ENV_REFRESH: &str = "OBJSCOPE_REFRESH";
/// Environment variable overriding the demo entity count
pub const ENV_ENTITIES: &str = "OBJSCOPE_ENTITIES";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Theme name: "dark", "light", "mono"
    pub theme: String,

    /// Show the logs panel at startup
    pub show_logs: bool,

    /// Session defaults
    pub browser: BrowserConfig,

    /// Demo object graph
    pub demo: DemoConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            show_logs: false,
            browser: BrowserConfig::default(),
            demo: DemoConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub theme: Option<String>,
    pub show_logs: Option<bool>,

    /// Optional [browser] section
    pub browser: Option<FileBrowser>,

    /// Optional [demo] section
    pub demo: Option<FileDemo>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/objscope/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("objscope").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        // Config::default().to_toml() is the single source of truth
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load the config file at `path`, if present
    ///
    /// A file that exists but cannot be read or parsed is an error: a broken
    /// config should fail fast, not silently fall back to defaults.
    fn load_file_config(path: &Path) -> Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).with_context(|| {
                format!(
                    "Failed to parse {} (to reset it, run `objscope config --reset`)",
                    path.display()
                )
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read {}", path.display())),
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::load_file_config(&path)?,
            None => FileConfig::default(),
        };
        Ok(Self::from_sources(file, |key| std::env::var(key).ok()))
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        // Theme: env > file > default
        let theme = env(ENV_THEME)
            .or(file.theme)
            .unwrap_or_else(|| "dark".to_string());

        let show_logs = file.show_logs.unwrap_or(false);

        // Refresh interval: env > file > default, always clamped
        let mut browser = BrowserConfig::from_file(file.browser);
        if let Some(secs) = env(ENV_REFRESH).and_then(|v| v.trim().parse::<f64>().ok()) {
            browser.refresh_interval = clamp_refresh(secs);
        }

        // Entity count: env > file > default
        let mut demo = DemoConfig::from_file(file.demo);
        if let Some(count) = env(ENV_ENTITIES).and_then(|v| v.trim().parse::<usize>().ok()) {
            demo.entities = count;
        }

        let logging = LoggingConfig::from_file(file.logging);

        Self {
            theme,
            show_logs,
            browser,
            demo,
            logging,
        }
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, refresh: Option<f64>, theme: Option<String>) {
        if let Some(secs) = refresh {
            self.browser.refresh_interval = clamp_refresh(secs);
        }
        if let Some(theme) = theme {
            self.theme = theme;
        }
    }
}
