//! Browser and demo-world configuration

use crate::browser::DisplayOptions;
use serde::Deserialize;
use std::time::Duration;

/// Smallest refresh interval offered by the front-end (seconds)
pub const MIN_REFRESH_SECS: f64 = 0.01;
/// Largest refresh interval offered by the front-end (seconds)
pub const MAX_REFRESH_SECS: f64 = 1.0;
/// Default refresh interval (seconds)
pub const DEFAULT_REFRESH_SECS: f64 = 0.1;

/// Clamp a refresh interval to the supported range
///
/// Non-finite values fall back to the default.
pub fn clamp_refresh(secs: f64) -> f64 {
    if !secs.is_finite() {
        return DEFAULT_REFRESH_SECS;
    }
    secs.clamp(MIN_REFRESH_SECS, MAX_REFRESH_SECS)
}

// ─────────────────────────────────────────────────────────────────────────────
// Browser
// ─────────────────────────────────────────────────────────────────────────────

/// Browsing defaults for new sessions
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserConfig {
    /// Children refresh interval in seconds (clamped to 0.01..=1.0)
    pub refresh_interval: f64,
    /// Member categories listed by the reflective handler
    pub display: DisplayOptions,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_SECS,
            display: DisplayOptions::default(),
        }
    }
}

impl BrowserConfig {
    pub fn refresh_duration(&self) -> Duration {
        Duration::from_secs_f64(clamp_refresh(self.refresh_interval))
    }
}

/// Browser settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileBrowser {
    pub refresh_interval: Option<f64>,
    pub display: Option<Vec<String>>,
}

impl BrowserConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileBrowser>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let display = match file.display {
            Some(names) => {
                let (options, unknown) =
                    DisplayOptions::from_names(names.iter().map(String::as_str));
                if !unknown.is_empty() {
                    eprintln!("Ignoring unknown display options: {}", unknown.join(", "));
                }
                options
            }
            None => defaults.display,
        };

        Self {
            refresh_interval: file
                .refresh_interval
                .map(clamp_refresh)
                .unwrap_or(defaults.refresh_interval),
            display,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Demo world
// ─────────────────────────────────────────────────────────────────────────────

/// Size and pace of the demo object graph
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Entities spawned at startup
    pub entities: usize,
    /// Milliseconds between world steps
    pub step_millis: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            entities: 6,
            step_millis: 250,
        }
    }
}

/// Demo settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileDemo {
    pub entities: Option<usize>,
    pub step_millis: Option<u64>,
}

impl DemoConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileDemo>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            entities: file.entities.unwrap_or(defaults.entities),
            step_millis: file.step_millis.unwrap_or(defaults.step_millis).max(10),
        }
    }
}
