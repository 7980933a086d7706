//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;
use crate::browser::DisplayOptions;

impl Config {
    /// Render the display option list as a TOML array
    fn display_to_toml(&self) -> String {
        let names: Vec<String> = self
            .browser
            .display
            .names()
            .iter()
            .map(|name| format!("\"{}\"", name))
            .collect();
        format!("[{}]", names.join(", "))
    }

    /// Serialize config to TOML format
    pub fn to_toml(&self) -> String {
        format!(
            r#"# objscope configuration

# Theme: dark, light, mono
theme = "{theme}"

# Show the logs panel at startup (toggle with 'L')
show_logs = {show_logs}

# Browsing defaults
[browser]
# Seconds between children refreshes ({min} - {max})
refresh_interval = {refresh:?}
# Member categories: {all_options}
display = {display}

# Demo object graph
[demo]
entities = {entities}
step_millis = {step_millis}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            theme = self.theme,
            show_logs = self.show_logs,
            min = super::MIN_REFRESH_SECS,
            max = super::MAX_REFRESH_SECS,
            refresh = self.browser.refresh_interval,
            all_options = DisplayOptions::NAMES.join(", "),
            display = self.display_to_toml(),
            entities = self.demo.entities,
            step_millis = self.demo.step_millis,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string().replace('\\', "/"),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
