// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - (none): browse the demo world in the TUI
// - config --show|--path|--reset: manage configuration
// - dump: print the demo world as an indented tree

use crate::config::{Config, VERSION};
use crate::browser::DisplayOptions;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;

/// objscope - interactive object graph browser
#[derive(Parser, Debug)]
#[command(name = "objscope")]
#[command(version = VERSION)]
#[command(about = "Browse a live object graph from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Children refresh interval in seconds (0.01 - 1.0)
    #[arg(long, global = true)]
    pub refresh: Option<f64>,

    /// Theme name: dark, light, mono
    #[arg(long, global = true)]
    pub theme: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Print the demo object graph as a tree
    Dump {
        /// Levels to expand below the roots
        #[arg(long, default_value_t = 3)]
        depth: usize,

        /// Member categories, comma separated (fields,properties,backing_fields)
        #[arg(long, value_delimiter = ',')]
        display: Option<Vec<String>>,
    },
}

/// Parse the `--display` list; unknown names are an error here
pub fn parse_display(names: &[String]) -> Result<DisplayOptions> {
    let (options, unknown) = DisplayOptions::from_names(names.iter().map(String::as_str));
    if !unknown.is_empty() {
        bail!(
            "unknown display option(s): {} (expected {})",
            unknown.join(", "),
            DisplayOptions::NAMES.join(", ")
        );
    }
    Ok(options)
}

/// Handle the `config` subcommand
pub fn handle_config(show: bool, reset: bool, path: bool) -> Result<()> {
    if path {
        handle_config_path()
    } else if show {
        handle_config_show()
    } else if reset {
        handle_config_reset()
    } else {
        // No flag provided, show help
        println!("Usage: objscope config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
        Ok(())
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::from_env()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating directory {}", parent.display()))?;
    }

    // Config's single source of truth for the file format
    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Error writing {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "objscope",
            "dump",
            "--depth",
            "2",
            "--display",
            "fields,properties",
            "--refresh",
            "0.5",
        ])
        .unwrap();
        assert_eq!(cli.refresh, Some(0.5));
        match cli.command {
            Some(Commands::Dump { depth, display }) => {
                assert_eq!(depth, 2);
                let options = parse_display(&display.unwrap()).unwrap();
                assert_eq!(options, DisplayOptions::default());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn no_subcommand_runs_the_browser() {
        let cli = Cli::try_parse_from(["objscope", "--theme", "mono"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.theme.as_deref(), Some("mono"));
    }

    #[test]
    fn unknown_display_option_is_rejected() {
        let err = parse_display(&["fields".to_string(), "methods".to_string()]).unwrap_err();
        assert!(err.to_string().contains("methods"));
    }
}
