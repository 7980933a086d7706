// objscope - interactive object graph browser
//
// Startup order:
// - CLI parsing; `config` subcommands exit early
// - Configuration (env > file > defaults, then CLI overrides)
// - Tracing: TUI log buffer or stderr, plus an optional JSON log file
// - Demo graph, then the TUI or a headless dump

use anyhow::Result;
use clap::Parser;
use objscope::browser::Browser;
use objscope::cli::{self, Cli, Commands};
use objscope::config::{Config, LogRotation, LoggingConfig};
use objscope::logging::{LogBuffer, TuiLogLayer};
use objscope::{demo, dump, tui};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// The browsing engine is single-threaded (Rc graph); the TUI loop runs on
// the current thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(Commands::Config { show, reset, path }) = cli.command {
        return cli::handle_config(show, reset, path);
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let mut config = Config::from_env()?;
    config.apply_overrides(cli.refresh, cli.theme.clone());

    let tui_mode = cli.command.is_none();
    let log_buffer = LogBuffer::new();
    // The guard must live until exit so buffered file logs are flushed
    let _file_guard = init_tracing(&config.logging, &log_buffer, tui_mode);

    let seed = chrono::Utc::now().timestamp_millis() as u64;
    let browser = Browser::new();
    let world = demo::populate(&browser, config.demo.entities, seed);
    tracing::debug!("Demo seed {}", seed);

    match cli.command {
        Some(Commands::Dump { depth, display }) => {
            let options = match display {
                Some(names) => cli::parse_display(&names)?,
                None => config.browser.display,
            };
            let mut out = std::io::stdout().lock();
            dump::write_tree(&browser, options, depth, &mut out)?;
        }
        _ => {
            tracing::info!("Starting TUI");
            tui::run_tui(browser, world, config, log_buffer).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}

/// Install the global subscriber
///
/// In TUI mode logs go to the in-memory buffer (anything written to the
/// terminal would garble the display); otherwise to stderr so stdout stays
/// clean for the dump. File logging, when enabled, adds a JSON layer.
///
/// Precedence: RUST_LOG env var > config file > default "info"
fn init_tracing(
    config: &LoggingConfig,
    log_buffer: &LogBuffer,
    tui_mode: bool,
) -> Option<WorkerGuard> {
    let default_filter = format!("objscope={}", config.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let (file_writer, guard) = match file_writer(config) {
        Some((writer, guard)) => (Some(writer), Some(guard)),
        None => (None, None),
    };
    let file_layer = file_writer.map(|writer| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
    });
    let buffer_layer = tui_mode.then(|| TuiLogLayer::new(log_buffer.clone()));
    let stderr_layer =
        (!tui_mode).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(buffer_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Rolling, non-blocking log file writer if file logging is enabled
fn file_writer(config: &LoggingConfig) -> Option<(NonBlocking, WorkerGuard)> {
    if !config.file_enabled {
        return None;
    }
    if let Err(e) = std::fs::create_dir_all(&config.file_dir) {
        // Tracing is not up yet
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            config.file_dir, e
        );
        return None;
    }

    let appender = match config.file_rotation {
        LogRotation::Hourly => tracing_appender::rolling::hourly(&config.file_dir, &config.file_prefix),
        LogRotation::Daily => tracing_appender::rolling::daily(&config.file_dir, &config.file_prefix),
        LogRotation::Never => tracing_appender::rolling::never(&config.file_dir, &config.file_prefix),
    };
    Some(tracing_appender::non_blocking(appender))
}
