//! `kennel` — terminal UI for managing a personal dog collection.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `kennel-core`'s [`SnapshotStream`](kennel_core::SnapshotStream). One
//! screen: a card grid of dog records, with a modal form for adding and
//! editing, a confirm dialog for removal, and toast notifications.
//!
//! Logs are written to a file (default `/tmp/kennel.log`) to avoid
//! corrupting the terminal UI. A background data bridge task streams
//! collection updates from the controller into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and
//! app launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use kennel_core::{Controller, StoreConfig, TlsVerification};

use crate::app::App;

/// Terminal UI for a personal dog collection.
#[derive(Parser, Debug)]
#[command(name = "kennel", version, about)]
struct Cli {
    /// Record store URL (e.g., https://dogs.example.com)
    #[arg(short = 's', long, env = "KENNEL_SERVER")]
    server: Option<String>,

    /// Profile name from the config file
    #[arg(short = 'p', long)]
    profile: Option<String>,

    /// Skip TLS certificate verification (self-signed stores)
    #[arg(long)]
    insecure: bool,

    /// Log file path (defaults to /tmp/kennel.log)
    #[arg(long, default_value = "/tmp/kennel.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "kennel_tui={log_level},kennel_core={log_level},kennel_api={log_level}"
        ))
    });

    let log_dir = cli.log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("kennel.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the store config: CLI flags win over the config file.
fn build_store_config(cli: &Cli) -> Result<StoreConfig> {
    if let Some(ref server) = cli.server {
        let url = server
            .parse()
            .wrap_err_with(|| format!("invalid store URL: {server}"))?;
        let mut config = StoreConfig::new(url);
        if cli.insecure {
            config.tls = TlsVerification::DangerAcceptInvalid;
        }
        return Ok(config);
    }

    let cfg = kennel_config::load_config().wrap_err("failed to load config file")?;
    kennel_config::resolve_store_config(&cfg, cli.profile.as_deref()).map_err(|e| {
        eyre!(
            "no record store configured: {e}\n\
             Pass --server <url> or add a profile to {}",
            kennel_config::config_path().display()
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let config = build_store_config(&cli)?;
    info!(url = %config.url, "starting kennel");

    let controller = Controller::new(config).wrap_err("failed to build the store client")?;
    let mut app = App::new(controller);
    app.run().await?;

    Ok(())
}
