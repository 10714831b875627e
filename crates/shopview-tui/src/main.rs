//! `shopview-tui`: terminal browser for a remote product catalogue.
//!
//! Built on [ratatui](https://ratatui.rs). The catalogue is fetched once in
//! the background; the screen shows a throbber while loading, then the
//! product table filtered live by the search box.
//!
//! Logs go to a file (default `/tmp/shopview-tui.log`) so they never
//! corrupt the terminal.

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
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use shopview_core::{Catalogue, CatalogueConfig};

use crate::app::App;

/// Terminal browser for product catalogues.
#[derive(Parser, Debug)]
#[command(name = "shopview-tui", version, about)]
struct Cli {
    /// Named catalogue source from the config file
    #[arg(short = 'S', long, env = "SHOPVIEW_SOURCE")]
    source: Option<String>,

    /// Catalogue endpoint URL (overrides the source's endpoint)
    #[arg(short = 'e', long, env = "SHOPVIEW_ENDPOINT")]
    endpoint: Option<String>,

    /// Log file path (defaults to /tmp/shopview-tui.log)
    #[arg(long, default_value = "/tmp/shopview-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may be logged to stdout/stderr while
/// the terminal is in raw mode. The returned guard flushes on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("shopview_tui={log_level},shopview_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("shopview-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Resolve the catalogue to browse: `--endpoint` wins, otherwise the named
/// (or default) source from the shared config file.
fn resolve_catalogue(cli: &Cli) -> Result<CatalogueConfig> {
    let cfg = shopview_config::load_config_or_default();

    if let Some(ref raw) = cli.endpoint {
        let mut source = shopview_config::Source::new(raw.clone());
        if let Some(ref name) = cli.source {
            let named = cfg.source(name)?;
            source.timeout = named.timeout;
            source.user_agent = named.user_agent;
        }
        return Ok(shopview_config::source_to_catalogue_config(
            &source,
            &cfg.defaults,
        )?);
    }

    let name = cfg.active_source_name(cli.source.as_deref());
    Ok(shopview_config::resolve_source(&cfg, &name)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_tracing(&cli);

    tui::install_hooks()?;

    let catalogue_config = resolve_catalogue(&cli)?;
    info!(endpoint = %catalogue_config.endpoint, "starting shopview-tui");

    let catalogue = Catalogue::from_config(&catalogue_config)?;
    let mut app = App::new(catalogue);
    app.run().await?;

    Ok(())
}
