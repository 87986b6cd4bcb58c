//! Reel - a terminal carousel viewer for JSON slide decks.
//!
//! # Usage
//!
//! ```bash
//! reel deck.json
//! reel --watch deck.json
//! reel --slide-width 32 deck.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use reel::app::App;
use reel::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use reel::perf;

/// A terminal carousel viewer for JSON slide decks
#[derive(Parser, Debug)]
#[command(name = "reel", version, about, long_about = None)]
struct Cli {
    /// Deck file to view
    #[arg(value_name = "DECK")]
    deck: PathBuf,

    /// Watch the deck file for changes and auto-reload
    #[arg(short, long)]
    watch: bool,

    /// Disable inline image rendering (show placeholders only)
    #[arg(long)]
    no_images: bool,

    /// Override every row's slide width, in columns
    #[arg(long, value_name = "COLS")]
    slide_width: Option<u16>,

    /// Enable startup performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed render/image debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Force image rendering to use half-cell fallback mode
    #[arg(long)]
    force_half_cell: bool,

    /// Save current command-line flags as defaults in .reelrc
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in .reelrc
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("REEL_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        eprintln!(
            "[warn] Failed to initialize render debug log {}: {}",
            render_debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            err
        );
    }

    // Verify the deck exists before touching the terminal
    if !cli.deck.exists() {
        anyhow::bail!("Deck not found: {}", cli.deck.display());
    }

    let mut app = App::new(cli.deck)
        .with_watch(effective.watch)
        .with_images_enabled(!effective.no_images)
        .with_force_half_cell(effective.force_half_cell)
        .with_slide_width(effective.slide_width);

    app.run().context("Application error")
}
