//! Neontris — neon falling-block puzzle game in the terminal.

mod app;
mod audio;
mod board;
mod effects;
mod game;
mod highscores;
mod input;
mod piece;
mod scoreboard;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing::{Level, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use audio::{AudioSink, Silent, TerminalBell};
use highscores::JsonFileStore;

/// Options derived from CLI that affect game behaviour.
#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    /// Fixed seed for the piece sequence; random when unset.
    pub seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        warn!(error = %e, "failed to load theme, using defaults");
        let mut theme = theme::Theme::default();
        theme.apply_palette(args.palette);
        theme
    });
    let store = JsonFileStore::new(
        args.scores_file
            .clone()
            .unwrap_or_else(highscores::default_path),
    );
    let audio = audio_sink(&args);
    let config = GameConfig { seed: args.seed };

    let mut app = App::new(&args, config, theme, store, audio);
    app.run()?;
    Ok(())
}

/// WAV cues when built with `sound` and an output device exists, the
/// terminal bell otherwise.
fn audio_sink(args: &Args) -> Box<dyn AudioSink> {
    if args.mute {
        return Box::new(Silent);
    }
    #[cfg(feature = "sound")]
    match audio::wav::WavPlayer::new(&args.sounds_dir) {
        Ok(player) => return Box::new(player),
        Err(e) => warn!("no audio device, falling back to the bell: {e}"),
    }
    Box::new(TerminalBell::new(std::io::stdout()))
}

/// Logs go to `--log-file` only; the terminal belongs to the game.
fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(LevelFilter::from_level(level))
        .init();
    Ok(())
}

/// Neon falling-block puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "neontris",
    version,
    about = "Neon falling-block puzzle game in the terminal. Fill rows to clear them; chain clears for combos.",
    long_about = "Neontris is a single-player falling-block puzzle game.\n\n\
        Steer the falling piece, fill complete rows to clear them and score. Clears within three \
        seconds of each other build a combo multiplier. Every ten lines the level rises and \
        pieces fall faster.\n\n\
        CONTROLS:\n  Left/Right or h/l  Move     Up or k/x  Rotate     Down or j  Soft drop\n  \
        P  Pause    Q / Esc  Quit\n\n\
        Top five scores are kept in the data directory (see --scores-file)."
)]
pub struct Args {
    /// Colour palette for blocks: normal or high-contrast.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses the neon theme if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// High-score file. Defaults to neontris/highscores.json in the user data directory.
    #[arg(long, value_name = "FILE")]
    pub scores_file: Option<PathBuf>,

    /// Target render frames per second.
    #[arg(long, default_value = "60", value_name = "FPS")]
    pub frame_rate: u32,

    /// Disable the terminal bell on clears, level-ups and game over.
    #[arg(long)]
    pub mute: bool,

    /// Directory holding line_clear.wav, block_drop.wav, game_over.wav and level_up.wav.
    #[cfg(feature = "sound")]
    #[arg(long, default_value = "assets/sounds", value_name = "DIR")]
    pub sounds_dir: PathBuf,

    /// Skip main menu and start game immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Seed for the piece sequence (reproducible games).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Write logs to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// More verbose logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,
}
