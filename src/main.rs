use std::fs::File;
use std::io::{stdout, BufWriter};
use std::sync::{mpsc, Mutex};
use std::thread;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    terminal,
    tty::IsTty,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

use hotdog_game::assets::Assets;
use hotdog_game::audio::CuePlayer;
use hotdog_game::compute::Session;
use hotdog_game::config::Config;
use hotdog_game::display::Renderer;
use hotdog_game::driver::FrameDriver;
use hotdog_game::error::GameError;
use hotdog_game::terminal::{TerminalGuard, TerminalSurface};

fn init_logging(config: &Config) -> anyhow::Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(seed = ?config.seed, assets = %config.assets.display(), "starting hotdog game");

    // The surface must exist before anything else starts.
    if !stdout().is_tty() {
        return Err(GameError::SurfaceUnavailable("stdout is not a terminal".into()).into());
    }
    let (cols, rows) = terminal::size().context("cannot query terminal size")?;
    let mut surface = TerminalSurface::new(BufWriter::new(stdout()), cols, rows)?;

    let mut session = Session::new(rng);
    let renderer = Renderer::new(session.rng());
    let assets = Assets::load_from(&config.assets);
    let cues = if config.mute {
        CuePlayer::silent()
    } else {
        CuePlayer::open_default(config.sample_rate)
    };
    let mut driver = FrameDriver::new(session, renderer, assets, cues);

    // Restores the terminal on every exit path from here on, including a
    // failed setup step.
    let terminal_guard = TerminalGuard::enter(stdout())?;

    // Dedicate a thread to blocking event reads so the frame loop never
    // waits on input.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = driver.run(&mut surface, &rx, config.frame_duration());

    drop(terminal_guard);

    info!(
        score = driver.session.score,
        wave = driver.session.wave,
        "session ended"
    );
    result.map_err(Into::into)
}
