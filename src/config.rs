/// Command-line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::audio::DEFAULT_SAMPLE_RATE;

#[derive(Parser, Debug, Clone)]
#[command(name = "hotdog_game")]
#[command(about = "Defend the picnic: a condiment-flinging Space Invaders clone for the terminal")]
pub struct Config {
    /// Directory holding hotdog.sprite, ketchup.sprite and mustard.sprite
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Target frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(10..=240))]
    pub fps: u32,

    /// Disable sound cues
    #[arg(long)]
    pub mute: bool,

    /// Seed for enemy and projectile condiments (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where log output goes; the terminal itself is the game screen
    #[arg(long, default_value = "hotdog.log")]
    pub log_file: PathBuf,

    /// Sample rate for synthesized cues, in Hz
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,
}

impl Config {
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }
}
