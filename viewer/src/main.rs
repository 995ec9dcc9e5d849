mod state;
use state::State;

use anyhow::{anyhow, Context as _, Result};
use clap::Parser;
use ggez::{
    conf::{Conf, FullscreenType, WindowMode, WindowSetup},
    event, ContextBuilder,
};
use hifitime::Epoch;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Watch a star system go round.
#[derive(Parser, Debug)]
#[command(name = "viewer", disable_help_flag = true)]
struct Args {
    /// JSON5 solar system file
    #[arg(default_value = "systems/trappist1.json5")]
    system: PathBuf,
    /// Window width in pixels
    #[arg(short, long, default_value_t = 800)]
    width: u32,
    /// Window height in pixels
    #[arg(short, long, default_value_t = 600)]
    height: u32,
    /// Seconds between integration steps
    #[arg(short, long, default_value_t = 60.0)]
    step: f64,
    /// Julian date the simulation starts at. Defaults to now.
    #[arg(short = 'j', long)]
    start: Option<f64>,
    #[arg(short, long)]
    fullscreen: bool,
    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,
}

/// Julian date to start at: whatever was asked for, or the wall clock.
fn start_date(requested: Option<f64>) -> Result<f64> {
    match requested {
        Some(jd) => Ok(jd),
        None => Epoch::now()
            .map(|now| now.to_jde_utc_days())
            .map_err(|err| anyhow!("couldn't read the system clock: {}", err)),
    }
}

pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let start = start_date(args.start)?;

    // Load the system before a window ever shows up; a bad file should just bail.
    let contents = std::fs::read_to_string(&args.system)
        .with_context(|| format!("cannot open '{}' for reading", args.system.display()))?;
    let system = loader::load(&contents, start)
        .with_context(|| format!("cannot build a system from '{}'", args.system.display()))?;

    let c = Conf::new();
    let (ref mut ctx, ref mut event_loop) = ContextBuilder::new("orbit_simulator", "me")
        .conf(c)
        .window_setup(WindowSetup {
            title: format!("Orbit simulator! {}", args.system.display()),
            ..Default::default()
        })
        .window_mode(WindowMode {
            width: args.width as f32,
            height: args.height as f32,
            resizable: true,
            fullscreen_type: if args.fullscreen {
                FullscreenType::Desktop
            } else {
                FullscreenType::Windowed
            },
            ..Default::default()
        })
        .build()
        .map_err(|err| anyhow!("couldn't open a window: {}", err))?;

    let state = &mut State::new(ctx, system, start, args.step);

    event::run(ctx, event_loop, state).map_err(|err| anyhow!("event loop failed: {}", err))
}
