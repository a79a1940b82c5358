//! Sludge Sweeper entry point
//!
//! Native builds run the simulation headless with a simple autopilot, which
//! is handy for soak-testing balance changes. The browser build enters
//! through `sludge_sweeper::web`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;

    use sludge_sweeper::sim::{GameEvent, GameMode, GameState, InputEvent, TickInput, TouchDrag, tick};
    use sludge_sweeper::{NullAudio, Settings, Tuning, logical_arena};

    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// RNG seed for the run
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Number of frames to simulate
        #[arg(long, default_value_t = 60 * 60 * 5)]
        frames: u64,

        /// JSON file with tuning overrides
        #[arg(long, value_name = "FILE")]
        tuning: Option<PathBuf>,

        /// Use the portrait arena (600x800)
        #[arg(long)]
        portrait: bool,

        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    }

    /// Kite away from the closest sludge while swinging at it
    fn autopilot(state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        match state.mode {
            GameMode::UpgradeSelect => {
                input.events.push(InputEvent::SelectUpgrade(0));
                return input;
            }
            GameMode::Running => {}
            _ => return input,
        }

        let center = state.player.center();
        let Some(nearest) = state
            .particles
            .iter()
            .min_by(|a, b| a.pos.distance(center).total_cmp(&b.pos.distance(center)))
        else {
            return input;
        };

        input.pointer = Some(nearest.pos);
        if nearest.pos.distance(center) < state.player.sword_length * 0.6 {
            // Drag away from the threat, the way a touch player would
            let away = (center - nearest.pos).normalize_or_zero() * 40.0;
            input.touch = Some(TouchDrag {
                start: center,
                current: center + away,
            });
        }
        input
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();

        let tuning = match &args.tuning {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading tuning file {}", path.display()))?;
                Tuning::from_json(&json)
                    .with_context(|| format!("parsing tuning file {}", path.display()))?
            }
            None => Tuning::default(),
        };

        let arena: Vec2 = logical_arena(args.portrait);
        let mut state = GameState::with_config(args.seed, tuning, Settings::default(), arena);
        log::info!("Sludge Sweeper (headless) seed={} frames={}", args.seed, args.frames);

        let mut audio = NullAudio;
        let mut kills = 0u64;
        let mut deaths = 0u64;
        let mut best_level = 1;
        let mut snapshot = state.snapshot();

        for _ in 0..args.frames {
            let input = autopilot(&state);
            snapshot = tick(&mut state, &input, &mut audio);
            for event in &snapshot.events {
                match event {
                    GameEvent::ParticleKilled { .. } => kills += 1,
                    GameEvent::GameOver => deaths += 1,
                    GameEvent::LevelUp { level } => best_level = best_level.max(*level),
                    _ => {}
                }
            }
        }

        log::info!(
            "Finished: {} kills, {} deaths, best level {}, final level {}",
            kills,
            deaths,
            best_level,
            snapshot.level
        );
        if args.json {
            println!("{}", snapshot.to_json()?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
