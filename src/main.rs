//! Astro Dash headless runner
//!
//! Drives the simulation with the autopilot at a fixed frame rate and logs
//! how each run went. Useful for balance checks against a tuning file.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::path::PathBuf;

    use astro_dash::sim::{GameEvent, GamePhase};
    use astro_dash::{BestScoreFile, FrameClock, Game, LogSink, Tuning};
    use clap::Parser;

    #[derive(Parser)]
    #[command(version, about = "Headless Astro Dash runner driven by the autopilot")]
    pub struct Cli {
        /// RNG seed for the session
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Maximum number of frames to simulate
        #[arg(long, default_value_t = 36_000)]
        frames: u64,

        /// Simulated frames per second
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
        fps: u32,

        /// JSON tuning file (missing fields keep their defaults)
        #[arg(long, value_name = "PATH")]
        tuning: Option<PathBuf>,

        /// Best-score file, created on the first record
        #[arg(long, value_name = "PATH")]
        record: Option<PathBuf>,

        /// Stop after this many runs have ended
        #[arg(long, default_value_t = 3)]
        runs: u32,
    }

    pub fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };

        let game = Game::with_clock(cli.seed, tuning, FrameClock::new())?;
        let mut game = match &cli.record {
            Some(path) => {
                let file = BestScoreFile::new(path);
                let best = file.load()?;
                let mut game = game.with_sink(file);
                game.set_best_score(best);
                game
            }
            None => game.with_sink(LogSink),
        };

        log::info!(
            "Running seed {} for up to {} frames at {} fps (best so far {})",
            cli.seed,
            cli.frames,
            cli.fps,
            game.best_score()
        );

        game.set_autopilot(true);
        game.start();

        let dt = 1.0 / cli.fps as f32;
        let mut scores = Vec::new();
        let mut frames_run = 0;
        for frame in 0..cli.frames {
            frames_run = frame + 1;
            for event in game.tick(dt) {
                if let GameEvent::GameOver { score, .. } = event {
                    log::info!("Run {} ended at frame {frame} with score {score}", scores.len() + 1);
                    scores.push(*score);
                }
            }
            if game.phase() == GamePhase::GameOver {
                if scores.len() >= cli.runs as usize {
                    break;
                }
                game.restart();
            }
        }

        if game.phase() == GamePhase::Playing {
            log::info!("Frame limit reached mid-run at score {}", game.score());
            scores.push(game.score());
        }
        let total: u64 = scores.iter().sum();
        let mean = if scores.is_empty() {
            0.0
        } else {
            total as f64 / scores.len() as f64
        };
        log::info!(
            "{} run(s) over {frames_run} frames: scores {:?}, mean {mean:.1}, best {}",
            scores.len(),
            scores,
            game.best_score()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = native::Cli::parse();
    if let Err(e) = native::run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; hosts embed `astro_dash::Game` directly
}
