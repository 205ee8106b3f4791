//! Hoop Shot - headless runner
//!
//! Plays one game in the toy world with a bot at a fixed 60 Hz frame rate and
//! prints the final snapshot and result as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use hoop_shot::Settings;
    use hoop_shot::demo::{Bot, Session};

    /// Frame delta for the fixed 60 Hz loop
    const FRAME_DT: f32 = 1.0 / 60.0;

    #[derive(Parser, Debug)]
    #[command(about = "Play a headless game of Hoop Shot with a bot", version)]
    pub struct Args {
        /// JSON settings file (defaults when missing or invalid)
        #[arg(long)]
        pub settings: Option<PathBuf>,
        /// Bot RNG seed
        #[arg(long, default_value_t = 42)]
        pub seed: u64,
        /// Bot sloppiness, 0 = perfect swipes, 1 = wild
        #[arg(long, default_value_t = 0.3)]
        pub skill: f32,
        /// Start the game but never shoot
        #[arg(long)]
        pub idle: bool,
        /// Give up after this many seconds of game time
        #[arg(long, default_value_t = 60.0)]
        pub max_seconds: f64,
    }

    fn load_settings(path: Option<&PathBuf>) -> Settings {
        let Some(path) = path else {
            return Settings::default();
        };
        match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Unusable settings file {} ({}), using defaults",
                    path.display(),
                    e
                );
                Settings::default()
            }
        }
    }

    pub fn run(args: Args) {
        let settings = load_settings(args.settings.as_ref());
        let bot = if args.idle {
            Bot::idle(args.seed)
        } else {
            Bot::new(args.seed, args.skill)
        };
        log::info!(
            "Hoop Shot starting (seed {}, skill {:.2}, idle: {})",
            args.seed,
            args.skill,
            args.idle
        );

        let mut session = Session::new(settings, Some(bot));
        let summary = session.run(FRAME_DT, args.max_seconds);

        match serde_json::to_string_pretty(&session.game.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize snapshot: {e}"),
        }

        match summary {
            Some(summary) => {
                if let Some(headline) = session.game.headline() {
                    println!("{headline}");
                }
                match serde_json::to_string_pretty(&summary) {
                    Ok(json) => println!("{json}"),
                    Err(e) => log::error!("Failed to serialize summary: {e}"),
                }
            }
            None => println!("No result within {:.1}s", args.max_seconds),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    native::run(native::Args::parse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library only on the web; the host engine drives `Game` directly
}
