use anyhow::Result;
use clap::{Parser, ValueEnum};
use lcd_snake::game::{Game, GameConfig};
use lcd_snake::input::GestureThresholds;
use lcd_snake::logging;
use lcd_snake::modes::{format_scores, HumanMode};
use lcd_snake::scores::{FileStorage, MemoryStorage, ScoreKeeper, Storage};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lcd_snake")]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// What to do
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for saved scores and the log file
    #[arg(long, default_value = ".lcd_snake")]
    data_dir: PathBuf,

    /// Keep scores in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Speed up a little every time food is eaten
    #[arg(long)]
    speed_up: bool,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Log file (defaults to lcd_snake.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard and mouse controls
    Play,
    /// Print the high score and scoreboard
    Scores,
}

impl Cli {
    /// Defaults, then the config file, then command-line flags
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
            config.min_tick_ms = config.min_tick_ms.min(tick_ms);
        }
        if self.speed_up {
            config.speed_up = true;
        }

        config.validate()?;
        Ok(config)
    }

    fn storage_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }
}

async fn play<S: Storage>(config: GameConfig, storage: S, seed: Option<u64>) -> Result<()> {
    let thresholds = GestureThresholds::from_config(&config);
    let game = match seed {
        Some(seed) => Game::with_seed(config, storage, seed),
        None => Game::new(config, storage),
    };

    let mut human_mode = HumanMode::new(game, thresholds);
    human_mode.run().await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Play => {
            let log_file = cli
                .log_file
                .clone()
                .unwrap_or_else(|| cli.data_dir.join("lcd_snake.log"));
            logging::init_file(&log_file)?;

            let config = cli.game_config()?;
            tracing::info!(?config, "starting");

            if cli.ephemeral {
                play(config, MemoryStorage::new(), cli.seed).await?;
            } else {
                let storage = FileStorage::open(&cli.storage_path());
                play(config, storage, cli.seed).await?;
            }
        }
        Mode::Scores => {
            logging::init_stderr();

            let keeper = ScoreKeeper::new(FileStorage::open(&cli.storage_path()));
            print!("{}", format_scores(&keeper));
        }
    }

    Ok(())
}
