mod app;
mod collision;
mod config;
mod food;
mod game;
mod grid;
mod highscore;
mod input;
mod logger;
mod rain;
mod render;
mod rng;
mod scheduler;
mod snake;
mod speed;
mod term;

use std::path::{Path, PathBuf};

use clap::Parser;

use app::{term_err, App};
use config::{AppConfig, ConfigManager};
use game::SnakeGame;
use grid::Grid;
use highscore::{FileHighScoreStore, HighScoreStore};
use rain::MatrixRain;
use render::TermRenderer;
use rng::GameRng;
use scheduler::IntervalTimer;
use term::TermManager;

pub type TermInt = u16;
pub type Coords = (u16, u16);

#[derive(Parser)]
#[command(name = "matrix_snake", about = "Snake in the terminal, with falling green glyphs")]
struct Args {
    /// YAML config file, defaults to one next to the executable
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for food placement, random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Append log lines to this file
    #[arg(long)]
    log_file: Option<String>,
    #[arg(long)]
    no_rain: bool,
    /// Set the stored high score back to 0 before playing
    #[arg(long)]
    reset_high_score: bool,
}

fn main() {
    let args = Args::parse();

    // The terminal is restored by the time run() returns
    if let Err(e) = run(args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let manager: ConfigManager<_, AppConfig> = ConfigManager::from_yaml_file(config_path.clone());
    let config = manager.get_config()?;

    logger::init_logger(args.log_file.as_deref().or_else(|| config.log_file.as_deref()))?;
    log!("Starting with config {}: {:?}", config_path.display(), config);

    let store = FileHighScoreStore::new(beside(&config_path, &config.high_score_file));
    if args.reset_high_score {
        store.save(0)?;
        log!("High score reset in {}", store.file_path().display());
    }

    let rng = args.seed.map(GameRng::new).unwrap_or_else(GameRng::from_random);
    let rain_seed = rng.seed().wrapping_add(1);
    let game = SnakeGame::new(Grid::new(config.grid_size), IntervalTimer::new(), store, rng);

    let mut term = TermManager::new().map_err(term_err)?;
    term.setup().map_err(term_err)?;
    let renderer = TermRenderer::new(term, config.grid_size);

    let rain = if config.matrix_rain && !args.no_rain {
        let region = renderer.layout().rain_region(renderer.terminal_size());
        Some(MatrixRain::new(region, GameRng::new(rain_seed)))
    } else {
        None
    };

    App::new(game, renderer, rain).run()
}

fn default_config_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(config::CONFIG_FILE_NAME);
        }
    }
    PathBuf::from(config::CONFIG_FILE_NAME)
}

/// Relative paths in the config are taken relative to the config file.
fn beside(config_path: &Path, file: &str) -> PathBuf {
    let file = Path::new(file);
    if file.is_absolute() {
        return file.to_path_buf();
    }

    match config_path.parent() {
        Some(dir) => dir.join(file),
        None => file.to_path_buf(),
    }
}
