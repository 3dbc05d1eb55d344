use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::Context;
use clap::Parser;
use pairs_core::{
    DEFAULT_SAVE_KEY, GameConfig, GameError, GameSession, KeyValueStore, Position,
    SelectionOutcome, SymbolId,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use input::{Command, parse_command};
use render::{DEFAULT_SYMBOLS, describe, render_board};
use store::FileStore;

mod input;
mod render;
mod store;

const HELP: &str = "\
Pick cards by their number, or by `row col`.
  n  start a new game
  h  show this help
  q  quit (progress is kept)";

#[derive(Parser, Debug)]
#[command(version, about = "Find all the pairs", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Number of grid rows
    #[arg(short, long)]
    rows: Option<u8>,

    /// Number of grid columns
    #[arg(short, long)]
    cols: Option<u8>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory holding the save slot
    #[arg(long, default_value = ".pairs")]
    save_dir: PathBuf,

    /// Characters used as card faces, one symbol each
    #[arg(long, default_value = DEFAULT_SYMBOLS)]
    symbols: String,

    /// JSON file with a game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Discard any saved game and deal a new board
    #[arg(long)]
    new: bool,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Could not read config {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid config {}", path.display()))
}

fn unique_labels(symbols: &str) -> Vec<char> {
    let mut labels: Vec<char> = Vec::new();
    for c in symbols.chars().filter(|c| !c.is_whitespace()) {
        if !labels.contains(&c) {
            labels.push(c);
        }
    }
    labels
}

struct Game<S> {
    session: GameSession<S>,
    labels: Vec<char>,
    rng: Pcg32,
}

impl<S: KeyValueStore> Game<S> {
    fn cols(&self) -> u8 {
        self.session.config().cols
    }

    fn show_board(&self) {
        println!("{}\n", render_board(self.session.engine(), self.cols(), &self.labels));
    }

    fn report_events(&mut self) {
        for event in self.session.drain_events() {
            log::debug!("{:?}", event);
            if let Some(text) = describe(&event) {
                println!("{text}");
            }
        }
    }

    fn play(&mut self, position: Position) -> anyhow::Result<()> {
        let outcome = match self.session.select(position) {
            Ok(outcome) => outcome,
            Err(GameError::InvalidSelection(err)) => {
                println!("Can't pick that card: {err}");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        self.show_board();
        self.report_events();

        match outcome {
            SelectionOutcome::Pending => {}
            SelectionOutcome::Matched { .. } => {
                thread::sleep(self.session.config().timing.match_settle());
            }
            SelectionOutcome::Mismatch(flip_back) => {
                thread::sleep(flip_back.delay);
                self.session.apply_flip_back(&flip_back)?;
                self.report_events();
                self.show_board();
            }
        }
        Ok(())
    }

    fn run(&mut self) -> anyhow::Result<()> {
        if self.session.is_resumed() {
            println!("Resuming your saved game.");
        }
        println!("{HELP}\n");
        self.show_board();

        for line in io::stdin().lock().lines() {
            let line = line.context("Failed to read input")?;
            match parse_command(&line, self.cols()) {
                Err(err) => println!("{err}"),
                Ok(Command::Quit) => break,
                Ok(Command::Help) => println!("{HELP}"),
                Ok(Command::NewGame) => {
                    self.session.restart(&mut self.rng)?;
                    self.show_board();
                }
                Ok(Command::Select(position)) => {
                    self.play(position)?;
                    if self.session.engine().state().is_finished() {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mut config = load_config(args.config.as_deref())?;
    config.rows = args.rows.unwrap_or(config.rows).max(1);
    config.cols = args.cols.unwrap_or(config.cols).max(1);

    let labels = unique_labels(&args.symbols);
    let symbol_count = SymbolId::try_from(labels.len()).context("Too many symbols")?;
    let symbol_pool: Vec<SymbolId> = (0..symbol_count).collect();
    config
        .validate(&symbol_pool)
        .with_context(|| format!("Cannot play a {}x{} grid", config.rows, config.cols))?;

    let mut rng = match args.seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_os_rng(),
    };
    log::debug!("config: {:?}, seed: {:?}", config, args.seed);

    let mut store = FileStore::new(&args.save_dir);
    if args.new {
        store.delete(DEFAULT_SAVE_KEY)?;
    }
    log::info!("Using save directory {}", store.dir().display());

    let session = GameSession::start(config, symbol_pool, store, &mut rng)?;
    Game {
        session,
        labels,
        rng,
    }
    .run()
}
