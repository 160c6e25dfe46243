//! Elemental Path - terminal front end.
//!
//! Plays the puzzle over stdin/stdout and inspects the local database.

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use elemental_grid::{ElementGrid, GameMode, GameSession, GridPosition, Leaderboard, day_id};
use elemental_path::{
    AppConfig, Clock, ElementCatalog, ElementRepository, EnginePhase, GameEngine, GameSnapshot,
    HttpScoreStore, LeaderboardService, MemoryScoreStore, NewGameLog, ScoreStore, ScoreStoreConfig,
    SqliteScoreStore, SystemClock, seed_elements,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::EnvFilter;

const GRID_ROWS: i32 = 10;
const GRID_COLS: i32 = 18;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    debug!(?config, "Configuration resolved");

    match cli.command {
        Command::Play { mode } => run_play(config, mode).await,
        Command::Seed => run_seed(config).await,
        Command::Leaderboard { day } => run_leaderboard(config, day).await,
        Command::History { limit } => run_history(config, limit).await,
    }
}

fn open_repository(config: &AppConfig) -> Result<ElementRepository> {
    ElementRepository::open(config.database_path().clone())
        .with_context(|| format!("opening database {}", config.database_path()))
}

fn build_score_store(config: &AppConfig, repository: &ElementRepository) -> Result<Arc<dyn ScoreStore>> {
    let store: Arc<dyn ScoreStore> = match config.score_store() {
        ScoreStoreConfig::Memory => Arc::new(MemoryScoreStore::new()),
        ScoreStoreConfig::Sqlite => Arc::new(SqliteScoreStore::new(repository.clone())),
        ScoreStoreConfig::Http { base_url, timeout_secs } => Arc::new(HttpScoreStore::new(
            base_url,
            std::time::Duration::from_secs(*timeout_secs),
        )?),
    };
    Ok(store)
}

/// Run the interactive puzzle loop
#[instrument(skip(config))]
async fn run_play(config: AppConfig, mode: Option<GameMode>) -> Result<()> {
    let repository = open_repository(&config)?;
    let catalog = ElementCatalog::new(Arc::new(repository.clone()));
    let leaderboard = LeaderboardService::new(build_score_store(&config, &repository)?);
    let engine = GameEngine::new(
        catalog.clone(),
        leaderboard,
        Arc::new(SystemClock),
        config.engine_config(),
    );

    let mode = mode.unwrap_or(*config.default_mode());
    info!(%mode, "Starting play loop");
    let first = match mode {
        GameMode::Daily => engine.start_daily().await,
        GameMode::Random => engine.start_random().await,
    };
    let snapshot = first?;
    let grid = catalog.grid().await?;
    print_help();
    print_snapshot(&grid, &snapshot);

    let mut logged_generation = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if matches!(input, ":quit" | ":q" | ":restart" | ":daily" | ":random") {
            record_abandoned(&repository, &engine.current_state()).await;
        }

        let snapshot = match input {
            ":quit" | ":q" => break,
            ":help" => {
                print_help();
                continue;
            }
            ":board" => {
                engine.settle().await;
                print_leaderboard(engine.current_state().leaderboard());
                continue;
            }
            ":restart" => engine.restart().await,
            ":daily" => engine.start_daily().await,
            ":random" => engine.start_random().await,
            _ => match input.strip_prefix(":save") {
                Some(name) => match engine.save_score(name).await {
                    Ok(snapshot) => {
                        println!("score saved for {}", name.trim());
                        Ok(snapshot)
                    }
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                },
                None if input.starts_with(':') => {
                    println!("unknown command {}; try :help", input);
                    continue;
                }
                None => Ok(engine.submit_guess(input).await),
            },
        };

        let snapshot = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        print_snapshot(&grid, &snapshot);

        if *snapshot.phase() == EnginePhase::Won && logged_generation != Some(*snapshot.generation()) {
            logged_generation = Some(*snapshot.generation());
            if let Some(session) = snapshot.session() {
                record_game(&repository, session, true).await;
            }
        }
    }

    engine.settle().await;
    info!("Play loop finished");
    Ok(())
}

/// Logs a session left unsolved after at least one move.
async fn record_abandoned(repository: &ElementRepository, snapshot: &GameSnapshot) {
    if let Some(session) = snapshot.session()
        && session.is_active()
        && *session.move_count() > 0
    {
        record_game(repository, session, false).await;
    }
}

async fn record_game(repository: &ElementRepository, session: &GameSession, success: bool) {
    let log = NewGameLog::new(
        session.mode().to_string(),
        session.start().symbol().clone(),
        session.target().symbol().clone(),
        i32::try_from(*session.move_count()).unwrap_or(i32::MAX),
        success,
    );
    let repository = repository.clone();
    match tokio::task::spawn_blocking(move || repository.record_game_log(log)).await {
        Ok(Ok(saved)) => debug!(id = saved.id(), success, "Game log recorded"),
        Ok(Err(e)) => warn!(error = %e, "Game log not recorded"),
        Err(e) => warn!(error = %e, "Game log task failed"),
    }
}

/// Seed the catalog
#[instrument(skip(config))]
async fn run_seed(config: AppConfig) -> Result<()> {
    let repository = open_repository(&config)?;
    let catalog = ElementCatalog::new(Arc::new(repository));
    let inserted = catalog.seed_if_empty(&seed_elements()).await?;
    let grid = catalog.grid().await?;
    println!("{} elements in catalog ({} inserted)", grid.len(), inserted);
    Ok(())
}

/// Print one day's leaderboard
#[instrument(skip(config))]
async fn run_leaderboard(config: AppConfig, day: Option<String>) -> Result<()> {
    let repository = open_repository(&config)?;
    let service = LeaderboardService::new(build_score_store(&config, &repository)?);
    let day = day.unwrap_or_else(|| day_id(SystemClock.today()));
    let board = service.try_load_for_day(&day).await?;
    print_leaderboard(&board);
    Ok(())
}

/// Print recent game logs
#[instrument(skip(config))]
async fn run_history(config: AppConfig, limit: usize) -> Result<()> {
    let repository = open_repository(&config)?;
    let logs = tokio::task::spawn_blocking(move || repository.recent_game_logs(limit)).await??;
    if logs.is_empty() {
        println!("no finished puzzles yet");
    }
    for log in logs {
        println!(
            "{}  {:<6} {:>3} -> {:<3} {:>3} moves{}",
            log.played_at().format("%Y-%m-%d %H:%M"),
            log.mode(),
            log.start_symbol(),
            log.target_symbol(),
            log.move_count(),
            if *log.success() { "" } else { " (abandoned)" },
        );
    }
    Ok(())
}

fn print_help() {
    println!("Type an element name or symbol to reveal it.");
    println!("Commands: :restart :daily :random :save <name> :board :help :quit");
}

fn print_snapshot(grid: &ElementGrid, snapshot: &GameSnapshot) {
    if let Some(session) = snapshot.session() {
        print_grid(grid, session);
        println!("moves: {}  revealed: {}", session.move_count(), session.revealed().len());
    }
    println!("{}", snapshot.message());
}

/// Revealed cells show their symbol, start and target are bracketed, hidden
/// cells show dots.
fn print_grid(grid: &ElementGrid, session: &GameSession) {
    for row in 1..=GRID_ROWS {
        let mut line = String::new();
        let mut any = false;
        for col in 1..=GRID_COLS {
            let cell = match grid.at_position(GridPosition::new(row, col)) {
                Some(element) if element == session.start() || element == session.target() => {
                    any = true;
                    format!("[{:<2}]", element.symbol())
                }
                Some(element) if session.revealed().contains(*element.atomic_number()) => {
                    any = true;
                    format!(" {:<2} ", element.symbol())
                }
                Some(_) => {
                    any = true;
                    " .. ".to_string()
                }
                None => "    ".to_string(),
            };
            line.push_str(&cell);
        }
        if any {
            println!("{}", line.trim_end());
        }
    }
}

fn print_leaderboard(board: &Leaderboard) {
    match board.day_id() {
        Some(day) => println!("leaderboard for {}", day),
        None => println!("no leaderboard in training mode"),
    }
    for (rank, entry) in board.entries().iter().enumerate() {
        println!("{:>2}. {:<20} {:>3} moves", rank + 1, entry.player_name(), entry.move_count());
    }
}
