//! The puzzle state machine.
//!
//! Commands are serialized through one async mutex. After every transition the
//! engine publishes a complete [`GameSnapshot`] on a watch channel, so
//! observers never see a half-applied update.
//!
//! Leaderboard fetches run in the background. Each is tagged with the session
//! generation that requested it; a result arriving after a newer session has
//! started is dropped.

use std::sync::{Arc, PoisonError};

use derive_getters::Getters;
use derive_setters::Setters;
use elemental_grid::{
    ElementGrid, EntropyRng, GameMode, GameSession, INSUFFICIENT_DATA, InsufficientCatalog, Leaderboard,
    LeaderboardEntry, ScoringRule, SeededDailyRng, SessionStatus, day_id,
};
use serde::{Deserialize, Serialize};
use strum::Display;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

use crate::catalog::{CatalogError, ElementCatalog};
use crate::clock::Clock;
use crate::leaderboard::{LeaderboardService, SaveOutcome};

/// Tunables of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct EngineConfig {
    /// How guesses count toward the score.
    scoring: ScoringRule,
    /// Mode used by [`GameEngine::restart`] before any session exists.
    default_mode: GameMode,
}

/// Coarse engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EnginePhase {
    /// No playable session (catalog unavailable or too small).
    Loading,
    /// A session is in progress.
    Active,
    /// The current session is solved.
    Won,
}

/// Immutable view of the engine after a transition.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct GameSnapshot {
    phase: EnginePhase,
    session: Option<GameSession>,
    leaderboard: Leaderboard,
    generation: u64,
    message: String,
}

impl GameSnapshot {
    fn loading(message: impl Into<String>) -> Self {
        Self {
            phase: EnginePhase::Loading,
            session: None,
            leaderboard: Leaderboard::empty(),
            generation: 0,
            message: message.into(),
        }
    }
}

/// Engine command failure. The published snapshot always stays consistent.
#[derive(Debug, Clone, derive_more::Display)]
pub enum EngineError {
    /// The catalog could not be loaded.
    #[display("{}", _0)]
    Catalog(CatalogError),

    /// The catalog holds fewer than two elements.
    #[display("{}", _0)]
    InsufficientCatalog(InsufficientCatalog),

    /// A score was submitted outside a solved daily session.
    #[display("Score rejected: {}", _0)]
    ScoreRejected(String),
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(err) => Some(err),
            Self::InsufficientCatalog(err) => Some(err),
            Self::ScoreRejected(_) => None,
        }
    }
}

impl From<CatalogError> for EngineError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<InsufficientCatalog> for EngineError {
    fn from(err: InsufficientCatalog) -> Self {
        Self::InsufficientCatalog(err)
    }
}

#[derive(Debug)]
struct EngineState {
    grid: Option<Arc<ElementGrid>>,
    session: Option<GameSession>,
    generation: u64,
    loading_message: String,
    daily_day_id: Option<String>,
}

#[derive(Debug)]
struct EngineShared {
    catalog: ElementCatalog,
    leaderboard: LeaderboardService,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    state: Mutex<EngineState>,
    snapshots: watch::Sender<GameSnapshot>,
    pending: std::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl EngineShared {
    async fn snapshot(&self, state: &EngineState) -> GameSnapshot {
        let leaderboard = self.leaderboard.cached().await;
        match &state.session {
            Some(session) => GameSnapshot {
                phase: match session.status() {
                    SessionStatus::Active => EnginePhase::Active,
                    SessionStatus::Won => EnginePhase::Won,
                },
                message: session.last_message().clone(),
                session: Some(session.clone()),
                leaderboard,
                generation: state.generation,
            },
            None => GameSnapshot {
                phase: EnginePhase::Loading,
                session: None,
                leaderboard,
                generation: state.generation,
                message: state.loading_message.clone(),
            },
        }
    }

    async fn publish(&self, state: &EngineState) -> GameSnapshot {
        let snapshot = self.snapshot(state).await;
        self.snapshots.send_replace(snapshot.clone());
        debug!(phase = %snapshot.phase, generation = snapshot.generation, "Snapshot published");
        snapshot
    }
}

/// Puzzle engine handle. Clones drive the same engine.
#[derive(Debug, Clone)]
pub struct GameEngine {
    shared: Arc<EngineShared>,
}

impl GameEngine {
    /// Creates an engine in the `Loading` phase.
    #[instrument(skip(catalog, leaderboard, clock))]
    pub fn new(
        catalog: ElementCatalog,
        leaderboard: LeaderboardService,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        info!("Creating GameEngine");
        let (snapshots, _) = watch::channel(GameSnapshot::loading("loading"));
        Self {
            shared: Arc::new(EngineShared {
                catalog,
                leaderboard,
                clock,
                config,
                state: Mutex::new(EngineState {
                    grid: None,
                    session: None,
                    generation: 0,
                    loading_message: "loading".to_string(),
                    daily_day_id: None,
                }),
                snapshots,
                pending: std::sync::Mutex::new(Vec::new()),
            }),
        }
    }

    /// Subscribes to snapshots; the receiver starts at the latest one.
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// The most recently published snapshot.
    pub fn current_state(&self) -> GameSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    /// Starts today's shared puzzle and fetches today's leaderboard.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the catalog is unavailable or too small; the
    /// engine is then in the `Loading` phase.
    #[instrument(skip(self))]
    pub async fn start_daily(&self) -> Result<GameSnapshot, EngineError> {
        let mut state = self.shared.state.lock().await;
        self.start_locked(&mut state, GameMode::Daily).await
    }

    /// Starts a training puzzle and clears the leaderboard.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the catalog is unavailable or too small.
    #[instrument(skip(self))]
    pub async fn start_random(&self) -> Result<GameSnapshot, EngineError> {
        let mut state = self.shared.state.lock().await;
        self.start_locked(&mut state, GameMode::Random).await
    }

    /// Starts a new puzzle in the current session's mode.
    ///
    /// Without a session, the configured default mode is used.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the catalog is unavailable or too small.
    #[instrument(skip(self))]
    pub async fn restart(&self) -> Result<GameSnapshot, EngineError> {
        let mut state = self.shared.state.lock().await;
        let mode = state
            .session
            .as_ref()
            .map(|session| *session.mode())
            .unwrap_or(self.shared.config.default_mode);
        self.start_locked(&mut state, mode).await
    }

    async fn start_locked(&self, state: &mut EngineState, mode: GameMode) -> Result<GameSnapshot, EngineError> {
        state.generation += 1;
        let generation = state.generation;
        debug!(generation, mode = %mode, "Starting session");

        let grid = match self.shared.catalog.grid().await {
            Ok(grid) => grid,
            Err(e) => {
                warn!(error = %e, "Catalog unavailable");
                self.enter_loading(state, e.to_string()).await;
                return Err(e.into());
            }
        };

        let today = self.shared.clock.today();
        let generated = match mode {
            GameMode::Daily => GameSession::generate(&grid, &mut SeededDailyRng::for_date(today), mode),
            GameMode::Random => GameSession::generate(&grid, &mut EntropyRng::new(), mode),
        };
        let session = match generated {
            Ok(session) => session,
            Err(e) => {
                warn!(count = e.count, "Catalog too small for a puzzle");
                self.enter_loading(state, INSUFFICIENT_DATA.to_string()).await;
                return Err(e.into());
            }
        };

        state.grid = Some(grid);
        state.session = Some(session);
        match mode {
            GameMode::Daily => {
                let day = day_id(today);
                state.daily_day_id = Some(day.clone());
                self.shared.leaderboard.reset(Some(day.clone())).await;
                self.spawn_leaderboard_load(generation, day);
            }
            GameMode::Random => {
                state.daily_day_id = None;
                self.shared.leaderboard.reset(None).await;
            }
        }

        info!(generation, mode = %mode, "Session started");
        Ok(self.shared.publish(state).await)
    }

    async fn enter_loading(&self, state: &mut EngineState, message: String) {
        state.session = None;
        state.daily_day_id = None;
        state.loading_message = message;
        self.shared.leaderboard.reset(None).await;
        self.shared.publish(state).await;
    }

    /// Applies a guess to the current session.
    ///
    /// Does nothing unless a session is active. Unknown guesses only change
    /// the message.
    #[instrument(skip(self))]
    pub async fn submit_guess(&self, guess: &str) -> GameSnapshot {
        let mut state = self.shared.state.lock().await;
        let (Some(session), Some(grid)) = (state.session.as_ref(), state.grid.as_ref()) else {
            debug!("Guess ignored: no session");
            return self.shared.snapshot(&state).await;
        };
        if !session.is_active() {
            debug!("Guess ignored: session finished");
            return self.shared.snapshot(&state).await;
        }

        let (next, outcome) = session.apply_guess(grid, guess, self.shared.config.scoring);
        debug!(?outcome, moves = next.move_count(), "Guess applied");
        state.session = Some(next);
        self.shared.publish(&state).await
    }

    /// Records a score for the solved daily puzzle.
    ///
    /// The entry is merged into the local board immediately; persisting it and
    /// reloading the authoritative board happen in the background.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ScoreRejected`] for a blank name, a random
    /// session, or an unsolved puzzle. Nothing changes in that case.
    #[instrument(skip(self))]
    pub async fn save_score(&self, player_name: &str) -> Result<GameSnapshot, EngineError> {
        let state = self.shared.state.lock().await;
        let name = player_name.trim();
        if name.is_empty() {
            return Err(EngineError::ScoreRejected("player name is empty".to_string()));
        }
        let Some(session) = state.session.as_ref() else {
            return Err(EngineError::ScoreRejected("no puzzle in progress".to_string()));
        };
        if *session.mode() != GameMode::Daily {
            return Err(EngineError::ScoreRejected("training puzzles have no leaderboard".to_string()));
        }
        if *session.status() != SessionStatus::Won {
            return Err(EngineError::ScoreRejected("the puzzle is not solved yet".to_string()));
        }

        let day = state
            .daily_day_id
            .clone()
            .unwrap_or_else(|| day_id(self.shared.clock.today()));
        let entry = LeaderboardEntry::new(name.to_string(), *session.move_count(), day, self.shared.clock.now());
        self.shared.leaderboard.merge_local(entry.clone()).await;
        let snapshot = self.shared.publish(&state).await;

        self.spawn_score_save(state.generation, entry);
        info!(player = name, "Score queued");
        Ok(snapshot)
    }

    /// Waits for every background leaderboard task started so far.
    pub async fn settle(&self) {
        loop {
            let handles = std::mem::take(&mut *self.pending());
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    warn!(error = %e, "Background leaderboard task failed");
                }
            }
        }
    }

    fn pending(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.shared.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut pending = self.pending();
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    fn spawn_leaderboard_load(&self, generation: u64, day: String) {
        let shared = Arc::clone(&self.shared);
        let task = async move {
            let board = shared.leaderboard.load_for_day(&day).await;
            let state = shared.state.lock().await;
            if state.generation != generation {
                debug!(current = state.generation, "Discarding stale leaderboard");
                return;
            }
            shared.leaderboard.install_keeping_local(board).await;
            shared.publish(&state).await;
        };
        self.track(tokio::spawn(task.instrument(info_span!("leaderboard_load", generation))));
    }

    fn spawn_score_save(&self, generation: u64, entry: LeaderboardEntry) {
        let shared = Arc::clone(&self.shared);
        let task = async move {
            if shared.leaderboard.save(&entry).await == SaveOutcome::Failed {
                return;
            }
            let board = match shared.leaderboard.try_load_for_day(entry.day_id()).await {
                Ok(board) => board,
                Err(e) => {
                    warn!(error = %e, "Reload after save failed; keeping local board");
                    return;
                }
            };
            let state = shared.state.lock().await;
            if state.generation != generation {
                debug!(current = state.generation, "Discarding stale leaderboard");
                return;
            }
            shared.leaderboard.install(board).await;
            shared.publish(&state).await;
        };
        self.track(tokio::spawn(task.instrument(info_span!("score_save", generation))));
    }
}
