//! Puzzle session state and its transitions.
//!
//! A session is a value: every transition returns a new [`GameSession`]
//! rather than patching fields of a shared one.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info, instrument};

use crate::{Element, ElementGrid, InsufficientCatalog, RandomnessSource, RevealedSet};

/// Message shown when a guess matches no element.
pub const UNKNOWN_ELEMENT: &str = "unknown element";

/// Message shown while the catalog cannot support a puzzle.
pub const INSUFFICIENT_DATA: &str = "insufficient data";

/// Which puzzle generator a session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GameMode {
    /// Date-seeded puzzle shared by all players that day.
    #[default]
    Daily,
    /// Free-play training puzzle.
    Random,
}

/// Whether the session can still accept guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum SessionStatus {
    /// Start and target are not yet linked.
    Active,
    /// Start and target are linked; terminal until the next start.
    Won,
}

/// How matched guesses are counted toward the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoringRule {
    /// Only guesses that reveal a new element count as a move.
    #[default]
    NewRevealsOnly,
    /// Every guess that matches an element counts, repeats included.
    EveryMatch,
}

/// Result of applying one guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The session was not active; nothing changed.
    Ignored,
    /// The guess matched nothing.
    Unknown,
    /// A new element was revealed.
    Revealed(Element),
    /// The element was already revealed.
    AlreadyRevealed(Element),
    /// The guess linked start and target.
    Won(Element),
}

/// One puzzle in progress or finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameSession {
    mode: GameMode,
    start: Element,
    target: Element,
    revealed: RevealedSet,
    move_count: u32,
    status: SessionStatus,
    last_message: String,
}

impl GameSession {
    /// Draws a fresh puzzle from the grid.
    ///
    /// The start is `elements[rng.next_index(n)]`; the target is redrawn until
    /// it differs from the start.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientCatalog`] if the grid has fewer than two elements.
    #[instrument(skip(grid, rng), fields(elements = grid.len()))]
    pub fn generate(
        grid: &ElementGrid,
        rng: &mut dyn RandomnessSource,
        mode: GameMode,
    ) -> Result<Self, InsufficientCatalog> {
        let n = grid.len();
        if n < 2 {
            return Err(InsufficientCatalog { count: n });
        }

        let start = grid.elements()[rng.next_index(n)].clone();
        let mut target = &grid.elements()[rng.next_index(n)];
        while target.atomic_number() == start.atomic_number() {
            target = &grid.elements()[rng.next_index(n)];
        }
        let target = target.clone();

        let intro = match mode {
            GameMode::Daily => "daily challenge",
            GameMode::Random => "training",
        };
        let last_message = format!(
            "{}: connect {} and {}",
            intro,
            start.display_name(),
            target.display_name()
        );
        let revealed = [start.clone(), target.clone()].into_iter().collect();

        info!(
            mode = %mode,
            start = start.symbol().as_str(),
            target = target.symbol().as_str(),
            "Session generated"
        );

        Ok(Self {
            mode,
            start,
            target,
            revealed,
            move_count: 0,
            status: SessionStatus::Active,
            last_message,
        })
    }

    /// Whether the session still accepts guesses.
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Applies one guess and returns the next session value.
    ///
    /// Inactive sessions are returned unchanged. An unknown guess only updates
    /// the message. A match reveals the element (if new), updates the move
    /// count per `scoring`, and re-evaluates the win condition.
    #[instrument(skip(self, grid), fields(mode = %self.mode, moves = self.move_count))]
    pub fn apply_guess(&self, grid: &ElementGrid, guess: &str, scoring: ScoringRule) -> (Self, GuessOutcome) {
        if !self.is_active() {
            debug!("Guess ignored on finished session");
            return (self.clone(), GuessOutcome::Ignored);
        }

        let mut next = self.clone();
        let Some(element) = grid.lookup(guess) else {
            debug!("Guess matched no element");
            next.last_message = UNKNOWN_ELEMENT.to_string();
            return (next, GuessOutcome::Unknown);
        };

        let newly_revealed = next.revealed.insert(element.clone());
        if newly_revealed || scoring == ScoringRule::EveryMatch {
            next.move_count += 1;
        }

        if grid.reachable(&next.start, &next.target, &next.revealed) {
            next.status = SessionStatus::Won;
            next.last_message = format!(
                "connected! {} and {} linked in {} moves",
                next.start.display_name(),
                next.target.display_name(),
                next.move_count
            );
            info!(moves = next.move_count, "Session won");
            return (next, GuessOutcome::Won(element.clone()));
        }

        if newly_revealed {
            next.last_message = format!("revealed: {}", element.display_name());
            debug!(element = element.symbol().as_str(), "Element revealed");
            (next, GuessOutcome::Revealed(element.clone()))
        } else {
            next.last_message = format!("already revealed: {}", element.display_name());
            (next, GuessOutcome::AlreadyRevealed(element.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedRng;

    fn grid() -> ElementGrid {
        ElementGrid::new(vec![
            Element::new(1, "A".into(), "Alpha".into(), None, 1, 1),
            Element::new(2, "B".into(), "Beta".into(), None, 1, 2),
            Element::new(3, "C".into(), "Gamma".into(), None, 1, 3),
            Element::new(8, "O".into(), "Oxygen".into(), Some("Kyslík".into()), 5, 5),
        ])
        .expect("valid grid")
    }

    fn session(script: Vec<usize>) -> GameSession {
        GameSession::generate(&grid(), &mut ScriptedRng::new(script), GameMode::Random).expect("enough elements")
    }

    #[test]
    fn test_generate_redraws_equal_target() {
        // Start index 0, then 0 again (rejected), then 2.
        let s = session(vec![0, 0, 2]);
        assert_eq!(*s.start().atomic_number(), 1);
        assert_eq!(*s.target().atomic_number(), 3);
        assert_eq!(s.revealed().len(), 2);
        assert_eq!(*s.move_count(), 0);
        assert_eq!(*s.status(), SessionStatus::Active);
    }

    #[test]
    fn test_generate_needs_two_elements() {
        let single = ElementGrid::new(vec![Element::new(1, "A".into(), "Alpha".into(), None, 1, 1)])
            .expect("valid grid");
        let err = GameSession::generate(&single, &mut ScriptedRng::new(vec![0]), GameMode::Daily)
            .expect_err("too small");
        assert_eq!(err.count, 1);
    }

    #[test]
    fn test_unknown_guess_only_sets_message() {
        let s = session(vec![0, 2]);
        let (next, outcome) = s.apply_guess(&grid(), "unobtainium", ScoringRule::NewRevealsOnly);
        assert_eq!(outcome, GuessOutcome::Unknown);
        assert_eq!(next.last_message(), UNKNOWN_ELEMENT);
        assert_eq!(next.revealed(), s.revealed());
        assert_eq!(next.move_count(), s.move_count());
    }

    #[test]
    fn test_name_and_symbol_reveal_once() {
        let g = grid();
        let s = session(vec![0, 2]);
        let (s, first) = s.apply_guess(&g, " oxygen ", ScoringRule::NewRevealsOnly);
        assert!(matches!(first, GuessOutcome::Revealed(_)));
        let (s, second) = s.apply_guess(&g, "O", ScoringRule::NewRevealsOnly);
        assert!(matches!(second, GuessOutcome::AlreadyRevealed(_)));
        assert_eq!(*s.move_count(), 1);
        assert_eq!(s.revealed().len(), 3);
    }

    #[test]
    fn test_every_match_counts_repeats() {
        let g = grid();
        let s = session(vec![0, 2]);
        let (s, _) = s.apply_guess(&g, "oxygen", ScoringRule::EveryMatch);
        let (s, _) = s.apply_guess(&g, "kyslík", ScoringRule::EveryMatch);
        assert_eq!(*s.move_count(), 2);
        assert_eq!(s.revealed().len(), 3);
    }

    #[test]
    fn test_bridge_wins_and_freezes() {
        let g = grid();
        let s = session(vec![0, 2]);
        let (s, outcome) = s.apply_guess(&g, "beta", ScoringRule::NewRevealsOnly);
        assert!(matches!(outcome, GuessOutcome::Won(_)));
        assert_eq!(*s.status(), SessionStatus::Won);
        assert_eq!(*s.move_count(), 1);

        let (after, outcome) = s.apply_guess(&g, "oxygen", ScoringRule::NewRevealsOnly);
        assert_eq!(outcome, GuessOutcome::Ignored);
        assert_eq!(after, s);
    }

    #[test]
    fn test_mode_parses_case_insensitively() {
        assert_eq!("Daily".parse::<GameMode>().ok(), Some(GameMode::Daily));
        assert_eq!("random".parse::<GameMode>().ok(), Some(GameMode::Random));
        assert_eq!(GameMode::Random.to_string(), "random");
    }
}
