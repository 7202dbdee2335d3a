//! Game variants.
//!
//! Each variant is an independent deterministic state machine that accepts
//! player input, registers its timers against the owning session's
//! [`TimerSet`], and reports a single boolean outcome on completion. The
//! session state machine dispatches through [`ActiveGame`]; adding a
//! variant means adding a case here, not modifying the session machine.

pub mod memory;
pub mod quiz;

use crate::timers::{TimerKind, TimerSet};
use crate::SessionError;
use gamehub_types::GameId;
use rand::Rng;

pub use memory::MemoryGame;
pub use quiz::QuizGame;

/// Player input routed to the active game variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameInput {
    /// Reveal the card at a board position (pair-matching game).
    Reveal(usize),
    /// Answer the current question with an option index (quiz game).
    Answer(usize),
    /// Throw the current attempt away and start the variant over with a
    /// fresh shuffle. Counters reset; the session and its entry fee are
    /// unaffected.
    Restart,
}

/// The live game instance owned by an active session.
#[derive(Clone, Debug)]
pub enum ActiveGame {
    Memory(MemoryGame),
    Quiz(QuizGame),
}

impl ActiveGame {
    /// Instantiate the variant for a game id, registering any initial
    /// timers.
    pub fn new(id: GameId, rng: &mut impl Rng, now_ms: u64, timers: &mut TimerSet) -> Self {
        match id {
            GameId::Memory => ActiveGame::Memory(MemoryGame::new(rng)),
            GameId::Quiz => ActiveGame::Quiz(QuizGame::new(rng, now_ms, timers)),
        }
    }

    /// Route one player input. Inputs meant for the other variant are
    /// rejected.
    pub fn input(
        &mut self,
        input: GameInput,
        rng: &mut impl Rng,
        now_ms: u64,
        timers: &mut TimerSet,
    ) -> Result<(), SessionError> {
        match (self, input) {
            (ActiveGame::Memory(game), GameInput::Reveal(position)) => {
                game.reveal(position, now_ms, timers)
            }
            (ActiveGame::Memory(game), GameInput::Restart) => {
                game.restart(rng, timers);
                Ok(())
            }
            (ActiveGame::Quiz(game), GameInput::Answer(option)) => {
                game.answer(option, now_ms, timers)
            }
            (ActiveGame::Quiz(game), GameInput::Restart) => {
                game.restart(rng, now_ms, timers);
                Ok(())
            }
            (ActiveGame::Memory(_), GameInput::Answer(_)) => Err(SessionError::InvalidInput(
                "answer sent to the pair-matching game".into(),
            )),
            (ActiveGame::Quiz(_), GameInput::Reveal(_)) => Err(SessionError::InvalidInput(
                "reveal sent to the quiz game".into(),
            )),
        }
    }

    /// Deliver an expired session timer to the variant that owns it.
    pub fn on_timer(&mut self, kind: TimerKind, now_ms: u64, timers: &mut TimerSet) {
        match (self, kind) {
            (ActiveGame::Memory(game), TimerKind::MismatchHide) => game.on_mismatch_hide(),
            (ActiveGame::Quiz(game), TimerKind::QuestionDeadline) => {
                game.on_question_deadline(now_ms, timers)
            }
            (ActiveGame::Quiz(game), TimerKind::AdvanceDelay) => {
                game.on_advance_delay(now_ms, timers)
            }
            // A timer belonging to the other variant cannot be pending;
            // ignore rather than corrupt state.
            _ => {}
        }
    }

    /// Completion signal: `None` while in progress, `Some(success)` once
    /// finished.
    pub fn outcome(&self) -> Option<bool> {
        match self {
            ActiveGame::Memory(game) => game.outcome(),
            ActiveGame::Quiz(game) => game.outcome(),
        }
    }
}
