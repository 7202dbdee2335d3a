//! Pair-matching game.
//!
//! Eight symbol kinds, duplicated into eight pairs and shuffled uniformly
//! over sixteen positions. The player reveals at most two positions at a
//! time: a matching second reveal locks both cards permanently, a mismatch
//! hides both again once the [`MISMATCH_HIDE_MS`] delay expires. The move
//! counter increments exactly once per pair of reveals regardless of
//! outcome, and the elapsed clock runs from the first reveal to
//! completion; both are display-only. The game completes when every pair
//! is matched and the outcome is always success; this variant can only be
//! abandoned, not lost.

use crate::timers::{TimerKind, TimerSet};
use crate::SessionError;
use rand::seq::SliceRandom;
use rand::Rng;

/// Card faces, one per symbol kind.
pub const SYMBOLS: [&str; 8] = ["🔑", "💎", "🪙", "📊", "🔒", "🌐", "🧩", "💻"];

/// How long a mismatched pair stays visible before hiding again.
pub const MISMATCH_HIDE_MS: u64 = 1_000;

/// Number of board positions (two cards per symbol kind).
pub const BOARD_SIZE: usize = SYMBOLS.len() * 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Face {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Clone, Copy, Debug)]
struct Card {
    symbol: u8,
    face: Face,
}

/// One pair-matching attempt.
#[derive(Clone, Debug)]
pub struct MemoryGame {
    cards: Vec<Card>,
    /// Positions currently face up and unmatched, at most two.
    revealed: Vec<usize>,
    matched_pairs: usize,
    moves: u32,
    started_at_ms: Option<u64>,
    finished_at_ms: Option<u64>,
}

impl MemoryGame {
    /// Deal a fresh board: one pair per symbol, uniformly shuffled.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut cards: Vec<Card> = (0..BOARD_SIZE)
            .map(|index| Card {
                symbol: (index / 2) as u8,
                face: Face::Hidden,
            })
            .collect();
        cards.shuffle(rng);
        Self {
            cards,
            revealed: Vec::new(),
            matched_pairs: 0,
            moves: 0,
            started_at_ms: None,
            finished_at_ms: None,
        }
    }

    /// Reshuffle and reset every counter. Pending timers for this variant
    /// are cancelled.
    pub fn restart(&mut self, rng: &mut impl Rng, timers: &mut TimerSet) {
        timers.cancel(TimerKind::MismatchHide);
        *self = Self::new(rng);
    }

    /// Reveal the card at `position`.
    ///
    /// Reveals aimed at face-up or matched cards, or arriving while a
    /// mismatched pair is still visible, are no-ops; only an out-of-range
    /// position or input after completion is an error.
    pub fn reveal(
        &mut self,
        position: usize,
        now_ms: u64,
        timers: &mut TimerSet,
    ) -> Result<(), SessionError> {
        if self.outcome().is_some() {
            return Err(SessionError::InvalidInput("game already complete".into()));
        }
        if position >= self.cards.len() {
            return Err(SessionError::InvalidInput(format!(
                "position {position} out of range"
            )));
        }
        // Two cards already face up: the mismatch delay owns the board.
        if self.revealed.len() >= 2 {
            return Ok(());
        }
        if self.cards[position].face != Face::Hidden {
            return Ok(());
        }

        if self.started_at_ms.is_none() {
            self.started_at_ms = Some(now_ms);
        }

        self.cards[position].face = Face::Revealed;
        self.revealed.push(position);
        if self.revealed.len() < 2 {
            return Ok(());
        }

        // Second reveal of the pair: one move, matched or not.
        self.moves += 1;
        let (first, second) = (self.revealed[0], self.revealed[1]);
        if self.cards[first].symbol == self.cards[second].symbol {
            self.cards[first].face = Face::Matched;
            self.cards[second].face = Face::Matched;
            self.revealed.clear();
            self.matched_pairs += 1;
            if self.matched_pairs == SYMBOLS.len() {
                self.finished_at_ms = Some(now_ms);
            }
        } else {
            timers.schedule(TimerKind::MismatchHide, now_ms + MISMATCH_HIDE_MS);
        }
        Ok(())
    }

    /// The mismatch delay expired: hide both face-up cards.
    pub fn on_mismatch_hide(&mut self) {
        for position in self.revealed.drain(..) {
            if self.cards[position].face == Face::Revealed {
                self.cards[position].face = Face::Hidden;
            }
        }
    }

    /// `Some(true)` once all pairs are matched.
    pub fn outcome(&self) -> Option<bool> {
        (self.matched_pairs == SYMBOLS.len()).then_some(true)
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Display clock: runs from the first reveal until completion.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.started_at_ms {
            None => 0,
            Some(start) => self.finished_at_ms.unwrap_or(now_ms).saturating_sub(start),
        }
    }

    /// Symbol at a position if face up or matched (display helper).
    pub fn visible_symbol(&self, position: usize) -> Option<&'static str> {
        let card = self.cards.get(position)?;
        match card.face {
            Face::Hidden => None,
            Face::Revealed | Face::Matched => Some(SYMBOLS[card.symbol as usize]),
        }
    }
}
