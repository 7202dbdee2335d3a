//! Session-scoped timer set.
//!
//! Every time-driven behavior in a session (hiding a mismatched card pair,
//! expiring a quiz question, advancing after the inter-question delay) is a
//! named deadline registered here. The owning session clears the whole set
//! when it reaches a terminal phase, so no timer can fire into a discarded
//! session. Expiry is evaluated by explicit `tick` calls with a caller
//! supplied clock; the engine never reads wall-clock time.

use std::collections::BTreeMap;

/// Named session timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimerKind {
    /// Hide an unmatched card pair after the reveal delay.
    MismatchHide,
    /// Per-question countdown; expiry scores the question incorrect.
    QuestionDeadline,
    /// Short delay between a scored question and the next one.
    AdvanceDelay,
}

/// A set of pending deadlines, at most one per [`TimerKind`].
///
/// Backed by a `BTreeMap` so expired timers are always reported in a
/// deterministic order.
#[derive(Clone, Debug, Default)]
pub struct TimerSet {
    deadlines: BTreeMap<TimerKind, u64>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the deadline for a timer.
    pub fn schedule(&mut self, kind: TimerKind, at_ms: u64) {
        self.deadlines.insert(kind, at_ms);
    }

    /// Cancel a single timer if pending.
    pub fn cancel(&mut self, kind: TimerKind) {
        self.deadlines.remove(&kind);
    }

    /// Cancel every pending timer. Called on session end.
    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    /// Deadline for a specific timer, if pending.
    pub fn deadline(&self, kind: TimerKind) -> Option<u64> {
        self.deadlines.get(&kind).copied()
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.deadlines.values().copied().min()
    }

    /// Remove and return every timer whose deadline is at or before
    /// `now_ms`.
    pub fn pop_expired(&mut self, now_ms: u64) -> Vec<TimerKind> {
        let expired: Vec<TimerKind> = self
            .deadlines
            .iter()
            .filter(|(_, at)| **at <= now_ms)
            .map(|(kind, _)| *kind)
            .collect();
        for kind in &expired {
            self.deadlines.remove(kind);
        }
        expired
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
