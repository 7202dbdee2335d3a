//! Session state machine.
//!
//! One play attempt runs `Idle -> FeePending -> Active -> {Completed,
//! Abandoned} -> Idle`. A session record exists only while the machine is
//! not `Idle`; terminal transitions discard it (and cancel its timers)
//! atomically.
//!
//! Entry-fee discipline: the fee transfer is delegated to the [`Funding`]
//! capability while the machine sits in `FeePending`. A failed transfer
//! returns the machine to `Idle` with no local mutation and no automatic
//! retry. The fee is not refunded on abandonment (pay-to-attempt).

use crate::games::{ActiveGame, GameInput};
use crate::ledger::{PointsLedger, Store};
use crate::timers::TimerSet;
use crate::{Funding, SessionError};
use gamehub_types::{game_descriptor, GameId, PlayerId};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Observable phase of a player's session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// No live session.
    Idle,
    /// Entry fee transfer in flight.
    FeePending,
    /// Game variant running.
    Active,
}

/// Result of delivering input or expired timers to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionUpdate {
    /// The session is still in progress.
    Continuing,
    /// The game variant reported its outcome; the session is gone and, on
    /// success, points were awarded.
    Completed {
        success: bool,
        points_awarded: u64,
        new_total: u64,
    },
}

#[derive(Clone, Debug)]
struct Session {
    game_id: GameId,
    /// `None` while the entry fee is pending.
    game: Option<ActiveGame>,
    timers: TimerSet,
}

/// Governs every player's play attempts and owns the points ledger the
/// attempts feed.
///
/// At most one live session per identity: a second play request while any
/// session exists is rejected. All per-identity mutation happens in
/// response to that identity's own calls, so no internal locking is
/// needed.
#[derive(Debug)]
pub struct SessionManager<F: Funding, S: Store<u64>> {
    funding: F,
    ledger: PointsLedger<S>,
    sessions: BTreeMap<PlayerId, Session>,
    entry_fee: u64,
    treasury: String,
}

impl<F: Funding, S: Store<u64>> SessionManager<F, S> {
    pub fn new(funding: F, ledger: PointsLedger<S>, entry_fee: u64, treasury: String) -> Self {
        Self {
            funding,
            ledger,
            sessions: BTreeMap::new(),
            entry_fee,
            treasury,
        }
    }

    /// Start a play attempt: charge the entry fee, then activate the game
    /// variant.
    ///
    /// Fails with [`SessionError::NoWallet`] when the identity has no
    /// funding capability, [`SessionError::AlreadyActive`] while any
    /// session for the identity is live, and
    /// [`SessionError::EntryFeeFailed`] when the transfer fails, in which
    /// case the machine is back at `Idle` and the player was charged at
    /// most once.
    pub async fn start(
        &mut self,
        id: &PlayerId,
        game_id: GameId,
        has_wallet: bool,
        rng: &mut (impl Rng + Send),
        now_ms: u64,
    ) -> Result<(), SessionError> {
        if !has_wallet {
            return Err(SessionError::NoWallet);
        }
        if self.sessions.contains_key(id) {
            return Err(SessionError::AlreadyActive);
        }

        self.sessions.insert(
            id.clone(),
            Session {
                game_id,
                game: None,
                timers: TimerSet::new(),
            },
        );
        debug!(player = %id, game = game_id.as_str(), fee = self.entry_fee, "charging entry fee");
        match self
            .funding
            .transfer(id, &self.treasury, self.entry_fee)
            .await
        {
            Ok(()) => {
                let session = self
                    .sessions
                    .get_mut(id)
                    .expect("session inserted before the transfer");
                session.game = Some(ActiveGame::new(game_id, rng, now_ms, &mut session.timers));
                info!(player = %id, game = game_id.as_str(), "session active");
                Ok(())
            }
            Err(err) => {
                // Back to Idle; no retry, the player decides.
                self.sessions.remove(id);
                warn!(player = %id, reason = %err.0, "entry fee failed");
                Err(SessionError::EntryFeeFailed(err.0))
            }
        }
    }

    /// Route player input to the active game variant and settle the
    /// session if the variant completed.
    pub fn input(
        &mut self,
        id: &PlayerId,
        input: GameInput,
        rng: &mut impl Rng,
        now_ms: u64,
    ) -> Result<SessionUpdate, SessionError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or(SessionError::NoActiveSession)?;
        let Some(game) = session.game.as_mut() else {
            return Err(SessionError::NoActiveSession);
        };
        game.input(input, rng, now_ms, &mut session.timers)?;
        Ok(self.settle_if_complete(id))
    }

    /// Deliver expired timers to every live session, settling any that
    /// complete as a result (a quiz finishing its last advance delay, for
    /// example). Returns the settlements.
    pub fn tick_all(&mut self, now_ms: u64) -> Vec<(PlayerId, SessionUpdate)> {
        let ids: Vec<PlayerId> = self.sessions.keys().cloned().collect();
        let mut settled = Vec::new();
        for id in ids {
            let Some(session) = self.sessions.get_mut(&id) else {
                continue;
            };
            let Some(game) = session.game.as_mut() else {
                continue;
            };
            for kind in session.timers.pop_expired(now_ms) {
                game.on_timer(kind, now_ms, &mut session.timers);
            }
            match self.settle_if_complete(&id) {
                SessionUpdate::Continuing => {}
                update => settled.push((id, update)),
            }
        }
        settled
    }

    /// Explicit exit before completion. No points, no refund.
    pub fn abandon(&mut self, id: &PlayerId) -> Result<(), SessionError> {
        let mut session = self
            .sessions
            .remove(id)
            .ok_or(SessionError::NoActiveSession)?;
        // Cancel before drop so no timer can fire into the dead session.
        session.timers.clear();
        info!(player = %id, game = session.game_id.as_str(), "session abandoned");
        Ok(())
    }

    /// Current phase for an identity (`Idle` when no session exists).
    pub fn phase(&self, id: &PlayerId) -> SessionPhase {
        match self.sessions.get(id) {
            None => SessionPhase::Idle,
            Some(session) if session.game.is_none() => SessionPhase::FeePending,
            Some(_) => SessionPhase::Active,
        }
    }

    /// The live game instance, for display.
    pub fn active_game(&self, id: &PlayerId) -> Option<&ActiveGame> {
        self.sessions.get(id).and_then(|session| session.game.as_ref())
    }

    /// Earliest pending timer deadline across every session, for sweep
    /// scheduling.
    pub fn next_deadline(&self) -> Option<u64> {
        self.sessions
            .values()
            .filter_map(|session| session.timers.next_deadline())
            .min()
    }

    pub fn ledger(&self) -> &PointsLedger<S> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut PointsLedger<S> {
        &mut self.ledger
    }

    /// If the session's game reported an outcome, discard the session,
    /// cancel its timers, and award points on success.
    fn settle_if_complete(&mut self, id: &PlayerId) -> SessionUpdate {
        let Some(session) = self.sessions.get(id) else {
            return SessionUpdate::Continuing;
        };
        let Some(success) = session.game.as_ref().and_then(ActiveGame::outcome) else {
            return SessionUpdate::Continuing;
        };

        let mut session = self.sessions.remove(id).expect("session checked above");
        session.timers.clear();
        let points_awarded = if success {
            game_descriptor(session.game_id).points_per_win
        } else {
            0
        };
        let new_total = self.ledger.award(id, points_awarded);
        info!(
            player = %id,
            game = session.game_id.as_str(),
            success,
            points_awarded,
            new_total,
            "session completed"
        );
        SessionUpdate::Completed {
            success,
            points_awarded,
            new_total,
        }
    }
}
