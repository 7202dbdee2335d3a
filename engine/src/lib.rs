//! Gamehub engine.
//!
//! This crate contains the stateful core of gamehub: the entry-fee-gated
//! session state machine, the two game variants, the points ledger, the
//! rate-limited airdrop claim engine, and the leaderboard ranker.
//!
//! ## Determinism requirements
//! - Do not read wall-clock time inside the engine; every time-dependent
//!   operation takes an explicit `now_ms` from the caller.
//! - Do not draw randomness from a global source; shuffles take
//!   `&mut impl Rng` so callers (and tests) control seeding.
//! - Avoid iteration order of hash-based collections influencing outputs.
//!
//! ## Mutation discipline
//! Operations that depend on an external transfer (entry-fee charge,
//! airdrop payout) apply no local mutation until the transfer resolves
//! successfully. A failed collaborator call leaves all engine state exactly
//! as it was.

pub mod airdrop;
pub mod games;
pub mod leaderboard;
pub mod ledger;
pub mod session;
pub mod timers;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

use gamehub_types::PlayerId;
use thiserror::Error;

pub use airdrop::{eligible_tokens, AirdropEngine, AirdropRecord, ClaimReceipt};
pub use games::{ActiveGame, GameInput};
pub use leaderboard::{merge_standings, Ranking};
pub use ledger::{MemStore, PointsLedger, Store};
pub use session::{SessionManager, SessionPhase, SessionUpdate};
pub use timers::{TimerKind, TimerSet};

/// Reason an external value transfer failed.
#[derive(Error, Debug, Clone)]
#[error("transfer failed: {0}")]
pub struct TransferError(pub String);

/// Capability to move value from the current identity to an address.
///
/// Implemented outside the engine (wallet + chain client in production,
/// mocks in tests). Used for the entry-fee charge and the airdrop payout.
pub trait Funding {
    fn transfer(
        &self,
        from: &PlayerId,
        to: &str,
        amount: u64,
    ) -> impl std::future::Future<Output = Result<(), TransferError>> + Send;
}

/// Errors surfaced by the session state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no wallet connected")]
    NoWallet,
    #[error("a session is already active for this player")]
    AlreadyActive,
    #[error("entry fee payment failed: {0}")]
    EntryFeeFailed(String),
    #[error("no active session for this player")]
    NoActiveSession,
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors surfaced by the airdrop claim engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("airdrop limit reached, next claim available at {next_available_ms} ms")]
    RateLimited { next_available_ms: u64 },
    #[error("insufficient points for an airdrop: {points}")]
    InsufficientPoints { points: u64 },
    #[error("transfer failed: {0}")]
    TransferFailed(String),
}
