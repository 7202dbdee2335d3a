//! Airdrop claim engine.
//!
//! Converts a point total into a one-time token grant, rate limited to one
//! successful claim per player per 24 hours. The payout itself is delegated
//! to the caller's [`Funding`] capability; the claim record is only updated
//! after the transfer succeeds, so a failed payout leaves no partial state
//! and the player may retry immediately.

use crate::{ClaimError, Funding, Store};
use gamehub_types::{PlayerId, AIRDROP_COOLDOWN_MS, AIRDROP_TIERS};
use tracing::{info, warn};

/// Per-player claim history. Created on first successful claim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AirdropRecord {
    /// Timestamp of the last successful claim, in epoch milliseconds.
    /// Monotonically non-decreasing.
    pub last_claimed_at_ms: u64,
    /// Lifetime token units granted to this player.
    pub total_claimed: u64,
}

/// Outcome of a successful claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimReceipt {
    pub tokens_airdropped: u64,
    pub total_airdropped: u64,
}

/// Token units a point total is eligible for: the largest tier threshold at
/// or below `points` wins, zero means ineligible.
pub fn eligible_tokens(points: u64) -> u64 {
    let mut tokens = 0;
    for (threshold, amount) in AIRDROP_TIERS {
        if points >= threshold {
            tokens = amount;
        } else {
            break;
        }
    }
    tokens
}

/// Stateful, rate-limited claim service.
#[derive(Clone, Debug, Default)]
pub struct AirdropEngine<S: Store<AirdropRecord>> {
    records: S,
}

impl<S: Store<AirdropRecord>> AirdropEngine<S> {
    pub fn new(records: S) -> Self {
        Self { records }
    }

    /// Last recorded claim for a player, if any.
    pub fn record(&self, id: &PlayerId) -> Option<AirdropRecord> {
        self.records.get(id)
    }

    /// Claim the airdrop a point total is eligible for, paying out to
    /// `recipient`.
    ///
    /// Checks run in order: cooldown, eligibility, transfer. The record is
    /// mutated only after the transfer resolves successfully.
    pub async fn claim<F: Funding>(
        &mut self,
        funding: &F,
        id: &PlayerId,
        points: u64,
        recipient: &str,
        now_ms: u64,
    ) -> Result<ClaimReceipt, ClaimError> {
        // A record exists only after a successful claim, so its presence
        // alone gates the cooldown.
        let record = self.records.get(id);
        if let Some(prior) = &record {
            let next_available_ms = prior.last_claimed_at_ms.saturating_add(AIRDROP_COOLDOWN_MS);
            if now_ms < next_available_ms {
                return Err(ClaimError::RateLimited { next_available_ms });
            }
        }
        let record = record.unwrap_or_default();

        let tokens = eligible_tokens(points);
        if tokens == 0 {
            return Err(ClaimError::InsufficientPoints { points });
        }

        if let Err(err) = funding.transfer(id, recipient, tokens).await {
            warn!(player = %id, recipient, tokens, reason = %err.0, "airdrop transfer failed");
            return Err(ClaimError::TransferFailed(err.0));
        }

        let updated = AirdropRecord {
            last_claimed_at_ms: now_ms.max(record.last_claimed_at_ms),
            total_claimed: record.total_claimed.saturating_add(tokens),
        };
        self.records.put(id, updated);
        info!(player = %id, tokens, total = updated.total_claimed, "airdrop claimed");
        Ok(ClaimReceipt {
            tokens_airdropped: tokens,
            total_airdropped: updated.total_claimed,
        })
    }

    /// Drop every record. Test/teardown hook.
    pub fn reset(&mut self) {
        self.records.reset();
    }
}
