//! Funding capability implementation.
//!
//! The real wallet/chain client lives outside this repository; until it is
//! wired in, transfers are simulated: logged and reported successful. This
//! is the single integration point for entry-fee charges and airdrop
//! payouts.

use gamehub_engine::{Funding, TransferError};
use gamehub_types::PlayerId;
use tracing::info;

/// Balance reported for every address while transfers are simulated (1 SOL).
const SIMULATED_BALANCE_LAMPORTS: u64 = 1_000_000_000;

/// Logs every transfer and succeeds.
#[derive(Clone, Debug, Default)]
pub struct SimulatedFunding;

impl SimulatedFunding {
    /// Native-asset balance of an address. Display only; no engine
    /// decision depends on it.
    pub async fn balance(&self, address: &str) -> Result<u64, TransferError> {
        info!(address, "simulated balance query");
        Ok(SIMULATED_BALANCE_LAMPORTS)
    }
}

impl Funding for SimulatedFunding {
    async fn transfer(&self, from: &PlayerId, to: &str, amount: u64) -> Result<(), TransferError> {
        info!(%from, to, amount, "simulated transfer");
        Ok(())
    }
}
