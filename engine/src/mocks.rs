//! Mock collaborators for tests.

use crate::{Funding, TransferError};
use gamehub_types::PlayerId;
use std::sync::{Arc, Mutex};

/// One transfer observed by [`MockFunding`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedTransfer {
    pub from: PlayerId,
    pub to: String,
    pub amount: u64,
}

/// Funding capability that records every transfer and either always
/// succeeds or always fails.
#[derive(Clone, Debug, Default)]
pub struct MockFunding {
    failure: Option<String>,
    transfers: Arc<Mutex<Vec<RecordedTransfer>>>,
}

impl MockFunding {
    /// Every transfer succeeds.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Every transfer fails with `reason`; nothing is recorded.
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            transfers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Transfers that went through, in order.
    pub fn transfers(&self) -> Vec<RecordedTransfer> {
        self.transfers.lock().expect("mock lock poisoned").clone()
    }
}

impl Funding for MockFunding {
    async fn transfer(&self, from: &PlayerId, to: &str, amount: u64) -> Result<(), TransferError> {
        if let Some(reason) = &self.failure {
            return Err(TransferError(reason.clone()));
        }
        self.transfers
            .lock()
            .expect("mock lock poisoned")
            .push(RecordedTransfer {
                from: from.clone(),
                to: to.to_string(),
                amount,
            });
        Ok(())
    }
}
