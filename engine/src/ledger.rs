//! Points ledger.
//!
//! A pure accumulator of per-player point totals. Totals are monotonically
//! non-decreasing for the lifetime of the process: the only mutation is the
//! award operation, and nothing subtracts points.
//!
//! Storage is behind the [`Store`] trait so a persistent backend can be
//! swapped in without touching the ledger or the airdrop engine; the
//! in-memory [`MemStore`] is the default and makes no durability promise.

use gamehub_types::PlayerId;
use std::collections::BTreeMap;

/// Keyed record storage injected into the ledger and the airdrop engine.
pub trait Store<T: Clone> {
    fn get(&self, id: &PlayerId) -> Option<T>;
    fn put(&mut self, id: &PlayerId, value: T);
    /// Drop every record. Test/teardown hook.
    fn reset(&mut self);
}

/// In-memory store. `BTreeMap` keeps iteration deterministic.
#[derive(Clone, Debug, Default)]
pub struct MemStore<T: Clone> {
    records: BTreeMap<PlayerId, T>,
}

impl<T: Clone> MemStore<T> {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Clone> Store<T> for MemStore<T> {
    fn get(&self, id: &PlayerId) -> Option<T> {
        self.records.get(id).cloned()
    }

    fn put(&mut self, id: &PlayerId, value: T) {
        self.records.insert(id.clone(), value);
    }

    fn reset(&mut self) {
        self.records.clear();
    }
}

/// Per-player point totals.
#[derive(Clone, Debug, Default)]
pub struct PointsLedger<S: Store<u64>> {
    store: S,
}

impl<S: Store<u64>> PointsLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Add `delta` to the player's total, creating the record on first
    /// award, and return the new total. Saturating: a total can never wrap
    /// back down.
    pub fn award(&mut self, id: &PlayerId, delta: u64) -> u64 {
        let total = self.total(id).saturating_add(delta);
        self.store.put(id, total);
        tracing::debug!(player = %id, delta, total, "points awarded");
        total
    }

    /// Current total for a player, zero if never awarded.
    pub fn total(&self, id: &PlayerId) -> u64 {
        self.store.get(id).unwrap_or(0)
    }

    /// Drop every record. Test/teardown hook.
    pub fn reset(&mut self) {
        self.store.reset();
    }
}
