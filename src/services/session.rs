// src/services/session.rs

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::catalog::Asset;

/// A committed purchase. Immutable once appended to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub symbol: String,
    pub units: f64,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

/// Staged purchase awaiting PIN authorization. At most one per session;
/// confirming a new buy replaces any stale one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingOrder {
    pub symbol: String,
    pub units: f64,
    pub market_price: f64,
    pub total_cost: f64,
}

/// Per-caller state: the pending-order slot plus the append-only ledger.
#[derive(Debug, Default)]
pub struct Session {
    pub pending: Option<PendingOrder>,
    orders: Vec<Order>,
}

impl Session {
    pub fn append_order(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn ledger(&self) -> &[Order] {
        &self.orders
    }

    /// Initial quantity plus every committed unit for the symbol.
    /// Recomputed from the ledger on each call so the view cannot drift.
    pub fn holdings(&self, asset: &Asset) -> f64 {
        let purchased: f64 = self
            .orders
            .iter()
            .filter(|o| o.symbol == asset.symbol)
            .map(|o| o.units)
            .sum();
        asset.initial_quantity + purchased
    }

    /// Ledger entries most-recent-first. Timestamp ties fall back to
    /// insertion order, later entries first.
    pub fn orders_recent_first(&self) -> Vec<Order> {
        let mut out: Vec<Order> = self.orders.iter().rev().cloned().collect();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        out
    }
}

/// Thin, cheap-to-clone registry of live sessions keyed by the cookie id.
/// Shared via `.data()` in Actix.
#[derive(Default)]
pub struct SessionStore {
    inner: DashMap<Uuid, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the caller's session, creating it on first touch.
    /// Concurrent requests for one session serialize on the map shard;
    /// last write wins on the pending-order slot.
    pub fn with<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut entry = self.inner.entry(id).or_default();
        f(entry.value_mut())
    }
}

// ======================================================================
// UNIT TESTS
// ======================================================================
