//! Purchase pipeline: select → enter units → confirm → authorize → commit.
//! -----------------------------------------------------------------
//! Only the AWAITING_PIN stage is persisted server-side (the session's
//! pending order, because it survives a redirect); every earlier stage
//! is revalidated on each request. A successful commit clears the
//! pending order, so a replayed authorization can never double-append.
//! -----------------------------------------------------------------

use chrono::{DateTime, Utc};

use crate::services::catalog::Catalog;
use crate::services::pin::{PinStore, PIN_FORMAT};
use crate::services::session::{Order, PendingOrder, Session};
use crate::utils::errors::OrderError;

pub const MIN_UNITS: f64 = 1.0;
pub const MAX_UNIT_DECIMALS: usize = 2;

/// Validate the literal units string: at least 1.00 and no more than two
/// decimal digits. The decimal check runs on the raw input rather than
/// the parsed float, so representation artifacts cannot sneak past it.
fn validate_units(literal: &str) -> Result<f64, OrderError> {
    let literal = literal.trim();
    let units: f64 = literal.parse().unwrap_or(0.0);
    if units < MIN_UNITS {
        return Err(OrderError::UnitsBelowMinimum);
    }
    if let Some(decimals) = literal.split('.').nth(1) {
        if decimals.len() > MAX_UNIT_DECIMALS {
            return Err(OrderError::TooManyDecimals);
        }
    }
    Ok(units)
}

/// SELECTING through CONFIRMING → AWAITING_PIN in one step: resolve the
/// symbol, validate the units literal, capture the market price as quoted
/// at confirm time and stage the pending order, replacing any stale one.
pub fn start_purchase(
    catalog: &Catalog,
    session: &mut Session,
    symbol: &str,
    units_literal: &str,
    market_price: f64,
) -> Result<PendingOrder, OrderError> {
    let asset = catalog
        .get(symbol)
        .ok_or_else(|| OrderError::UnknownSymbol(symbol.to_string()))?;
    let units = validate_units(units_literal)?;

    let pending = PendingOrder {
        symbol: asset.symbol.clone(),
        units,
        market_price,
        total_cost: units * market_price,
    };
    session.pending = Some(pending.clone());
    Ok(pending)
}

/// AWAITING_PIN → COMMITTED.
///
/// A malformed or mismatched PIN leaves the pending order in place so the
/// caller can retry; success appends to the ledger and clears the slot.
pub fn authorize_purchase(
    session: &mut Session,
    pins: &PinStore,
    pin: &str,
    now: DateTime<Utc>,
) -> Result<Order, OrderError> {
    let pending = session.pending.clone().ok_or(OrderError::NoPendingOrder)?;

    if !PIN_FORMAT.is_match(pin) {
        return Err(OrderError::PinFormat);
    }
    if !pins.verify(pin) {
        return Err(OrderError::PinMismatch);
    }

    let order = Order {
        symbol: pending.symbol,
        units: pending.units,
        price: pending.market_price,
        timestamp: now,
    };
    session.append_order(order.clone());
    session.pending = None;
    Ok(order)
}

// ======================================================================
// UNIT TESTS
// ======================================================================
