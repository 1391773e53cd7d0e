// src/utils/errors.rs

use std::{error::Error, fmt};

/// Errors on the market-data side: catalog lookups and series generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    UnknownSymbol(String),
    InvalidSeriesLength(usize),
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::UnknownSymbol(sym)    => write!(f, "Asset not found: {}", sym),
            MarketError::InvalidSeriesLength(n) => {
                write!(f, "Candle series needs at least 2 days, got {}", n)
            }
        }
    }
}

impl Error for MarketError {}

/// Errors at the purchase-workflow level: validation, authorization, state.
/// Every variant is recoverable; the caller lands back on a well-defined
/// step of the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    UnknownSymbol(String),
    UnitsBelowMinimum,
    TooManyDecimals,
    PinFormat,
    PinMismatch,
    NoPendingOrder,
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::UnknownSymbol(sym) => write!(f, "Asset not found: {}", sym),
            OrderError::UnitsBelowMinimum  => write!(f, "Number of units must be at least 1.00"),
            OrderError::TooManyDecimals    => {
                write!(f, "Number of units can have maximum 2 decimal places")
            }
            OrderError::PinFormat      => write!(f, "PIN must be exactly 4 digits"),
            OrderError::PinMismatch    => write!(f, "Incorrect PIN. Please try again."),
            OrderError::NoPendingOrder => write!(f, "No pending order found"),
        }
    }
}

impl Error for OrderError {}
