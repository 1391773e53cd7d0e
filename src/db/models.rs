use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One stored OHLC row; unique per (symbol, date), ordered by date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoricalPrice {
    pub symbol: String,
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}
