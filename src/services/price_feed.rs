//! Synthetic market data, reproducible by construction.
//! -----------------------------------------------------------------
//! ‣ Quote snapshots reseed per (symbol, hour bucket) – stable within
//!   the bucket, fresh once it rolls over.
//! ‣ Candle series reseed from the symbol alone, so a chart renders
//!   identically on every page load without persisting anything.
//! ‣ Rows from the historical store win over synthesis; an empty,
//!   absent or failing store falls back to the generator.
//! -----------------------------------------------------------------

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Days, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::db::models::HistoricalPrice;
use crate::services::catalog::Asset;
use crate::utils::errors::MarketError;

/// Exchanges quoted per asset, in draw order.
pub const EXCHANGES: &[&str] = &["Binance", "Coinbase"];

pub const DEFAULT_SERIES_DAYS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeQuote {
    pub price: f64,
    pub direction: Direction,
}

/// Snapshot for one asset: per-exchange prices plus the aggregates the
/// market views render. Derived per request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub icon: String,
    /// Ledger-derived holdings at snapshot time.
    pub quantity: f64,
    pub exchanges: BTreeMap<String, ExchangeQuote>,
    pub overall_price: f64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    /// `%m/%d` labels (or stored dates), oldest first, 1:1 with candles.
    pub dates: Vec<String>,
    pub candles: Vec<Candle>,
}

/// Hour-granular bucket; quotes are stable inside one bucket.
pub fn time_bucket(now: DateTime<Utc>) -> i64 {
    now.timestamp() / 3600
}

fn symbol_seed(symbol: &str) -> u64 {
    let mut h = DefaultHasher::new();
    symbol.hash(&mut h);
    h.finish()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Current snapshot for one asset.
///
/// All randomness comes from a single stream seeded by (symbol, bucket)
/// and the draw order is fixed – jitter, 24 h change, spread, one
/// direction per exchange – so a test can reseed and replay it.
/// `recent_closes` is `(previous, latest)` from the historical store; when
/// present it overrides the synthetic 24 h change.
pub fn quote_snapshot(
    asset: &Asset,
    bucket: i64,
    quantity: f64,
    recent_closes: Option<(f64, f64)>,
) -> Quote {
    let seed = symbol_seed(&asset.symbol).wrapping_add(bucket as u64);
    let mut rng = StdRng::seed_from_u64(seed);

    // ±0.5 % around the catalog base price
    let current_base = asset.base_price * rng.gen_range(0.995..1.005);

    // Bias slightly positive, then clamp to a realistic range.
    let drawn_change = ((rng.gen::<f64>() - 0.3) * 20.0).clamp(-8.0, 12.0);

    // 0.1 % – 0.5 % spread, split symmetrically around the base.
    let spread = rng.gen_range(0.001..0.005);
    let binance = current_base * (1.0 - spread / 2.0);
    let coinbase = current_base * (1.0 + spread / 2.0);

    let mut exchanges = BTreeMap::new();
    for (name, price) in EXCHANGES.iter().zip([binance, coinbase]) {
        let direction = if rng.gen_bool(0.5) {
            Direction::Up
        } else {
            Direction::Down
        };
        exchanges.insert(
            name.to_string(),
            ExchangeQuote {
                price: round2(price),
                direction,
            },
        );
    }

    let overall_price = round2((binance + coinbase) / 2.0);

    let change_percent = match recent_closes {
        Some((previous, latest)) if previous != 0.0 => {
            round2((latest - previous) / previous * 100.0)
        }
        _ => round2(drawn_change),
    };

    Quote {
        symbol: asset.symbol.clone(),
        name: asset.name.clone(),
        icon: asset.icon.clone(),
        quantity,
        exchanges,
        overall_price,
        change_percent,
    }
}

/// OHLC series for one asset, `days` candles long.
///
/// Stored rows win; otherwise the series is synthesized from a stream
/// seeded by the symbol alone, so the same request always yields the
/// same chart.
pub fn candle_series(
    asset: &Asset,
    days: usize,
    stored: &[HistoricalPrice],
) -> Result<CandleSeries, MarketError> {
    if days <= 1 {
        return Err(MarketError::InvalidSeriesLength(days));
    }

    if !stored.is_empty() {
        return Ok(CandleSeries {
            dates: stored.iter().map(|r| r.date.clone()).collect(),
            candles: stored
                .iter()
                .map(|r| Candle {
                    open: r.open,
                    high: r.high,
                    low: r.low,
                    close: r.close,
                })
                .collect(),
        });
    }

    Ok(synthetic_series(asset, days))
}

fn synthetic_series(asset: &Asset, days: usize) -> CandleSeries {
    let mut rng = StdRng::seed_from_u64(symbol_seed(&asset.symbol));

    // Series may start up to 10 % off the base and drifts back toward it.
    let start_price = asset.base_price * rng.gen_range(0.90..1.10);

    let mut candles = Vec::with_capacity(days);
    let mut previous_close = 0.0;

    for i in 0..days {
        let open = if i == 0 {
            start_price
        } else {
            // Overnight gap between sessions, −5 % to +5 %.
            let gap = rng.gen_range(-0.05..0.05);
            previous_close * (1.0 + gap)
        };

        let close = open * (1.0 + rng.gen_range(-asset.volatility..asset.volatility));

        let body_high = open.max(close);
        let body_low = open.min(close);
        let body_size = body_high - body_low;

        // Wicks at 0.5 % – 2 % of the body on each side.
        let high = body_high + body_size * rng.gen_range(0.005..0.020);
        let low = body_low - body_size * rng.gen_range(0.005..0.020);

        // Invariant: the wicks never sit inside the body. Runs after every
        // draw, unconditionally.
        let high = high.max(open).max(close);
        let low = low.min(open).min(close);

        let candle = Candle {
            open: round4(open),
            high: round4(high),
            low: round4(low),
            close: round4(close),
        };
        // Carry the post-round close so the chain matches what is displayed.
        previous_close = candle.close;
        candles.push(candle);
    }

    CandleSeries {
        dates: date_labels(days),
        candles,
    }
}

/// `%m/%d` labels ending today, oldest first.
fn date_labels(days: usize) -> Vec<String> {
    let today = Utc::now().date_naive();
    (0..days)
        .map(|i| {
            let d = today - Days::new((days - 1 - i) as u64);
            d.format("%m/%d").to_string()
        })
        .collect()
}

// ======================================================================
// UNIT TESTS
// ======================================================================
