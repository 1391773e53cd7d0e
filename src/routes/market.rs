// src/routes/market.rs

use actix_web::dev::HttpServiceFactory;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db::history;
use crate::middleware::session::{SessionBinder, SessionId};
use crate::services::catalog::{Asset, Catalog};
use crate::services::price_feed::{self, CandleSeries, Quote, DEFAULT_SERIES_DAYS};
use crate::services::session::SessionStore;
use crate::utils::errors::MarketError;
use crate::utils::types::ApiResponse;

/// Last two closes for the 24 h change override. Store trouble degrades
/// to the synthetic change rather than failing the request.
async fn recent_closes(pool: &Option<SqlitePool>, symbol: &str) -> Option<(f64, f64)> {
    let pool = pool.as_ref()?;
    match history::last_two_closes(pool, symbol).await {
        Ok(closes) => closes,
        Err(e) => {
            log::warn!("history read failed for {symbol}: {e}");
            None
        }
    }
}

#[get("/quotes")]
pub async fn quotes(
    session_id: SessionId,
    catalog: web::Data<Catalog>,
    sessions: web::Data<SessionStore>,
    pool: web::Data<Option<SqlitePool>>,
) -> impl Responder {
    let bucket = price_feed::time_bucket(Utc::now());

    let mut out = Vec::with_capacity(catalog.assets().len());
    for a in catalog.assets() {
        let closes = recent_closes(pool.get_ref(), &a.symbol).await;
        let quantity = sessions.with(session_id.0, |s| s.holdings(a));
        out.push(price_feed::quote_snapshot(a, bucket, quantity, closes));
    }

    HttpResponse::Ok().json(ApiResponse::<Vec<Quote>> {
        success: true,
        message: None,
        data: Some(out),
    })
}

#[get("/assets/{symbol}")]
pub async fn asset(path: web::Path<String>, catalog: web::Data<Catalog>) -> impl Responder {
    let symbol = path.into_inner();
    match catalog.get(&symbol) {
        Some(a) => HttpResponse::Ok().json(ApiResponse::<Asset> {
            success: true,
            message: None,
            data: Some(a.clone()),
        }),
        None => HttpResponse::NotFound().json(ApiResponse::<()> {
            success: false,
            message: Some(MarketError::UnknownSymbol(symbol).to_string()),
            data: None,
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct CandleQuery {
    pub days: Option<usize>,
}

#[get("/assets/{symbol}/candles")]
pub async fn candles(
    path: web::Path<String>,
    query: web::Query<CandleQuery>,
    catalog: web::Data<Catalog>,
    pool: web::Data<Option<SqlitePool>>,
) -> impl Responder {
    let symbol = path.into_inner();
    let days = query.days.unwrap_or(DEFAULT_SERIES_DAYS);

    let a = match catalog.get(&symbol) {
        Some(a) => a,
        None => {
            return HttpResponse::NotFound().json(ApiResponse::<()> {
                success: false,
                message: Some(MarketError::UnknownSymbol(symbol).to_string()),
                data: None,
            })
        }
    };

    let stored = match pool.get_ref() {
        Some(p) => history::fetch_for_symbol(p, &a.symbol, days as i64)
            .await
            .unwrap_or_else(|e| {
                log::warn!("history read failed for {}: {e}", a.symbol);
                Vec::new()
            }),
        None => Vec::new(),
    };

    match price_feed::candle_series(a, days, &stored) {
        Ok(series) => HttpResponse::Ok().json(ApiResponse::<CandleSeries> {
            success: true,
            message: None,
            data: Some(series),
        }),
        Err(e) => HttpResponse::BadRequest().json(ApiResponse::<()> {
            success: false,
            message: Some(e.to_string()),
            data: None,
        }),
    }
}

pub fn market_scope() -> impl HttpServiceFactory {
    web::scope("/api/market")
        .wrap(SessionBinder)
        .service(quotes)
        .service(asset)
        .service(candles)
}
