//  src/db/history.rs

use sqlx::SqlitePool;

use crate::db::models::HistoricalPrice;

#[derive(thiserror::Error, Debug)]
pub enum HistoryError {
    #[error("db: {0}")]
    Db(#[from] sqlx::Error),
}

/// Create the backing table on a fresh database.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), HistoryError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS historical_price_data (
            symbol TEXT NOT NULL,
            date   TEXT NOT NULL,
            open   REAL NOT NULL,
            high   REAL NOT NULL,
            low    REAL NOT NULL,
            close  REAL NOT NULL,
            PRIMARY KEY (symbol, date)
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Stored rows for a symbol, oldest first, capped at `days`.
pub async fn fetch_for_symbol(
    pool: &SqlitePool,
    symbol: &str,
    days: i64,
) -> Result<Vec<HistoricalPrice>, HistoryError> {
    let rows = sqlx::query_as::<_, HistoricalPrice>(
        r#"
        SELECT symbol, date, open, high, low, close
          FROM historical_price_data
         WHERE symbol = ?1
         ORDER BY date
         LIMIT ?2
        "#,
    )
    .bind(symbol.to_ascii_uppercase())
    .bind(days)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Latest two closes as (previous, latest) when the store has that many.
pub async fn last_two_closes(
    pool: &SqlitePool,
    symbol: &str,
) -> Result<Option<(f64, f64)>, HistoryError> {
    let rows: Vec<(f64,)> = sqlx::query_as(
        r#"
        SELECT close
          FROM historical_price_data
         WHERE symbol = ?1
         ORDER BY date DESC
         LIMIT 2
        "#,
    )
    .bind(symbol.to_ascii_uppercase())
    .fetch_all(pool)
    .await?;

    match rows.as_slice() {
        [(latest,), (previous,)] => Ok(Some((*previous, *latest))),
        _ => Ok(None),
    }
}

/// Insert or overwrite the row for (symbol, date).
pub async fn upsert(
    pool: &SqlitePool,
    symbol: &str,
    date: &str,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
) -> Result<(), HistoryError> {
    sqlx::query(
        r#"
        INSERT INTO historical_price_data (symbol, date, open, high, low, close)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT (symbol, date)
        DO UPDATE SET open = excluded.open,
                      high = excluded.high,
                      low  = excluded.low,
                      close = excluded.close
        "#,
    )
    .bind(symbol.to_ascii_uppercase())
    .bind(date)
    .bind(open)
    .bind(high)
    .bind(low)
    .bind(close)
    .execute(pool)
    .await?;
    Ok(())
}

/// Drop every stored row for a symbol.
pub async fn clear_symbol(pool: &SqlitePool, symbol: &str) -> Result<(), HistoryError> {
    sqlx::query("DELETE FROM historical_price_data WHERE symbol = ?1")
        .bind(symbol.to_ascii_uppercase())
        .execute(pool)
        .await?;
    Ok(())
}

// ======================================================================
// UNIT TESTS
// ======================================================================
