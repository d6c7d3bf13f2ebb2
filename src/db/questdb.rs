//! QuestDB persistence for analyzed series and emitted signals
//!
//! Speaks the Postgres wire protocol through tokio-postgres. Each
//! (symbol, resolution) series lives in its own table which is dropped and
//! recreated on every write, so the table always mirrors the latest run.

use tokio_postgres::{Client, NoTls};
use tracing::{debug, error};

use super::error::StoreError;
use crate::models::{AnalyzedCandle, SignalRecord};

pub struct AnalysisDatabase {
    client: Client,
}

/// Table holding the analyzed series for one key, e.g. `btcusdt_15m_analysis`.
pub fn analysis_table_name(symbol: &str, resolution_minutes: u32) -> String {
    let symbol: String = symbol
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("{}_{}m_analysis", symbol, resolution_minutes)
}

/// Table a new series is written to before it replaces `table`.
pub fn staging_table_name(table: &str) -> String {
    format!("{}_staging", table)
}

impl AnalysisDatabase {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(url, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "QuestDB connection error");
            }
        });

        let db = Self { client };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        self.client
            .execute(
                "CREATE TABLE IF NOT EXISTS signals (
                    timestamp TIMESTAMP,
                    signal_id STRING,
                    symbol SYMBOL,
                    resolution INT,
                    side SYMBOL,
                    entry_price DOUBLE,
                    candle_time STRING
                ) TIMESTAMP(timestamp) PARTITION BY DAY",
                &[],
            )
            .await?;
        Ok(())
    }

    /// Replace the stored series for `symbol` at `resolution_minutes`.
    ///
    /// Rows are written to a staging table that is only renamed over the
    /// live one once every insert succeeded. On failure the staging table is
    /// dropped and the previous series stays in place.
    pub async fn replace_analysis(
        &self,
        symbol: &str,
        resolution_minutes: u32,
        rows: &[AnalyzedCandle],
    ) -> Result<(), StoreError> {
        let table = analysis_table_name(symbol, resolution_minutes);
        let staging = staging_table_name(&table);

        if let Err(e) = self.write_series(&staging, rows).await {
            if let Err(cleanup) = self.drop_table(&staging).await {
                error!(table = %staging, error = %cleanup, "Failed to drop staging table");
            }
            return Err(e);
        }

        self.drop_table(&table).await?;
        self.client
            .execute(&format!("RENAME TABLE {} TO {}", staging, table), &[])
            .await?;

        debug!(table = %table, rows = rows.len(), "Results saved to table '{}'", table);
        Ok(())
    }

    async fn drop_table(&self, table: &str) -> Result<(), StoreError> {
        self.client
            .execute(&format!("DROP TABLE IF EXISTS {}", table), &[])
            .await?;
        Ok(())
    }

    async fn write_series(&self, table: &str, rows: &[AnalyzedCandle]) -> Result<(), StoreError> {
        self.drop_table(table).await?;
        self.client
            .execute(
                &format!(
                    "CREATE TABLE {} (
                        timestamp TIMESTAMP,
                        open DOUBLE,
                        high DOUBLE,
                        low DOUBLE,
                        close DOUBLE,
                        volume DOUBLE,
                        filter DOUBLE,
                        fdir INT,
                        trend SYMBOL,
                        signal SYMBOL
                    ) TIMESTAMP(timestamp)",
                    table
                ),
                &[],
            )
            .await?;

        let insert = format!(
            "INSERT INTO {} (timestamp, open, high, low, close, volume, filter, fdir, trend, signal)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            table
        );
        let statement = self.client.prepare(&insert).await?;

        for row in rows {
            let c = &row.candle;
            let timestamp = c.timestamp.naive_utc();
            let trend = row.trend.to_string();
            self.client
                .execute(
                    &statement,
                    &[
                        &timestamp,
                        &c.open,
                        &c.high,
                        &c.low,
                        &c.close,
                        &c.volume,
                        &row.filter,
                        &row.direction.as_i32(),
                        &trend,
                        &row.signal.as_str(),
                    ],
                )
                .await?;
        }
        Ok(())
    }

    pub async fn store_signal(
        &self,
        record: &SignalRecord,
        resolution_minutes: u32,
    ) -> Result<(), StoreError> {
        let now = chrono::Utc::now().naive_utc();
        let resolution = resolution_minutes as i32;
        self.client
            .execute(
                "INSERT INTO signals (timestamp, signal_id, symbol, resolution, side, entry_price, candle_time)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
                &[
                    &now,
                    &record.signal_id,
                    &record.symbol,
                    &resolution,
                    &record.signal_side.as_str(),
                    &record.entry_price,
                    &record.creation_time_utc,
                ],
            )
            .await?;
        Ok(())
    }
}
