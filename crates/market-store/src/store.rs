use async_trait::async_trait;
use chrono::{DateTime, Utc};
use market_core::{MarketDataError, MarketDataStore, MarketResult, SentimentObservation, StockObservation};
use sentiment_analysis::{score_article, ArticleScore};

use crate::db::MarketDb;
use crate::models::{NewsSentimentInput, SentimentRow, StockInput, StockRow};

/// Parse a stored timestamp - handles both RFC3339 and SQLite CURRENT_TIMESTAMP formats
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .map(|naive| naive.and_utc())
        })
        .ok()
}

fn row_timestamp(raw: &str, table: &str) -> MarketResult<DateTime<Utc>> {
    parse_timestamp(raw).ok_or_else(|| {
        MarketDataError::Upstream(format!("malformed timestamp '{}' in {}", raw, table))
    })
}

/// Pair rows with their parsed instant and sort by it. Rows arrive in
/// insertion order and the sort is stable, so equal instants keep that order.
/// Stored text mixes RFC 3339 offsets and SQLite's space-separated form, so
/// the database's string ordering cannot be trusted.
fn chronological<R>(
    rows: Vec<R>,
    table: &str,
    raw: impl Fn(&R) -> &str,
) -> MarketResult<Vec<(DateTime<Utc>, R)>> {
    let mut timed = rows
        .into_iter()
        .map(|row| Ok((row_timestamp(raw(&row), table)?, row)))
        .collect::<MarketResult<Vec<_>>>()?;
    timed.sort_by_key(|(ts, _)| *ts);
    Ok(timed)
}

pub struct SqliteMarketStore {
    db: MarketDb,
}

impl SqliteMarketStore {
    pub fn new(db: MarketDb) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &MarketDb {
        &self.db
    }

    /// Insert one price/prediction row
    pub async fn insert_stock(&self, input: &StockInput) -> anyhow::Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO stock_predictions (symbol, timestamp, price, volume, raw_prediction)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(input.symbol.to_uppercase())
        .bind(input.timestamp.to_rfc3339())
        .bind(input.price)
        .bind(input.volume)
        .bind(input.raw_prediction)
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Score and store a news article; returns the stored overall score
    pub async fn record_news_sentiment(&self, input: &NewsSentimentInput) -> anyhow::Result<ArticleScore> {
        let score = score_article(input.title_sentiment, input.description_sentiment);
        let company = input.company.to_uppercase();
        let timestamp = input.timestamp.unwrap_or_else(Utc::now);

        sqlx::query(
            r#"
            INSERT INTO news_sentiment
                (timestamp, company, title, description,
                 title_sentiment, description_sentiment,
                 overall_sentiment, sentiment_label)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(timestamp.to_rfc3339())
        .bind(&company)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.title_sentiment)
        .bind(input.description_sentiment)
        .bind(score.overall)
        .bind(score.label.as_str())
        .execute(self.db.pool())
        .await?;

        tracing::debug!(company = %company, overall = ?score.overall, label = %score.label, "news sentiment recorded");
        Ok(score)
    }
}

#[async_trait]
impl MarketDataStore for SqliteMarketStore {
    async fn stock_series(&self, symbol: &str) -> MarketResult<Vec<StockObservation>> {
        let rows = sqlx::query_as::<_, StockRow>(
            "SELECT symbol, timestamp, price, volume, raw_prediction FROM stock_predictions \
             WHERE symbol = ? ORDER BY id ASC",
        )
        .bind(symbol)
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| MarketDataError::upstream("stock series query failed", e))?;

        Ok(chronological(rows, "stock_predictions", |row| row.timestamp.as_str())?
            .into_iter()
            .map(|(ts, row)| StockObservation::at(ts, row.symbol, row.price, row.volume, row.raw_prediction))
            .collect())
    }

    async fn sentiment_series(&self, company: &str) -> MarketResult<Vec<SentimentObservation>> {
        let rows = sqlx::query_as::<_, SentimentRow>(
            "SELECT company, timestamp, overall_sentiment FROM news_sentiment \
             WHERE company = ? ORDER BY id ASC",
        )
        .bind(company)
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| MarketDataError::upstream("sentiment series query failed", e))?;

        Ok(chronological(rows, "news_sentiment", |row| row.timestamp.as_str())?
            .into_iter()
            .map(|(ts, row)| SentimentObservation {
                date: ts.date_naive(),
                company: row.company,
                sentiment_score: row.overall_sentiment.unwrap_or(0.0),
            })
            .collect())
    }
}
