use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row of the stock_predictions table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockRow {
    pub symbol: String,
    pub timestamp: String,
    pub price: f64,
    pub volume: i64,
    pub raw_prediction: f64,
}

/// Projection of the news_sentiment table used by the join
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SentimentRow {
    pub company: String,
    pub timestamp: String,
    pub overall_sentiment: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockInput {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub volume: i64,
    pub raw_prediction: f64,
}

/// A scored news article for a company
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewsSentimentInput {
    pub company: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub title_sentiment: Option<f64>,
    #[serde(default)]
    pub description_sentiment: Option<f64>,
}
