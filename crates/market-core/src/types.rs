use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One price/volume/prediction row for a symbol on a calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StockObservation {
    pub date: NaiveDate,
    pub symbol: String,
    pub price: f64,
    pub volume: i64,
    pub raw_prediction: f64,
}

impl StockObservation {
    /// Build an observation from a full timestamp, truncating it to its UTC day.
    pub fn at(
        timestamp: DateTime<Utc>,
        symbol: impl Into<String>,
        price: f64,
        volume: i64,
        raw_prediction: f64,
    ) -> Self {
        Self {
            date: timestamp.date_naive(),
            symbol: symbol.into(),
            price,
            volume,
            raw_prediction,
        }
    }
}

/// News sentiment for a company on a calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SentimentObservation {
    pub date: NaiveDate,
    pub company: String,
    /// -1.0 to 1.0
    #[serde(default)]
    pub sentiment_score: f64,
}

/// Stock row joined with the company's sentiment and the fused prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CombinedRecord {
    pub date: NaiveDate,
    pub price: f64,
    pub symbol: String,
    pub volume: i64,
    pub raw_prediction: f64,
    pub sentiment: f64,
    pub final_prediction: f64,
}

/// Weights for `x*raw + y*sentiment + z*(raw*sentiment)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FusionCoefficients {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl FusionCoefficients {
    pub const DEFAULT: FusionCoefficients = FusionCoefficients { x: 0.5, y: 0.3, z: 0.2 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Default for FusionCoefficients {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Company {
    pub symbol: String,
    pub name: String,
}
