use market_core::SentimentObservation;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::scoring::SentimentLabel;

/// Per-company statistics over a sentiment history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    pub company: String,
    pub average_sentiment: f64,
    pub article_count: usize,
    pub positive_ratio: f64,
    pub negative_ratio: f64,
    /// Score of the last observation in input order, 0.0 if none
    pub latest_sentiment: f64,
}

/// Summarize the observations belonging to `company`; others are ignored.
pub fn summarize(company: &str, observations: &[SentimentObservation]) -> SentimentSummary {
    let scores: Vec<f64> = observations
        .iter()
        .filter(|o| o.company == company)
        .map(|o| o.sentiment_score)
        .collect();

    if scores.is_empty() {
        return SentimentSummary {
            company: company.to_string(),
            average_sentiment: 0.0,
            article_count: 0,
            positive_ratio: 0.0,
            negative_ratio: 0.0,
            latest_sentiment: 0.0,
        };
    }

    let count = scores.len() as f64;
    let positive = scores
        .iter()
        .filter(|&&s| SentimentLabel::from_score(s) == SentimentLabel::Positive)
        .count();
    let negative = scores
        .iter()
        .filter(|&&s| SentimentLabel::from_score(s) == SentimentLabel::Negative)
        .count();

    SentimentSummary {
        company: company.to_string(),
        average_sentiment: scores.iter().sum::<f64>() / count,
        article_count: scores.len(),
        positive_ratio: positive as f64 / count,
        negative_ratio: negative as f64 / count,
        latest_sentiment: scores.last().copied().unwrap_or(0.0),
    }
}
