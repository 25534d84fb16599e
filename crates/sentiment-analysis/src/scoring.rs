use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Overall score at or above this is positive
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Overall score at or below this is negative
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Tone bucket of a sentiment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(format!("unknown sentiment label: {}", other)),
        }
    }
}

/// Combined tone of a headline and its description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ArticleScore {
    /// Absent unless both halves were scored
    pub overall: Option<f64>,
    pub label: SentimentLabel,
}

/// Average the title and description compound scores. If either half is
/// missing the overall score is absent and the label is neutral.
pub fn score_article(title_sentiment: Option<f64>, description_sentiment: Option<f64>) -> ArticleScore {
    let overall = title_sentiment
        .zip(description_sentiment)
        .map(|(title, description)| (title + description) / 2.0);
    ArticleScore {
        overall,
        label: overall.map_or(SentimentLabel::Neutral, SentimentLabel::from_score),
    }
}
