use market_core::SentimentObservation;
use std::collections::HashMap;

/// Latest sentiment score keyed by company
pub type SentimentByCompany = HashMap<String, f64>;

/// Collapse observations into one score per company.
///
/// Later entries overwrite earlier ones, so with input sorted ascending by
/// date each company ends up with its most recent score. The `date` field is
/// not consulted.
pub fn aggregate(observations: &[SentimentObservation]) -> SentimentByCompany {
    let mut latest = SentimentByCompany::with_capacity(observations.len());
    for obs in observations {
        latest.insert(obs.company.clone(), obs.sentiment_score);
    }
    tracing::debug!(
        observations = observations.len(),
        companies = latest.len(),
        "aggregated sentiment"
    );
    latest
}
