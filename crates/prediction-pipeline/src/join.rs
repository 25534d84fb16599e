use market_core::{CombinedRecord, FusionCoefficients, MarketDataError, MarketResult, StockObservation};
use sentiment_analysis::SentimentByCompany;

use crate::fusion::fuse;

/// Attach sentiment and the fused prediction to every stock row.
///
/// Sentiment is looked up by symbol only, so all rows of one symbol carry the
/// same score; symbols without sentiment get 0.0. Output order matches
/// `stock_series`. An empty series means the store had nothing for `symbol`.
pub fn join(
    symbol: &str,
    stock_series: &[StockObservation],
    sentiment_by_company: &SentimentByCompany,
    coeffs: &FusionCoefficients,
) -> MarketResult<Vec<CombinedRecord>> {
    if stock_series.is_empty() {
        return Err(MarketDataError::NotFound(symbol.to_string()));
    }

    let records = stock_series
        .iter()
        .map(|obs| {
            let sentiment = sentiment_by_company.get(&obs.symbol).copied().unwrap_or(0.0);
            CombinedRecord {
                date: obs.date,
                price: obs.price,
                symbol: obs.symbol.clone(),
                volume: obs.volume,
                raw_prediction: obs.raw_prediction,
                sentiment,
                final_prediction: fuse(obs.raw_prediction, sentiment, coeffs),
            }
        })
        .collect();

    Ok(records)
}

/// Sentiment of the chronologically last record, 0.0 when there is none.
pub fn latest_sentiment(records: &[CombinedRecord]) -> f64 {
    records.last().map(|r| r.sentiment).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stock(day: u32, symbol: &str, price: f64, raw: f64) -> StockObservation {
        StockObservation {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            symbol: symbol.to_string(),
            price,
            volume: 1000,
            raw_prediction: raw,
        }
    }

    #[test]
    fn test_empty_series_is_not_found() {
        let err = join("AAPL", &[], &SentimentByCompany::new(), &FusionCoefficients::default())
            .unwrap_err();
        assert_eq!(err, MarketDataError::NotFound("AAPL".to_string()));
    }

    #[test]
    fn test_end_to_end_example() {
        let series = vec![stock(1, "AAPL", 100.0, 101.0)];
        let mut sentiment = SentimentByCompany::new();
        sentiment.insert("AAPL".to_string(), 0.5);

        let records = join("AAPL", &series, &sentiment, &FusionCoefficients::default()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(r.price, 100.0);
        assert_eq!(r.volume, 1000);
        assert_eq!(r.raw_prediction, 101.0);
        assert_eq!(r.sentiment, 0.5);
        assert!((r.final_prediction - 60.75).abs() < 1e-9);
    }

    #[test]
    fn test_missing_sentiment_defaults_to_zero() {
        let series = vec![stock(1, "MSFT", 300.0, 310.0)];
        let coeffs = FusionCoefficients::new(0.6, 0.3, 0.1);
        let records = join("MSFT", &series, &SentimentByCompany::new(), &coeffs).unwrap();
        assert_eq!(records[0].sentiment, 0.0);
        assert!((records[0].final_prediction - 0.6 * 310.0).abs() < 1e-9);
    }

    #[test]
    fn test_every_row_gets_the_same_symbol_sentiment() {
        let series = vec![stock(1, "AAPL", 100.0, 101.0), stock(2, "AAPL", 102.0, 103.0)];
        let mut sentiment = SentimentByCompany::new();
        sentiment.insert("AAPL".to_string(), -0.25);

        let records = join("AAPL", &series, &sentiment, &FusionCoefficients::default()).unwrap();
        assert!(records.iter().all(|r| r.sentiment == -0.25));
        assert_eq!(records[0].date.format("%d").to_string(), "01");
        assert_eq!(records[1].date.format("%d").to_string(), "02");
    }

    #[test]
    fn test_latest_sentiment() {
        assert_eq!(latest_sentiment(&[]), 0.0);

        let series = vec![stock(1, "AAPL", 100.0, 101.0)];
        let mut sentiment = SentimentByCompany::new();
        sentiment.insert("AAPL".to_string(), 0.3);
        let records = join("AAPL", &series, &sentiment, &FusionCoefficients::default()).unwrap();
        assert_eq!(latest_sentiment(&records), 0.3);
    }
}
