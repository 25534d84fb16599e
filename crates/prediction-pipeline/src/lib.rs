use market_core::{CoefficientSource, CombinedRecord, MarketDataStore, MarketResult, SentimentObservation};
use sentiment_analysis::aggregate;
use std::sync::Arc;

pub mod calibration;
pub mod charts;
pub mod coefficients;
pub mod fusion;
pub mod join;
pub mod snapshot;

pub use calibration::{calibrate, CalibrationError, CalibrationReport};
pub use charts::{render_dashboard, ChartKind, ChartRenderer};
pub use coefficients::{CoefficientError, FileCoefficients};
pub use fusion::fuse;
pub use join::{join, latest_sentiment};
pub use snapshot::{read_snapshot, Snapshot, SnapshotWriter};

/// Builds the combined record set for one symbol per request.
pub struct PredictionPipeline {
    store: Arc<dyn MarketDataStore>,
    coefficients: Arc<dyn CoefficientSource>,
    /// Optional on-disk copy of the last result
    snapshot: Option<SnapshotWriter>,
}

impl PredictionPipeline {
    pub fn new(store: Arc<dyn MarketDataStore>, coefficients: Arc<dyn CoefficientSource>) -> Self {
        Self {
            store,
            coefficients,
            snapshot: None,
        }
    }

    pub fn with_snapshot(mut self, writer: SnapshotWriter) -> Self {
        self.snapshot = Some(writer);
        self
    }

    /// Fetch, join and fuse the data for `symbol`.
    ///
    /// The two store reads run concurrently; the join waits for both. A store
    /// failure aborts the request, an empty stock series is `NotFound`.
    pub async fn combined(&self, symbol: &str) -> MarketResult<Vec<CombinedRecord>> {
        let symbol = symbol.trim().to_uppercase();

        let (stock_result, sentiment_result) = tokio::join!(
            self.store.stock_series(&symbol),
            self.store.sentiment_series(&symbol),
        );

        let stock = stock_result.inspect_err(|e| {
            tracing::error!(symbol = %symbol, error = %e, "Failed to fetch stock series");
        })?;
        let sentiment = sentiment_result.inspect_err(|e| {
            tracing::error!(symbol = %symbol, error = %e, "Failed to fetch sentiment series");
        })?;

        let by_company = aggregate(&sentiment);
        let coeffs = self.coefficients.load();
        let records = join(&symbol, &stock, &by_company, &coeffs)?;

        tracing::info!(
            symbol = %symbol,
            rows = records.len(),
            sentiment_rows = sentiment.len(),
            "Combined prediction series built"
        );

        if let Some(writer) = &self.snapshot {
            writer.spawn_write(&symbol, records.clone());
        }

        Ok(records)
    }

    /// Raw sentiment history for a company, ascending by date.
    pub async fn sentiment_history(&self, company: &str) -> MarketResult<Vec<SentimentObservation>> {
        self.store.sentiment_series(&company.trim().to_uppercase()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use market_core::{FusionCoefficients, MarketDataError, StockObservation};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct MemoryStore {
        stock: Vec<StockObservation>,
        sentiment: Vec<SentimentObservation>,
        fail_sentiment: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataStore for MemoryStore {
        async fn stock_series(&self, symbol: &str) -> MarketResult<Vec<StockObservation>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.stock.iter().filter(|s| s.symbol == symbol).cloned().collect())
        }

        async fn sentiment_series(&self, company: &str) -> MarketResult<Vec<SentimentObservation>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_sentiment {
                return Err(MarketDataError::Upstream("connection refused".to_string()));
            }
            Ok(self.sentiment.iter().filter(|s| s.company == company).cloned().collect())
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn aapl_store() -> MemoryStore {
        MemoryStore {
            stock: vec![StockObservation {
                date: day(1),
                symbol: "AAPL".to_string(),
                price: 100.0,
                volume: 1000,
                raw_prediction: 101.0,
            }],
            sentiment: vec![SentimentObservation {
                date: day(1),
                company: "AAPL".to_string(),
                sentiment_score: 0.5,
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_with_default_coefficients() {
        let pipeline = PredictionPipeline::new(
            Arc::new(aapl_store()),
            Arc::new(FusionCoefficients::default()),
        );
        let records = pipeline.combined("aapl").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbol, "AAPL");
        assert_eq!(records[0].sentiment, 0.5);
        assert!((records[0].final_prediction - 60.75).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_coefficient_file_matches_explicit_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let from_file = PredictionPipeline::new(
            Arc::new(aapl_store()),
            Arc::new(FileCoefficients::new(dir.path().join("nope.json"))),
        );
        let explicit = PredictionPipeline::new(
            Arc::new(aapl_store()),
            Arc::new(FusionCoefficients::new(0.5, 0.3, 0.2)),
        );
        assert_eq!(
            from_file.combined("AAPL").await.unwrap(),
            explicit.combined("AAPL").await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_not_found() {
        let pipeline = PredictionPipeline::new(
            Arc::new(aapl_store()),
            Arc::new(FusionCoefficients::default()),
        );
        let err = pipeline.combined("MSFT").await.unwrap_err();
        assert_eq!(err, MarketDataError::NotFound("MSFT".to_string()));
    }

    #[tokio::test]
    async fn test_store_failure_aborts_after_both_reads() {
        let store = Arc::new(MemoryStore {
            fail_sentiment: true,
            ..aapl_store()
        });
        let pipeline = PredictionPipeline::new(store.clone(), Arc::new(FusionCoefficients::default()));
        let err = pipeline.combined("AAPL").await.unwrap_err();
        assert!(matches!(err, MarketDataError::Upstream(_)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_snapshot_written_after_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("market_data.json");
        let pipeline = PredictionPipeline::new(
            Arc::new(aapl_store()),
            Arc::new(FusionCoefficients::default()),
        )
        .with_snapshot(SnapshotWriter::new(&path));

        let records = pipeline.combined("AAPL").await.unwrap();

        // The write is detached; poll briefly for it
        let mut snapshot = None;
        for _ in 0..50 {
            if let Ok(s) = read_snapshot(&path).await {
                snapshot = Some(s);
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let snapshot = snapshot.expect("snapshot was never written");
        assert_eq!(snapshot.data, records);
    }
}
