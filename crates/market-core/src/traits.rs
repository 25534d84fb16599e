use async_trait::async_trait;
use crate::{FusionCoefficients, MarketResult, SentimentObservation, StockObservation};

/// Read side of the market data store.
///
/// Both series are returned ordered by timestamp ascending.
#[async_trait]
pub trait MarketDataStore: Send + Sync {
    async fn stock_series(&self, symbol: &str) -> MarketResult<Vec<StockObservation>>;

    async fn sentiment_series(&self, company: &str) -> MarketResult<Vec<SentimentObservation>>;
}

/// Supplier of fusion weights. Implementations never fail; they fall back to
/// [`FusionCoefficients::default`].
pub trait CoefficientSource: Send + Sync {
    fn load(&self) -> FusionCoefficients;
}

/// A fixed coefficient set, useful when weights are known up front.
impl CoefficientSource for FusionCoefficients {
    fn load(&self) -> FusionCoefficients {
        *self
    }
}
