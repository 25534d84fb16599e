use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The store holds no stock rows for the requested symbol.
    #[error("No data found for symbol {0}")]
    NotFound(String),

    /// The data store read failed (connectivity, timeout, malformed rows).
    #[error("Upstream store error: {0}")]
    Upstream(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MarketDataError {
    pub fn upstream(context: &str, err: impl std::fmt::Display) -> Self {
        MarketDataError::Upstream(format!("{}: {}", context, err))
    }
}

pub type MarketResult<T> = Result<T, MarketDataError>;
