use thiserror::Error;

/// Errors surfaced by market-data sources.
///
/// Throttling (rate limits, timeouts) is distinguished from bad requests so
/// callers can decide what is worth retrying on a later cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    #[error("Rate limited by data source: {0}")]
    RateLimited(String),

    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}

impl MarketDataError {
    /// True for failures caused by load rather than by the request itself
    pub fn is_throttling(&self) -> bool {
        matches!(
            self,
            MarketDataError::RateLimited(_) | MarketDataError::Timeout(_)
        )
    }
}

pub type MarketDataResult<T> = std::result::Result<T, MarketDataError>;

/// Errors surfaced by signal persistence backends
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
