use std::collections::HashMap;

use async_trait::async_trait;

use argus_core::{Candle, CandleInterval, OrderBookSnapshot, Symbol, TickerStats, Trade};

use crate::error::MarketDataResult;

/// Port for market-data access
///
/// This port abstracts the exchange connection, allowing different
/// implementations (simulated, cached, live) behind the same surface.
/// Implementations own their resilience policy (timeouts, pacing).
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// All markets the venue lists, with their rolling 24h stats
    async fn list_tickers(&self) -> MarketDataResult<HashMap<Symbol, TickerStats>>;

    /// Recent candles, oldest first, at most `limit` of them
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: CandleInterval,
        limit: usize,
    ) -> MarketDataResult<Vec<Candle>>;

    /// Recent public trades with aggressor side, oldest first
    async fn fetch_recent_trades(&self, symbol: &str, limit: usize)
    -> MarketDataResult<Vec<Trade>>;

    /// Depth snapshot: bids price-descending, asks price-ascending
    async fn fetch_order_book(
        &self,
        symbol: &str,
        depth: usize,
    ) -> MarketDataResult<OrderBookSnapshot>;
}
