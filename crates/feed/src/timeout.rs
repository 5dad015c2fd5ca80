use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use argus_core::{Candle, CandleInterval, OrderBookSnapshot, Symbol, TickerStats, Trade};
use argus_ports::{MarketDataError, MarketDataResult, MarketDataSource};

/// Decorator that caps every call to the wrapped source.
///
/// A request that outlives the deadline is abandoned and surfaces as
/// [`MarketDataError::Timeout`], which callers treat like any other
/// throttling failure: drop it this cycle, try again next cycle.
pub struct TimeoutFeed<S> {
    inner: S,
    deadline: Duration,
}

impl<S> TimeoutFeed<S> {
    pub fn new(inner: S, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn capped<T>(
        &self,
        fut: impl Future<Output = MarketDataResult<T>> + Send,
    ) -> MarketDataResult<T> {
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(MarketDataError::Timeout(self.deadline.as_millis() as u64)),
        }
    }
}

#[async_trait]
impl<S: MarketDataSource> MarketDataSource for TimeoutFeed<S> {
    async fn list_tickers(&self) -> MarketDataResult<HashMap<Symbol, TickerStats>> {
        self.capped(self.inner.list_tickers()).await
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: CandleInterval,
        limit: usize,
    ) -> MarketDataResult<Vec<Candle>> {
        self.capped(self.inner.fetch_candles(symbol, interval, limit))
            .await
    }

    async fn fetch_recent_trades(
        &self,
        symbol: &str,
        limit: usize,
    ) -> MarketDataResult<Vec<Trade>> {
        self.capped(self.inner.fetch_recent_trades(symbol, limit))
            .await
    }

    async fn fetch_order_book(
        &self,
        symbol: &str,
        depth: usize,
    ) -> MarketDataResult<OrderBookSnapshot> {
        self.capped(self.inner.fetch_order_book(symbol, depth)).await
    }
}
