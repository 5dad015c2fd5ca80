use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use argus_core::{
    BookLevel, Candle, CandleInterval, OrderBookSnapshot, Side, Symbol, TickerStats, Trade,
};
use argus_ports::{MarketDataError, MarketDataResult, MarketDataSource};

/// Candles at the end of a spiked series that trend down instead of walking
const SPIKE_TAIL: usize = 30;

/// Listings that exist on the simulated venue but fail the universe
/// filter: a stable pair, a non-USDT quote, and an illiquid market
const CHAFF_LISTINGS: [(&str, f64); 3] = [
    ("USDC/USDT", 3_000_000.0),
    ("OLD/BTC", 2_000_000.0),
    ("THIN/USDT", 1_000.0),
];

/// Configuration for the simulated venue
#[derive(Debug, Clone)]
pub struct SimFeedConfig {
    /// Seed behind every generated series
    pub seed: u64,
    /// Markets the venue serves data for
    pub symbols: Vec<String>,
    /// Candles generated per symbol before the fetch limit applies
    pub candle_count: usize,
    /// Typical per-candle base volume
    pub base_volume: f64,
    /// 24h quote turnover reported for every listed symbol
    pub quote_volume: f64,
    /// Last-candle volume multiple applied to spiked symbols
    pub spike_factor: f64,
    /// Symbols staged as accumulation stories: a volume spike, a falling
    /// tape with climbing delta, and one oversized resting bid
    pub spiked_symbols: Vec<String>,
    /// Trades generated per symbol before the fetch limit applies
    pub trade_count: usize,
    /// Depth levels generated per side
    pub book_levels: usize,
    /// Symbols whose fetches fail with a transport error
    pub failing_symbols: Vec<String>,
}

impl Default for SimFeedConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            symbols: ["BTC/USDT", "ETH/USDT", "SOL/USDT", "XRP/USDT", "DOGE/USDT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            candle_count: 240,
            base_volume: 1_000.0,
            quote_volume: 5_000_000.0,
            spike_factor: 6.0,
            spiked_symbols: vec!["BTC/USDT".to_string()],
            trade_count: 400,
            book_levels: 50,
            failing_symbols: Vec::new(),
        }
    }
}

/// Deterministic synthetic venue.
///
/// Unlike a push simulator this is a pull source behind `&self`, so state
/// cannot live in a mutable rng. Every call derives a fresh generator
/// from the seed, the symbol, and the stream name, which makes each
/// series stable across calls within a run: fetching twice returns the
/// same data.
pub struct SimFeed {
    config: SimFeedConfig,
}

impl SimFeed {
    pub fn new(config: SimFeedConfig) -> Self {
        Self { config }
    }

    fn rng_for(&self, symbol: &str, stream: &str) -> StdRng {
        let mut hasher = DefaultHasher::new();
        symbol.hash(&mut hasher);
        stream.hash(&mut hasher);
        StdRng::seed_from_u64(self.config.seed ^ hasher.finish())
    }

    /// Stable per-symbol price anchor in [10, 100)
    fn base_price(&self, symbol: &str) -> f64 {
        let mut hasher = DefaultHasher::new();
        symbol.hash(&mut hasher);
        10.0 + (hasher.finish() % 9_000) as f64 / 100.0
    }

    fn is_spiked(&self, symbol: &str) -> bool {
        self.config.spiked_symbols.iter().any(|s| s == symbol)
    }

    fn check_symbol(&self, symbol: &str) -> MarketDataResult<()> {
        if self.config.failing_symbols.iter().any(|s| s == symbol) {
            return Err(MarketDataError::Transport(format!(
                "simulated outage for {}",
                symbol
            )));
        }
        if !self.config.symbols.iter().any(|s| s == symbol) {
            return Err(MarketDataError::UnknownSymbol(symbol.to_string()));
        }
        Ok(())
    }
}

impl Default for SimFeed {
    fn default() -> Self {
        Self::new(SimFeedConfig::default())
    }
}

#[async_trait]
impl MarketDataSource for SimFeed {
    async fn list_tickers(&self) -> MarketDataResult<HashMap<Symbol, TickerStats>> {
        let mut tickers: HashMap<Symbol, TickerStats> = self
            .config
            .symbols
            .iter()
            .map(|s| (s.clone(), TickerStats::new(self.config.quote_volume)))
            .collect();
        for (symbol, quote_volume) in CHAFF_LISTINGS {
            tickers.insert(symbol.to_string(), TickerStats::new(quote_volume));
        }
        Ok(tickers)
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: CandleInterval,
        limit: usize,
    ) -> MarketDataResult<Vec<Candle>> {
        self.check_symbol(symbol)?;
        let count = self.config.candle_count;
        let spiked = self.is_spiked(symbol);
        let mut rng = self.rng_for(symbol, "candles");
        let end = Utc::now();

        let mut price = self.base_price(symbol);
        let mut candles = Vec::with_capacity(count);
        for i in 0..count {
            let drift = rng.gen_range(-0.003..0.003);
            // Spiked series grind down into the spike instead of walking
            let step = if spiked && i + SPIKE_TAIL >= count {
                -0.0012
            } else {
                drift
            };
            let open = price;
            price *= 1.0 + step;
            let close = price;
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.001));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.001));
            let volume = self.config.base_volume * rng.gen_range(0.8..1.2);
            let open_time = end - interval.duration() * ((count - i) as i32);
            candles.push(Candle::new(open_time, open, high, low, close, volume));
        }
        if spiked {
            if let Some(last) = candles.last_mut() {
                last.volume = self.config.base_volume * self.config.spike_factor;
            }
        }

        let start = candles.len().saturating_sub(limit);
        Ok(candles[start..].to_vec())
    }

    async fn fetch_recent_trades(
        &self,
        symbol: &str,
        limit: usize,
    ) -> MarketDataResult<Vec<Trade>> {
        self.check_symbol(symbol)?;
        let count = self.config.trade_count.min(limit.max(1));
        let spiked = self.is_spiked(symbol);
        let mut rng = self.rng_for(symbol, "trades");
        let end = Utc::now();
        let anchor = self.base_price(symbol);

        let trades = (0..count)
            .map(|i| {
                let time = end - chrono::Duration::milliseconds((300 * (count - i)) as i64);
                let (price, size, side) = if spiked {
                    // Falling tape with four buys for every sell, so the
                    // delta climbs while price drops
                    let price = anchor * (1.0 - 0.00005 * i as f64);
                    let side = if i % 4 == 3 { Side::Sell } else { Side::Buy };
                    let size = match side {
                        Side::Buy => rng.gen_range(1.5..2.5),
                        Side::Sell => rng.gen_range(0.3..0.7),
                    };
                    (price, size, side)
                } else {
                    let price = anchor * (1.0 + rng.gen_range(-0.001..0.001));
                    let side = if rng.gen_bool(0.5) {
                        Side::Buy
                    } else {
                        Side::Sell
                    };
                    (price, rng.gen_range(0.2..1.2), side)
                };
                Trade::new(time, price, size, side)
            })
            .collect();
        Ok(trades)
    }

    async fn fetch_order_book(
        &self,
        symbol: &str,
        depth: usize,
    ) -> MarketDataResult<OrderBookSnapshot> {
        self.check_symbol(symbol)?;
        let levels = self.config.book_levels.min(depth.max(1));
        let mut rng = self.rng_for(symbol, "book");
        let mid = self.base_price(symbol);

        let mut bids = Vec::with_capacity(levels);
        let mut asks = Vec::with_capacity(levels);
        for i in 0..levels {
            let offset = 0.0005 * (i + 1) as f64;
            bids.push(BookLevel::new(
                mid * (1.0 - offset),
                rng.gen_range(0.5..1.5),
            ));
            asks.push(BookLevel::new(
                mid * (1.0 + offset),
                rng.gen_range(0.5..1.5),
            ));
        }
        // One resting bid far above everything else on staged symbols
        if self.is_spiked(symbol) && bids.len() > 2 {
            bids[2].size = 8.0;
        }
        Ok(OrderBookSnapshot::new(symbol, bids, asks))
    }
}
