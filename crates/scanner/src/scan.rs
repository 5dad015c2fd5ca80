use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::{RwLock, Semaphore};

use argus_core::{Candle, CandleInterval, Symbol, VolumeAnomaly};
use argus_indicators::{mean, relative_volume};
use argus_ports::{MarketDataResult, MarketDataSource};

/// Per-request candle cap imposed by the data source
pub const MAX_CANDLES_PER_FETCH: usize = 1000;

/// Scanner tuning. Defaults match the production screen: 1-minute candles
/// over 24h, anomalies at five times average volume, USDT pairs only.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Relative volume at or above this emits an anomaly
    pub rvol_threshold: f64,
    /// Hours of 1-minute history backing the volume baseline
    pub volume_lookback_hours: u32,
    /// Shorter histories are skipped silently
    pub min_candles_required: usize,
    pub quote_currencies: Vec<String>,
    /// Minimum 24h quote turnover for universe membership
    pub min_volume_usd: f64,
    /// Base assets containing any of these are kept out of the universe
    pub excluded_symbol_substrings: Vec<String>,
    /// In-flight bound for `scan_universe`
    pub max_concurrent_symbols: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            rvol_threshold: 5.0,
            volume_lookback_hours: 24,
            min_candles_required: 100,
            quote_currencies: vec!["USDT".to_string()],
            min_volume_usd: 100_000.0,
            excluded_symbol_substrings: [
                "BUSD", "USDC", "DAI", "TUSD", "USDP", "UP", "DOWN", "BEAR", "BULL",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_concurrent_symbols: 50,
        }
    }
}

/// Everything a single scan task needs, detached from the scanner itself
#[derive(Debug, Clone, Copy)]
struct ScanParams {
    history_limit: usize,
    min_candles: usize,
    rvol_threshold: f64,
}

/// Scans a cached symbol universe for volume anomalies.
///
/// The universe is discovered once and replaced only by an explicit
/// re-discovery; cycles always work off an immutable snapshot.
pub struct MarketScanner<S> {
    source: Arc<S>,
    config: ScannerConfig,
    filter: super::UniverseFilter,
    universe: RwLock<Arc<Vec<Symbol>>>,
}

impl<S: MarketDataSource + 'static> MarketScanner<S> {
    pub fn new(source: Arc<S>, config: ScannerConfig) -> Self {
        let filter = super::UniverseFilter::new(
            config.quote_currencies.clone(),
            config.min_volume_usd,
            config.excluded_symbol_substrings.clone(),
        );
        Self {
            source,
            config,
            filter,
            universe: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Pull the ticker list and rebuild the universe snapshot.
    /// The previous snapshot stays visible to in-flight work; readers only
    /// ever see complete universes.
    pub async fn discover_universe(&self) -> MarketDataResult<Arc<Vec<Symbol>>> {
        let tickers = self.source.list_tickers().await?;
        let listed = tickers.len();
        let mut symbols: Vec<Symbol> = tickers
            .iter()
            .filter(|(symbol, stats)| self.filter.accepts(symbol, stats))
            .map(|(symbol, _)| symbol.clone())
            .collect();
        symbols.sort();

        let snapshot = Arc::new(symbols);
        *self.universe.write().await = Arc::clone(&snapshot);
        info!(
            "Universe refreshed: {} tradable symbols ({} listed)",
            snapshot.len(),
            listed
        );
        Ok(snapshot)
    }

    /// Current universe snapshot
    pub async fn universe(&self) -> Arc<Vec<Symbol>> {
        Arc::clone(&*self.universe.read().await)
    }

    /// Recent 1-minute history for one symbol, bounded by the lookback
    /// window and the venue's per-request cap
    pub async fn fetch_history(&self, symbol: &str) -> MarketDataResult<Vec<Candle>> {
        self.source
            .fetch_candles(symbol, CandleInterval::OneMinute, self.history_limit())
            .await
    }

    /// Scan one symbol. A history shorter than the configured minimum is
    /// an absence, not an error.
    pub async fn scan(&self, symbol: &str) -> MarketDataResult<Option<VolumeAnomaly>> {
        Self::scan_with(Arc::clone(&self.source), self.params(), symbol.to_string()).await
    }

    /// Scan the whole universe under the concurrency bound. Individual
    /// failures are logged and dropped; the next cycle retries them by
    /// rescanning. Results come back ordered by relative volume descending.
    pub async fn scan_universe(&self) -> Vec<VolumeAnomaly> {
        let universe = self.universe().await;
        if universe.is_empty() {
            warn!("Scan requested with an empty universe; discover it first");
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_symbols.max(1)));
        let mut handles = Vec::with_capacity(universe.len());
        for symbol in universe.iter().cloned() {
            let semaphore = Arc::clone(&semaphore);
            let source = Arc::clone(&self.source);
            let params = self.params();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let outcome = Self::scan_with(source, params, symbol.clone()).await;
                (symbol, outcome)
            }));
        }

        let mut anomalies = Vec::new();
        for handle in handles {
            match handle.await {
                Ok((_, Ok(Some(anomaly)))) => anomalies.push(anomaly),
                Ok((_, Ok(None))) => {}
                Ok((symbol, Err(e))) => debug!("Scan failed for {}: {}", symbol, e),
                Err(e) => warn!("Scan task panicked: {}", e),
            }
        }

        anomalies.sort_by(|a, b| b.rvol.total_cmp(&a.rvol));
        anomalies
    }

    fn history_limit(&self) -> usize {
        (self.config.volume_lookback_hours as usize * 60).min(MAX_CANDLES_PER_FETCH)
    }

    fn params(&self) -> ScanParams {
        ScanParams {
            history_limit: self.history_limit(),
            min_candles: self.config.min_candles_required,
            rvol_threshold: self.config.rvol_threshold,
        }
    }

    async fn scan_with(
        source: Arc<S>,
        params: ScanParams,
        symbol: Symbol,
    ) -> MarketDataResult<Option<VolumeAnomaly>> {
        let candles = source
            .fetch_candles(&symbol, CandleInterval::OneMinute, params.history_limit)
            .await?;
        if candles.len() < params.min_candles {
            debug!(
                "Skipping {}: only {} candles (need {})",
                symbol,
                candles.len(),
                params.min_candles
            );
            return Ok(None);
        }

        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
        let rvol = relative_volume(&volumes);
        if rvol < params.rvol_threshold {
            return Ok(None);
        }
        let Some(last) = candles.last() else {
            return Ok(None);
        };

        let anomaly = VolumeAnomaly {
            symbol,
            rvol,
            price: last.close,
            current_volume: last.volume,
            average_volume: mean(&volumes[..volumes.len() - 1]),
            observed_at: Utc::now(),
        };
        info!(
            "Volume anomaly: {} rvol={:.2} price={} volume={:.1} (avg {:.1})",
            anomaly.symbol, anomaly.rvol, anomaly.price, anomaly.current_volume,
            anomaly.average_volume
        );
        Ok(Some(anomaly))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use argus_core::{OrderBookSnapshot, TickerStats, Trade};
    use argus_ports::MarketDataError;

    use super::*;

    struct StubSource {
        tickers: HashMap<Symbol, TickerStats>,
        candles: HashMap<String, Vec<Candle>>,
        failing: Vec<String>,
        seen_limits: Arc<Mutex<Vec<usize>>>,
    }

    impl StubSource {
        fn new() -> Self {
            Self {
                tickers: HashMap::new(),
                candles: HashMap::new(),
                failing: Vec::new(),
                seen_limits: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn with_series(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
            self.tickers
                .insert(symbol.to_string(), TickerStats::new(1_000_000.0));
            self.candles.insert(symbol.to_string(), candles);
            self
        }
    }

    #[async_trait]
    impl MarketDataSource for StubSource {
        async fn list_tickers(&self) -> MarketDataResult<HashMap<Symbol, TickerStats>> {
            Ok(self.tickers.clone())
        }

        async fn fetch_candles(
            &self,
            symbol: &str,
            _interval: CandleInterval,
            limit: usize,
        ) -> MarketDataResult<Vec<Candle>> {
            self.seen_limits.lock().unwrap().push(limit);
            if self.failing.iter().any(|s| s == symbol) {
                return Err(MarketDataError::Transport("stub outage".to_string()));
            }
            let series = self.candles.get(symbol).cloned().unwrap_or_default();
            let start = series.len().saturating_sub(limit);
            Ok(series[start..].to_vec())
        }

        async fn fetch_recent_trades(
            &self,
            _symbol: &str,
            _limit: usize,
        ) -> MarketDataResult<Vec<Trade>> {
            Ok(Vec::new())
        }

        async fn fetch_order_book(
            &self,
            symbol: &str,
            _depth: usize,
        ) -> MarketDataResult<OrderBookSnapshot> {
            Err(MarketDataError::UnknownSymbol(symbol.to_string()))
        }
    }

    fn flat_candles(count: usize, volume: f64, spike: Option<f64>) -> Vec<Candle> {
        let start = Utc::now() - Duration::minutes(count as i64);
        let mut out: Vec<Candle> = (0..count)
            .map(|i| {
                Candle::new(
                    start + Duration::minutes(i as i64),
                    100.0,
                    101.0,
                    99.0,
                    100.0,
                    volume,
                )
            })
            .collect();
        if let (Some(factor), Some(last)) = (spike, out.last_mut()) {
            last.volume = volume * factor;
        }
        out
    }

    fn scanner(source: StubSource) -> MarketScanner<StubSource> {
        MarketScanner::new(Arc::new(source), ScannerConfig::default())
    }

    #[tokio::test]
    async fn test_scan_emits_anomaly_on_six_fold_spike() {
        let source = StubSource::new().with_series("BTC/USDT", flat_candles(200, 10.0, Some(6.0)));
        let anomaly = scanner(source).scan("BTC/USDT").await.unwrap().unwrap();

        assert!((anomaly.rvol - 6.0).abs() < 1e-9);
        assert_eq!(anomaly.price, 100.0);
        assert_eq!(anomaly.current_volume, 60.0);
        assert!((anomaly.average_volume - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_scan_short_history_is_absence_not_error() {
        let source = StubSource::new().with_series("BTC/USDT", flat_candles(50, 10.0, Some(20.0)));
        let result = scanner(source).scan("BTC/USDT").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_scan_zero_baseline_never_ranks() {
        let source = StubSource::new().with_series("BTC/USDT", flat_candles(200, 0.0, None));
        let result = scanner(source).scan("BTC/USDT").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_scan_below_threshold_stays_quiet() {
        let source = StubSource::new().with_series("BTC/USDT", flat_candles(200, 10.0, Some(3.0)));
        let result = scanner(source).scan("BTC/USDT").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_history_request_is_capped_at_the_venue_maximum() {
        // The default 24h lookback asks for 1440 one-minute candles
        let source = StubSource::new().with_series("BTC/USDT", flat_candles(200, 10.0, None));
        let seen = Arc::clone(&source.seen_limits);

        scanner(source).fetch_history("BTC/USDT").await.unwrap();
        assert_eq!(seen.lock().unwrap().as_slice(), [MAX_CANDLES_PER_FETCH]);
    }

    #[tokio::test]
    async fn test_scan_requests_only_the_configured_lookback() {
        let source = StubSource::new().with_series("BTC/USDT", flat_candles(200, 10.0, None));
        let seen = Arc::clone(&source.seen_limits);
        let config = ScannerConfig {
            volume_lookback_hours: 4,
            ..ScannerConfig::default()
        };
        let scanner = MarketScanner::new(Arc::new(source), config);

        let result = scanner.scan("BTC/USDT").await.unwrap();
        assert!(result.is_none());
        assert_eq!(seen.lock().unwrap().as_slice(), [240]);
    }

    #[tokio::test]
    async fn test_discover_universe_applies_filter() {
        let mut source = StubSource::new()
            .with_series("BTC/USDT", flat_candles(200, 10.0, None))
            .with_series("USDC/USDT", flat_candles(200, 10.0, None));
        source
            .tickers
            .insert("LOW/USDT".to_string(), TickerStats::new(10.0));
        source
            .tickers
            .insert("ETH/BTC".to_string(), TickerStats::new(1_000_000.0));

        let scanner = scanner(source);
        let universe = scanner.discover_universe().await.unwrap();
        assert_eq!(universe.as_slice(), ["BTC/USDT".to_string()]);
        assert_eq!(scanner.universe().await.len(), 1);
    }

    #[tokio::test]
    async fn test_scan_universe_sorts_and_drops_failures() {
        let mut source = StubSource::new()
            .with_series("AAA/USDT", flat_candles(200, 10.0, Some(6.0)))
            .with_series("BBB/USDT", flat_candles(200, 10.0, Some(8.0)))
            .with_series("CCC/USDT", flat_candles(200, 10.0, None))
            .with_series("DDD/USDT", flat_candles(200, 10.0, Some(9.0)));
        source.failing.push("DDD/USDT".to_string());

        let scanner = scanner(source);
        scanner.discover_universe().await.unwrap();
        let anomalies = scanner.scan_universe().await;

        let symbols: Vec<&str> = anomalies.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, ["BBB/USDT", "AAA/USDT"]);
        assert!(anomalies[0].rvol > anomalies[1].rvol);
    }

    #[tokio::test]
    async fn test_scan_universe_without_discovery_is_empty() {
        let source = StubSource::new().with_series("BTC/USDT", flat_candles(200, 10.0, Some(6.0)));
        assert!(scanner(source).scan_universe().await.is_empty());
    }
}
