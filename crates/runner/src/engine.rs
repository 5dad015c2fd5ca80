use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::{Semaphore, watch};
use tokio::time::{MissedTickBehavior, interval, timeout};

use argus_book::{ImbalanceAnalyzer, ImbalanceConfig};
use argus_core::{OrderFlowAnalysis, Price, Signal, Symbol, VolumeAnomaly};
use argus_flow::{FlowConfig, OrderFlowAnalyzer};
use argus_ports::{MarketDataError, MarketDataSource, SignalPublisher, SignalRepository};
use argus_scanner::{MarketScanner, ScannerConfig};
use argus_scorer::{ScorerConfig, SignalScorer};

/// Anomalies that get the expensive per-symbol analysis each cycle
pub const TOP_CANDIDATES_PER_CYCLE: usize = 10;

/// Universe prefix screened in report mode
const SQUEEZE_SCREEN_SYMBOLS: usize = 50;

/// Entries kept in the squeeze report
const SQUEEZE_REPORT_SIZE: usize = 10;

/// Signals echoed after a single-shot scan
const TOP_SIGNALS_REPORTED: usize = 5;

/// How the engine is driven from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One cycle, then a summary of the best signals
    Single,
    /// A cycle on every interval tick until stopped
    Continuous,
    /// Volatility-squeeze screen over the universe
    Report,
}

impl RunMode {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "single" => Some(RunMode::Single),
            "continuous" => Some(RunMode::Continuous),
            "report" => Some(RunMode::Report),
            _ => None,
        }
    }
}

/// Errors that stop the engine before any scanning starts
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Universe discovery failed: {0}")]
    Discovery(#[from] MarketDataError),
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub scanner: ScannerConfig,
    pub flow: FlowConfig,
    pub book: ImbalanceConfig,
    pub scorer: ScorerConfig,
    /// Gap between cycle starts in continuous mode, and the per-cycle deadline
    pub scan_interval: Duration,
    /// In-flight bound for the deep-analysis pass
    pub max_concurrent_symbols: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scanner: ScannerConfig::default(),
            flow: FlowConfig::default(),
            book: ImbalanceConfig::default(),
            scorer: ScorerConfig::default(),
            scan_interval: Duration::from_secs(60),
            max_concurrent_symbols: 50,
        }
    }
}

/// One row of the report-mode output
#[derive(Debug, Clone, PartialEq)]
pub struct SqueezeCandidate {
    pub symbol: Symbol,
    pub price: Price,
    pub buy_sell_ratio: f64,
}

/// Drives the whole scan pipeline against one market-data source.
///
/// A cycle is: volume pass over the universe, deep analysis of the top
/// candidates under a concurrency bound, scoring, persistence, and one
/// publish of the score-ordered batch. Any failure inside a cycle costs
/// at most its own symbol; only a failed universe discovery at startup
/// is fatal.
pub struct ScanEngine<S> {
    scanner: Arc<MarketScanner<S>>,
    flow: Arc<OrderFlowAnalyzer<S>>,
    book: Arc<ImbalanceAnalyzer<S>>,
    scorer: Arc<SignalScorer>,
    store: Arc<dyn SignalRepository>,
    publisher: Arc<dyn SignalPublisher>,
    config: EngineConfig,
}

impl<S: MarketDataSource + 'static> ScanEngine<S> {
    pub fn new(
        source: Arc<S>,
        config: EngineConfig,
        store: Arc<dyn SignalRepository>,
        publisher: Arc<dyn SignalPublisher>,
    ) -> Self {
        let scanner = Arc::new(MarketScanner::new(
            Arc::clone(&source),
            config.scanner.clone(),
        ));
        let flow = Arc::new(OrderFlowAnalyzer::new(
            Arc::clone(&source),
            config.flow.clone(),
        ));
        let book = Arc::new(ImbalanceAnalyzer::new(source, config.book.clone()));
        let scorer = Arc::new(SignalScorer::new(config.scorer.clone()));

        Self {
            scanner,
            flow,
            book,
            scorer,
            store,
            publisher,
            config,
        }
    }

    /// Discover the scan universe. A scanner without a universe has
    /// nothing to do, so failure here is fatal to startup.
    pub async fn initialize(&self) -> Result<usize, EngineError> {
        let universe = self.scanner.discover_universe().await?;
        Ok(universe.len())
    }

    /// One full scan cycle. Returns the signals in score order; the same
    /// batch has already been persisted and published.
    pub async fn run_cycle(&self) -> Vec<Signal> {
        let cycle_start = Instant::now();

        let anomalies = self.scanner.scan_universe().await;
        if anomalies.len() > TOP_CANDIDATES_PER_CYCLE {
            debug!(
                "{} anomalies, deep-analyzing the top {}",
                anomalies.len(),
                TOP_CANDIDATES_PER_CYCLE
            );
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_symbols.max(1)));
        let mut handles = Vec::with_capacity(anomalies.len().min(TOP_CANDIDATES_PER_CYCLE));
        for anomaly in anomalies.into_iter().take(TOP_CANDIDATES_PER_CYCLE) {
            let semaphore = Arc::clone(&semaphore);
            let scanner = Arc::clone(&self.scanner);
            let flow = Arc::clone(&self.flow);
            let book = Arc::clone(&self.book);
            let scorer = Arc::clone(&self.scorer);
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                Self::analyze_candidate(scanner, flow, book, scorer, anomaly).await
            }));
        }

        let mut signals = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(signal) => signals.push(signal),
                Err(e) => warn!("Candidate analysis task panicked: {}", e),
            }
        }
        signals.sort_by(|a, b| b.score.cmp(&a.score));

        for signal in &signals {
            if let Err(e) = self.store.save(signal).await {
                warn!("Failed to store signal for {}: {}", signal.symbol, e);
            }
        }
        self.publisher.publish(&signals).await;

        match signals.first() {
            Some(best) => info!(
                "Cycle done in {:?}: {} signals (best {} at {}/100)",
                cycle_start.elapsed(),
                signals.len(),
                best.symbol,
                best.score
            ),
            None => info!(
                "Cycle done in {:?}: no volume anomalies above threshold",
                cycle_start.elapsed()
            ),
        }
        signals
    }

    /// Everything one candidate gets after the volume pass. Each reading
    /// that fails is dropped on its own; the signal is built from
    /// whatever survived.
    async fn analyze_candidate(
        scanner: Arc<MarketScanner<S>>,
        flow: Arc<OrderFlowAnalyzer<S>>,
        book: Arc<ImbalanceAnalyzer<S>>,
        scorer: Arc<SignalScorer>,
        anomaly: VolumeAnomaly,
    ) -> Signal {
        let symbol = anomaly.symbol.clone();

        let analysis = flow.analyze(&symbol).await;
        if let OrderFlowAnalysis::Failed { reason, .. } = &analysis {
            warn!("Flow analysis failed for {}: {}", symbol, reason);
        }

        let imbalance = match book.analyze(&symbol).await {
            Ok(report) => report,
            Err(e) => {
                warn!("Imbalance unavailable for {}: {}", symbol, e);
                None
            }
        };

        let closes: Vec<f64> = match scanner.fetch_history(&symbol).await {
            Ok(candles) => candles.iter().map(|c| c.close).collect(),
            Err(e) => {
                debug!("History refetch failed for {}: {}", symbol, e);
                Vec::new()
            }
        };

        scorer.build_signal(
            &symbol,
            Some(&anomaly),
            analysis.report(),
            &closes,
            imbalance,
            Utc::now(),
        )
    }

    /// One cycle plus a readable summary of the best signals
    pub async fn run_single(&self) -> Vec<Signal> {
        let signals = self.run_cycle().await;
        if signals.is_empty() {
            info!("Scan produced no signals");
        } else {
            info!("Top signals of this scan:");
            for (rank, signal) in signals.iter().take(TOP_SIGNALS_REPORTED).enumerate() {
                info!(
                    "  {}. {} score {}/100 ({:?}) - {}",
                    rank + 1,
                    signal.symbol,
                    signal.score,
                    signal.tier,
                    signal.recommended_action
                );
            }
        }
        signals
    }

    /// Cycle on every tick until `stop` flips to true or its sender is
    /// dropped. A cycle that outlives the interval is abandoned so the
    /// next tick starts fresh.
    pub async fn run_continuous(&self, mut stop: watch::Receiver<bool>) {
        info!(
            "Continuous scan every {:?}, cycle deadline equal to the interval",
            self.config.scan_interval
        );
        let mut ticker = interval(self.config.scan_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = stop.wait_for(|stopped| *stopped) => {
                    info!("Stop requested between cycles");
                    break;
                }
            }

            tokio::select! {
                outcome = timeout(self.config.scan_interval, self.run_cycle()) => {
                    if outcome.is_err() {
                        warn!(
                            "Cycle exceeded its {:?} deadline and was abandoned",
                            self.config.scan_interval
                        );
                    }
                }
                _ = stop.wait_for(|stopped| *stopped) => {
                    info!("Stop requested, abandoning the in-flight cycle");
                    break;
                }
            }
        }
        info!("Continuous scan stopped");
    }

    /// Report mode: screen the universe for symbols coiled in a
    /// volatility squeeze, then rank the squeezed ones by how one-sided
    /// their recent tape is.
    pub async fn squeeze_report(&self) -> Vec<SqueezeCandidate> {
        let universe = self.scanner.universe().await;
        let screened: Vec<Symbol> = universe
            .iter()
            .take(SQUEEZE_SCREEN_SYMBOLS)
            .cloned()
            .collect();
        info!(
            "Screening {} symbols for volatility squeezes",
            screened.len()
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_symbols.max(1)));
        let mut handles = Vec::with_capacity(screened.len());
        for symbol in screened {
            let semaphore = Arc::clone(&semaphore);
            let scanner = Arc::clone(&self.scanner);
            let flow = Arc::clone(&self.flow);
            let scorer = Arc::clone(&self.scorer);
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                Self::screen_for_squeeze(scanner, flow, scorer, symbol).await
            }));
        }

        let mut candidates = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(Some(candidate)) => candidates.push(candidate),
                Ok(None) => {}
                Err(e) => warn!("Squeeze screen task panicked: {}", e),
            }
        }
        candidates.sort_by(|a, b| b.buy_sell_ratio.total_cmp(&a.buy_sell_ratio));
        candidates.truncate(SQUEEZE_REPORT_SIZE);

        if candidates.is_empty() {
            info!("No symbols in a squeeze right now");
        } else {
            info!("Squeeze candidates, most buyer-dominated first:");
            for candidate in &candidates {
                info!(
                    "  {} at {:.4} (buy/sell {:.2})",
                    candidate.symbol, candidate.price, candidate.buy_sell_ratio
                );
            }
        }
        candidates
    }

    async fn screen_for_squeeze(
        scanner: Arc<MarketScanner<S>>,
        flow: Arc<OrderFlowAnalyzer<S>>,
        scorer: Arc<SignalScorer>,
        symbol: Symbol,
    ) -> Option<SqueezeCandidate> {
        let candles = match scanner.fetch_history(&symbol).await {
            Ok(candles) => candles,
            Err(e) => {
                debug!("Squeeze screen skipped {}: {}", symbol, e);
                return None;
            }
        };
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        if !scorer.detects_squeeze(&closes) {
            return None;
        }

        // The symbol stays in the report even when the tape read fails;
        // a zero ratio just ranks it last
        let ratio = flow
            .analyze(&symbol)
            .await
            .report()
            .map(|report| report.buy_sell_ratio)
            .unwrap_or(0.0);
        let price = closes.last().copied().unwrap_or(0.0);

        Some(SqueezeCandidate {
            symbol,
            price,
            buy_sell_ratio: ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};

    use argus_core::{
        BookLevel, Candle, CandleInterval, OrderBookSnapshot, Side, SignalTier, TickerStats, Trade,
    };
    use argus_ports::MarketDataResult;

    use crate::publisher::BroadcastSignalPublisher;
    use crate::store::InMemorySignalStore;

    use super::*;

    #[derive(Default)]
    struct StubSource {
        tickers: HashMap<Symbol, TickerStats>,
        candles: HashMap<String, Vec<Candle>>,
        trades: HashMap<String, Vec<Trade>>,
        books: HashMap<String, OrderBookSnapshot>,
        flow_outage: Vec<String>,
        tickers_fail: bool,
    }

    impl StubSource {
        fn with_market(
            mut self,
            symbol: &str,
            candles: Vec<Candle>,
            trades: Vec<Trade>,
            book: Option<OrderBookSnapshot>,
        ) -> Self {
            self.tickers
                .insert(symbol.to_string(), TickerStats::new(1_000_000.0));
            self.candles.insert(symbol.to_string(), candles);
            self.trades.insert(symbol.to_string(), trades);
            if let Some(book) = book {
                self.books.insert(symbol.to_string(), book);
            }
            self
        }
    }

    #[async_trait]
    impl MarketDataSource for StubSource {
        async fn list_tickers(&self) -> MarketDataResult<HashMap<Symbol, TickerStats>> {
            if self.tickers_fail {
                return Err(MarketDataError::Transport("ticker outage".to_string()));
            }
            Ok(self.tickers.clone())
        }

        async fn fetch_candles(
            &self,
            symbol: &str,
            _interval: CandleInterval,
            limit: usize,
        ) -> MarketDataResult<Vec<Candle>> {
            let series = self.candles.get(symbol).cloned().unwrap_or_default();
            let start = series.len().saturating_sub(limit);
            Ok(series[start..].to_vec())
        }

        async fn fetch_recent_trades(
            &self,
            symbol: &str,
            limit: usize,
        ) -> MarketDataResult<Vec<Trade>> {
            if self.flow_outage.iter().any(|s| s == symbol) {
                return Err(MarketDataError::RateLimited("stub".to_string()));
            }
            Ok(self
                .trades
                .get(symbol)
                .map(|t| t.iter().take(limit).cloned().collect())
                .unwrap_or_default())
        }

        async fn fetch_order_book(
            &self,
            symbol: &str,
            _depth: usize,
        ) -> MarketDataResult<OrderBookSnapshot> {
            if self.flow_outage.iter().any(|s| s == symbol) {
                return Err(MarketDataError::RateLimited("stub".to_string()));
            }
            self.books
                .get(symbol)
                .cloned()
                .ok_or_else(|| MarketDataError::UnknownSymbol(symbol.to_string()))
        }
    }

    fn engine(
        stub: StubSource,
    ) -> (
        ScanEngine<StubSource>,
        Arc<InMemorySignalStore>,
        Arc<BroadcastSignalPublisher>,
    ) {
        let store = Arc::new(InMemorySignalStore::new());
        let publisher = Arc::new(BroadcastSignalPublisher::default());
        let engine = ScanEngine::new(
            Arc::new(stub),
            EngineConfig::default(),
            Arc::clone(&store) as Arc<dyn SignalRepository>,
            Arc::clone(&publisher) as Arc<dyn SignalPublisher>,
        );
        (engine, store, publisher)
    }

    /// Flat price, constant volume, optionally a last-candle volume spike
    fn flat_candles(count: usize, volume: f64, spike: Option<f64>) -> Vec<Candle> {
        let start = Utc::now() - ChronoDuration::minutes(count as i64);
        let mut out: Vec<Candle> = (0..count)
            .map(|i| {
                Candle::new(
                    start + ChronoDuration::minutes(i as i64),
                    100.0,
                    100.0,
                    100.0,
                    100.0,
                    volume,
                )
            })
            .collect();
        if let Some(factor) = spike {
            if let Some(last) = out.last_mut() {
                last.volume = volume * factor;
            }
        }
        out
    }

    /// Closes whipping between 90 and 110; never a squeeze
    fn volatile_candles(count: usize, volume: f64) -> Vec<Candle> {
        let start = Utc::now() - ChronoDuration::minutes(count as i64);
        (0..count)
            .map(|i| {
                let close = if i % 2 == 0 { 90.0 } else { 110.0 };
                Candle::new(
                    start + ChronoDuration::minutes(i as i64),
                    100.0,
                    110.0,
                    90.0,
                    close,
                    volume,
                )
            })
            .collect()
    }

    /// Falling prices with buyers dominating four to one by volume
    fn accumulation_tape(count: usize) -> Vec<Trade> {
        let start = Utc::now() - ChronoDuration::seconds(count as i64);
        (0..count)
            .map(|i| {
                let side = if i % 5 == 4 { Side::Sell } else { Side::Buy };
                let size = if side == Side::Buy { 2.0 } else { 1.0 };
                Trade::new(
                    start + ChronoDuration::seconds(i as i64),
                    100.0 - i as f64 * 0.05,
                    size,
                    side,
                )
            })
            .collect()
    }

    /// Flat price, buys and sells perfectly matched
    fn balanced_tape(count: usize) -> Vec<Trade> {
        let start = Utc::now() - ChronoDuration::seconds(count as i64);
        (0..count)
            .map(|i| {
                let side = if i % 2 == 0 { Side::Buy } else { Side::Sell };
                Trade::new(start + ChronoDuration::seconds(i as i64), 100.0, 1.0, side)
            })
            .collect()
    }

    fn quiet_book(symbol: &str) -> OrderBookSnapshot {
        let bids = (0..20)
            .map(|i| BookLevel::new(99.9 - i as f64 * 0.01, 10.0))
            .collect();
        let asks = (0..20)
            .map(|i| BookLevel::new(100.1 + i as f64 * 0.01, 10.0))
            .collect();
        OrderBookSnapshot::new(symbol, bids, asks)
    }

    /// Quiet book with one resting bid ten times the rest
    fn outlier_bid_book(symbol: &str) -> OrderBookSnapshot {
        let mut book = quiet_book(symbol);
        book.bids[2].size = 100.0;
        book
    }

    #[tokio::test]
    async fn test_initialize_counts_the_filtered_universe() {
        let mut stub = StubSource::default().with_market(
            "AAA/USDT",
            flat_candles(200, 10.0, None),
            Vec::new(),
            None,
        );
        // Wrong quote currency, filtered out of the universe
        stub.tickers
            .insert("ETH/BTC".to_string(), TickerStats::new(1_000_000.0));

        let (engine, _, _) = engine(stub);
        assert_eq!(engine.initialize().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_initialize_failure_is_fatal() {
        let stub = StubSource {
            tickers_fail: true,
            ..StubSource::default()
        };
        let (engine, _, _) = engine(stub);

        let err = engine.initialize().await.unwrap_err();
        assert!(matches!(err, EngineError::Discovery(_)));
    }

    #[tokio::test]
    async fn test_cycle_orders_saves_and_publishes_the_batch() {
        // AAA: huge spike, accumulation tape, iceberg, flat closes.
        // 30 + 40 + 5 + 10 + 20 caps at 100.
        // BBB: moderate spike and flat closes only: 20 + 20 = 40.
        let stub = StubSource::default()
            .with_market(
                "AAA/USDT",
                flat_candles(200, 10.0, Some(12.0)),
                accumulation_tape(100),
                Some(outlier_bid_book("AAA/USDT")),
            )
            .with_market(
                "BBB/USDT",
                flat_candles(200, 10.0, Some(6.0)),
                balanced_tape(100),
                Some(quiet_book("BBB/USDT")),
            );
        let (engine, store, publisher) = engine(stub);
        engine.initialize().await.unwrap();
        let mut rx = publisher.subscribe();

        let signals = engine.run_cycle().await;

        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].symbol, "AAA/USDT");
        assert_eq!(signals[0].score, 100);
        assert_eq!(signals[0].tier, SignalTier::SniperShot);
        assert!(signals[0].indicators.cvd_divergence);
        assert!(signals[0].indicators.iceberg_count >= 1);
        assert!(signals[0].indicators.bb_squeeze);
        assert!(signals[0].imbalance.is_some());

        assert_eq!(signals[1].symbol, "BBB/USDT");
        assert_eq!(signals[1].score, 40);
        assert!(!signals[1].indicators.cvd_divergence);

        // Persisted and published as the same ordered batch
        assert_eq!(store.len(), 2);
        let published = rx.try_recv().unwrap();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].symbol, "AAA/USDT");
    }

    #[tokio::test]
    async fn test_cycle_survives_a_candidate_outage() {
        // CCC's trades and book are down; the signal is built from the
        // anomaly and candle history alone
        let stub = StubSource {
            flow_outage: vec!["CCC/USDT".to_string()],
            ..StubSource::default()
        }
        .with_market(
            "CCC/USDT",
            flat_candles(200, 10.0, Some(6.0)),
            Vec::new(),
            None,
        );
        let (engine, store, _) = engine(stub);
        engine.initialize().await.unwrap();

        let signals = engine.run_cycle().await;

        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].symbol, "CCC/USDT");
        assert_eq!(signals[0].score, 40);
        assert_eq!(signals[0].indicators.iceberg_count, 0);
        assert!(signals[0].imbalance.is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_quiet_cycle_still_publishes_once() {
        let stub = StubSource::default().with_market(
            "DDD/USDT",
            flat_candles(200, 10.0, None),
            Vec::new(),
            None,
        );
        let (engine, store, publisher) = engine(stub);
        engine.initialize().await.unwrap();
        let mut rx = publisher.subscribe();

        let signals = engine.run_cycle().await;

        assert!(signals.is_empty());
        assert!(store.is_empty());
        // Subscribers still hear that the cycle completed
        assert!(rx.try_recv().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_squeeze_report_ranks_squeezed_symbols_by_ratio() {
        let stub = StubSource::default()
            .with_market(
                "AAA/USDT",
                flat_candles(200, 10.0, None),
                accumulation_tape(100),
                Some(quiet_book("AAA/USDT")),
            )
            .with_market(
                "BBB/USDT",
                flat_candles(200, 10.0, None),
                balanced_tape(100),
                Some(quiet_book("BBB/USDT")),
            )
            .with_market(
                "VOL/USDT",
                volatile_candles(200, 10.0),
                balanced_tape(100),
                Some(quiet_book("VOL/USDT")),
            );
        let (engine, _, _) = engine(stub);
        engine.initialize().await.unwrap();

        let report = engine.squeeze_report().await;

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].symbol, "AAA/USDT");
        assert_eq!(report[0].buy_sell_ratio, 8.0);
        assert_eq!(report[0].price, 100.0);
        assert_eq!(report[1].symbol, "BBB/USDT");
        assert_eq!(report[1].buy_sell_ratio, 1.0);
    }

    #[tokio::test]
    async fn test_run_mode_parsing() {
        assert_eq!(RunMode::from_arg("single"), Some(RunMode::Single));
        assert_eq!(RunMode::from_arg("continuous"), Some(RunMode::Continuous));
        assert_eq!(RunMode::from_arg("report"), Some(RunMode::Report));
        assert_eq!(RunMode::from_arg("forever"), None);
    }
}
