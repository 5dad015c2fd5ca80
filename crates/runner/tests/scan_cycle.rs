//! Full-pipeline integration tests.
//!
//! The engine is wired exactly as the binary wires it: the seeded
//! simulated feed behind the timeout decorator, the in-memory store,
//! and the broadcast publisher. The default feed stages BTC/USDT as an
//! accumulation story, so a cycle has one known answer to find.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use argus_core::SignalTier;
use argus_feed::{SimFeed, SimFeedConfig, TimeoutFeed};
use argus_ports::{SignalPublisher, SignalRepository};
use argus_runner::{BroadcastSignalPublisher, EngineConfig, InMemorySignalStore, ScanEngine};

fn build_engine(
    feed_config: SimFeedConfig,
) -> (
    ScanEngine<TimeoutFeed<SimFeed>>,
    Arc<InMemorySignalStore>,
    Arc<BroadcastSignalPublisher>,
) {
    let source = Arc::new(TimeoutFeed::new(
        SimFeed::new(feed_config),
        Duration::from_secs(10),
    ));
    let store = Arc::new(InMemorySignalStore::new());
    let publisher = Arc::new(BroadcastSignalPublisher::default());
    let engine = ScanEngine::new(
        source,
        EngineConfig::default(),
        Arc::clone(&store) as Arc<dyn SignalRepository>,
        Arc::clone(&publisher) as Arc<dyn SignalPublisher>,
    );
    (engine, store, publisher)
}

/// One cycle against the default feed: the staged BTC/USDT accumulation
/// story is found, scored, persisted, and published, and nothing else is.
#[tokio::test]
async fn test_single_cycle_finds_the_staged_accumulation() {
    let (engine, store, publisher) = build_engine(SimFeedConfig::default());

    // The feed lists five tradable USDT markets plus chaff that the
    // universe filter must drop
    let universe_size = engine.initialize().await.unwrap();
    assert_eq!(universe_size, 5);

    let mut batches = publisher.subscribe();
    let mut btc_signals = publisher.subscribe_symbol("BTC/USDT");

    let signals = engine.run_single().await;

    assert_eq!(signals.len(), 1, "only the spiked symbol should qualify");
    let signal = &signals[0];
    assert_eq!(signal.symbol, "BTC/USDT");

    // Spike of 6x lands in the middle volume band (+20), the falling
    // tape with climbing delta pays +40 with the ratio bonus (+5), and
    // the oversized resting bid pays +10. The grind-down tail keeps the
    // bands open, so no squeeze points.
    assert_eq!(signal.score, 75);
    assert_eq!(signal.tier, SignalTier::CloseWatch);
    assert!((signal.indicators.rvol - 6.0).abs() < 0.5);
    assert!(signal.indicators.cvd_divergence);
    assert!(signal.indicators.buy_sell_ratio > 1.5);
    assert_eq!(signal.indicators.iceberg_count, 1);
    assert!(!signal.indicators.bb_squeeze);
    assert!(signal.price > 0.0);
    assert!(signal.is_actionable());

    // The oversized bid also reads as a wall on the bid side
    let imbalance = signal.imbalance.as_ref().expect("book is two-sided");
    assert!(imbalance.imbalance_pct > 0.0);
    assert!(imbalance.bid_wall.is_some());

    // Persisted under a fresh id
    let stored = store.latest(10).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].signal.symbol, "BTC/USDT");

    // Published once as an ordered batch, and on the symbol channel
    let batch = batches.try_recv().unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(btc_signals.try_recv().unwrap().symbol, "BTC/USDT");
    assert!(batches.try_recv().is_err(), "exactly one publish per cycle");
}

/// A symbol whose venue calls all fail costs only itself, never the cycle
#[tokio::test]
async fn test_outage_on_one_symbol_does_not_fail_the_cycle() {
    let feed_config = SimFeedConfig {
        spiked_symbols: vec!["BTC/USDT".to_string(), "ETH/USDT".to_string()],
        failing_symbols: vec!["ETH/USDT".to_string()],
        ..SimFeedConfig::default()
    };
    let (engine, store, _) = build_engine(feed_config);
    engine.initialize().await.unwrap();

    let signals = engine.run_cycle().await;

    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].symbol, "BTC/USDT");
    assert_eq!(store.len(), 1);
}

/// Continuous mode under virtual time: the first tick fires at once,
/// one cycle lands, and the stop signal ends the loop cleanly.
#[tokio::test(start_paused = true)]
async fn test_continuous_mode_stops_cleanly() {
    let (engine, store, _) = build_engine(SimFeedConfig::default());
    engine.initialize().await.unwrap();
    let engine = Arc::new(engine);

    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.run_continuous(stop_rx).await }
    });

    // Well inside the 60s gap to the second tick
    tokio::time::sleep(Duration::from_secs(1)).await;
    stop_tx.send(true).unwrap();
    handle.await.unwrap();

    assert_eq!(store.len(), 1, "exactly one cycle ran before the stop");
}

/// Dropping the stop sender must also end the loop, not hang it
#[tokio::test(start_paused = true)]
async fn test_continuous_mode_stops_when_the_sender_is_dropped() {
    let (engine, _, _) = build_engine(SimFeedConfig::default());
    engine.initialize().await.unwrap();
    let engine = Arc::new(engine);

    let (stop_tx, stop_rx) = watch::channel(false);
    let handle = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.run_continuous(stop_rx).await }
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    drop(stop_tx);
    handle.await.unwrap();
}

/// Report mode output is bounded and ranked whatever the feed serves up
#[tokio::test]
async fn test_squeeze_report_is_bounded_and_ranked() {
    let (engine, _, _) = build_engine(SimFeedConfig::default());
    engine.initialize().await.unwrap();

    let report = engine.squeeze_report().await;

    assert!(report.len() <= 10);
    assert!(
        report
            .windows(2)
            .all(|pair| pair[0].buy_sell_ratio >= pair[1].buy_sell_ratio),
        "report must be ordered by buy/sell ratio descending"
    );
}
