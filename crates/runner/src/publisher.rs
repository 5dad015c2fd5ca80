use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

use argus_core::Signal;
use argus_ports::SignalPublisher;

const DEFAULT_CAPACITY: usize = 256;

/// Broadcast fan-out for scan results.
///
/// The global channel carries each cycle's batch in score order; per-symbol
/// channels carry the individual signals for listeners that only care about
/// one market. Sends are fire-and-forget: with no subscriber the batch is
/// dropped, and a lagging subscriber loses the oldest batches first.
pub struct BroadcastSignalPublisher {
    global_tx: broadcast::Sender<Vec<Signal>>,
    symbol_channels: Arc<DashMap<String, broadcast::Sender<Signal>>>,
    subscriber_count: Arc<AtomicUsize>,
    capacity: usize,
}

impl BroadcastSignalPublisher {
    pub fn new(capacity: usize) -> Self {
        let (global_tx, _) = broadcast::channel(capacity);
        Self {
            global_tx,
            symbol_channels: Arc::new(DashMap::new()),
            subscriber_count: Arc::new(AtomicUsize::new(0)),
            capacity,
        }
    }

    /// Subscribe to every cycle's ordered batch
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<Signal>> {
        self.subscriber_count.fetch_add(1, Ordering::SeqCst);
        self.global_tx.subscribe()
    }

    /// Subscribe to signals for a single symbol
    pub fn subscribe_symbol(&self, symbol: &str) -> broadcast::Receiver<Signal> {
        self.subscriber_count.fetch_add(1, Ordering::SeqCst);
        self.symbol_channels
            .entry(symbol.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Record that a subscription handed out earlier was dropped
    pub fn unsubscribe(&self) {
        self.subscriber_count.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count.load(Ordering::SeqCst)
    }
}

impl Default for BroadcastSignalPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Clone for BroadcastSignalPublisher {
    fn clone(&self) -> Self {
        Self {
            global_tx: self.global_tx.clone(),
            symbol_channels: Arc::clone(&self.symbol_channels),
            subscriber_count: Arc::clone(&self.subscriber_count),
            capacity: self.capacity,
        }
    }
}

#[async_trait]
impl SignalPublisher for BroadcastSignalPublisher {
    async fn publish(&self, signals: &[Signal]) {
        // A send error only means nobody is listening
        let _ = self.global_tx.send(signals.to_vec());

        for signal in signals {
            if let Some(tx) = self.symbol_channels.get(&signal.symbol) {
                let _ = tx.send(signal.clone());
            }
        }
    }
}
