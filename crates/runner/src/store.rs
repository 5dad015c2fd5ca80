use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use argus_core::{Signal, Timestamp};
use argus_ports::{SignalId, SignalRepository, SignalStats, StoreResult, StoredSignal};

/// In-memory signal repository backed by a concurrent map.
///
/// Ids are assigned here, at save time. Each save is a single map insert,
/// so a cycle abandoned mid-persist leaves whole records behind, never a
/// torn one. Query ordering is computed per call; the map itself keeps
/// no order.
pub struct InMemorySignalStore {
    signals: Arc<DashMap<SignalId, Signal>>,
}

impl InMemorySignalStore {
    pub fn new() -> Self {
        Self {
            signals: Arc::new(DashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    fn snapshot(&self) -> Vec<StoredSignal> {
        self.signals
            .iter()
            .map(|entry| StoredSignal {
                id: *entry.key(),
                signal: entry.value().clone(),
            })
            .collect()
    }
}

impl Default for InMemorySignalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemorySignalStore {
    fn clone(&self) -> Self {
        Self {
            signals: Arc::clone(&self.signals),
        }
    }
}

#[async_trait]
impl SignalRepository for InMemorySignalStore {
    async fn save(&self, signal: &Signal) -> StoreResult<SignalId> {
        let id = Uuid::new_v4();
        self.signals.insert(id, signal.clone());
        Ok(id)
    }

    async fn latest(&self, limit: usize) -> StoreResult<Vec<StoredSignal>> {
        let mut stored = self.snapshot();
        stored.sort_by(|a, b| b.signal.observed_at.cmp(&a.signal.observed_at));
        stored.truncate(limit);
        Ok(stored)
    }

    async fn top_since(&self, limit: usize, since: Timestamp) -> StoreResult<Vec<StoredSignal>> {
        let mut stored: Vec<StoredSignal> = self
            .snapshot()
            .into_iter()
            .filter(|s| s.signal.observed_at >= since)
            .collect();
        stored.sort_by(|a, b| b.signal.score.cmp(&a.signal.score));
        stored.truncate(limit);
        Ok(stored)
    }

    async fn summary_stats(&self) -> StoreResult<SignalStats> {
        let window_start = Utc::now() - Duration::hours(24);
        let stored = self.snapshot();

        let recent: Vec<u8> = stored
            .iter()
            .filter(|s| s.signal.observed_at >= window_start)
            .map(|s| s.signal.score)
            .collect();
        let avg_score_24h = if recent.is_empty() {
            0.0
        } else {
            recent.iter().map(|&score| score as f64).sum::<f64>() / recent.len() as f64
        };

        Ok(SignalStats {
            total: stored.len() as u64,
            last_24h: recent.len() as u64,
            avg_score_24h,
        })
    }
}
