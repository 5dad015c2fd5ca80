use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use argus_core::{Signal, Timestamp};

use crate::error::StoreResult;

/// Identifier assigned to a signal at save time
pub type SignalId = Uuid;

/// A signal together with the id the backend assigned to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSignal {
    pub id: SignalId,
    pub signal: Signal,
}

/// Aggregate view over the stored history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalStats {
    pub total: u64,
    pub last_24h: u64,
    /// Mean score over the trailing 24h; 0 when that window is empty
    pub avg_score_24h: f64,
}

/// Port for signal persistence
///
/// The scan loop is write-mostly; the query methods exist for outer
/// surfaces (report tooling, dashboards) built on top of the store.
#[async_trait]
pub trait SignalRepository: Send + Sync {
    /// Persist one signal and return the id assigned to it
    async fn save(&self, signal: &Signal) -> StoreResult<SignalId>;

    /// Most recent signals, observation time descending
    async fn latest(&self, limit: usize) -> StoreResult<Vec<StoredSignal>>;

    /// Highest-scoring signals observed at or after `since`, score descending
    async fn top_since(&self, limit: usize, since: Timestamp) -> StoreResult<Vec<StoredSignal>>;

    /// Aggregate stats with the 24h window anchored at query time
    async fn summary_stats(&self) -> StoreResult<SignalStats>;
}
