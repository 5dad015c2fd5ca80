use async_trait::async_trait;

use argus_core::Signal;

/// Port for fanning a cycle's signals out to listeners
///
/// Called once per completed cycle with the batch already ordered by score.
/// Delivery is best-effort: a publisher with no listeners drops the batch
/// silently, and failures never travel back into the scan loop.
#[async_trait]
pub trait SignalPublisher: Send + Sync {
    async fn publish(&self, signals: &[Signal]);
}
