use std::sync::Arc;

use chrono::Utc;
use log::info;

use argus_core::{BookPressure, ImbalanceReport};
use argus_ports::{MarketDataResult, MarketDataSource};

use crate::depth::{band_volumes, detect_wall, imbalance_pct};

#[derive(Debug, Clone)]
pub struct ImbalanceConfig {
    /// Half-width of the band around mid, as a percentage of mid
    pub depth_pct: f64,
    /// Depth requested per snapshot
    pub orderbook_depth_limit: usize,
}

impl Default for ImbalanceConfig {
    fn default() -> Self {
        Self {
            depth_pct: 1.0,
            orderbook_depth_limit: 100,
        }
    }
}

/// Reads one depth snapshot per call and reduces it to an imbalance
/// report. A one-sided book is an absence, not an error.
pub struct ImbalanceAnalyzer<S> {
    source: Arc<S>,
    config: ImbalanceConfig,
}

impl<S: MarketDataSource> ImbalanceAnalyzer<S> {
    pub fn new(source: Arc<S>, config: ImbalanceConfig) -> Self {
        Self { source, config }
    }

    pub async fn analyze(&self, symbol: &str) -> MarketDataResult<Option<ImbalanceReport>> {
        let book = self
            .source
            .fetch_order_book(symbol, self.config.orderbook_depth_limit)
            .await?;

        let (Some(best_bid), Some(best_ask)) = (book.best_bid(), book.best_ask()) else {
            return Ok(None);
        };
        let mid = (best_bid.price + best_ask.price) / 2.0;
        let band = mid * self.config.depth_pct / 100.0;

        let (bid_volume, ask_volume) = band_volumes(&book, mid, band);
        let imbalance = imbalance_pct(bid_volume, ask_volume);
        let spread_pct = if mid > 0.0 {
            (best_ask.price - best_bid.price) / mid * 100.0
        } else {
            0.0
        };

        let report = ImbalanceReport {
            symbol: symbol.to_string(),
            mid_price: mid,
            imbalance_pct: imbalance,
            spread_pct,
            bid_volume,
            ask_volume,
            bid_wall: detect_wall(&book.bids),
            ask_wall: detect_wall(&book.asks),
            pressure: BookPressure::from_imbalance(imbalance),
            observed_at: Utc::now(),
        };
        if imbalance.abs() > 20.0 {
            info!(
                "Depth imbalance on {}: {:+.1}% ({})",
                symbol, imbalance, report.pressure
            );
        }
        Ok(Some(report))
    }
}
