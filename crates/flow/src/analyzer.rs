use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};

use argus_core::{BookSide, FlowStrength, OrderFlowAnalysis, OrderFlowReport};
use argus_ports::MarketDataSource;

use crate::delta::{bullish_divergence, buy_sell_ratio, cumulative_delta};
use crate::iceberg::detect_icebergs;

/// At most this many iceberg levels are carried on a report; the count
/// still reflects every candidate found
const MAX_REPORTED_ICEBERGS: usize = 3;

#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Trades pulled per analysis
    pub trade_limit: usize,
    /// How far back the divergence comparison reaches
    pub cvd_divergence_lookback: usize,
    /// Buy/sell ratio must clear 1 + this for a strong read
    pub cvd_threshold: f64,
    /// Depth pulled for iceberg detection
    pub orderbook_depth_limit: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            trade_limit: 500,
            cvd_divergence_lookback: 20,
            cvd_threshold: 0.3,
            orderbook_depth_limit: 100,
        }
    }
}

/// Order-flow analysis for one symbol at a time.
///
/// Every fetch problem is absorbed here and surfaced as a tagged
/// [`OrderFlowAnalysis`] variant; callers never see an error type.
pub struct OrderFlowAnalyzer<S> {
    source: Arc<S>,
    config: FlowConfig,
}

impl<S: MarketDataSource> OrderFlowAnalyzer<S> {
    pub fn new(source: Arc<S>, config: FlowConfig) -> Self {
        Self { source, config }
    }

    pub async fn analyze(&self, symbol: &str) -> OrderFlowAnalysis {
        let trades = match self
            .source
            .fetch_recent_trades(symbol, self.config.trade_limit)
            .await
        {
            Ok(trades) => trades,
            Err(e) => {
                warn!("Trade fetch failed for {}: {}", symbol, e);
                return OrderFlowAnalysis::Failed {
                    symbol: symbol.to_string(),
                    reason: e.to_string(),
                };
            }
        };
        if trades.is_empty() {
            debug!("No recent trades for {}", symbol);
            return OrderFlowAnalysis::NoData {
                symbol: symbol.to_string(),
            };
        }

        let prices: Vec<f64> = trades.iter().map(|t| t.price).collect();
        let cvd = cumulative_delta(&trades);
        let divergence = bullish_divergence(&prices, &cvd, self.config.cvd_divergence_lookback);

        // One snapshot covers both sides. Losing it only costs the iceberg
        // read; the rest of the analysis still completes.
        let mut icebergs = match self
            .source
            .fetch_order_book(symbol, self.config.orderbook_depth_limit)
            .await
        {
            Ok(book) => {
                let mut found = detect_icebergs(&book.bids, BookSide::Bid);
                found.extend(detect_icebergs(&book.asks, BookSide::Ask));
                found
            }
            Err(e) => {
                warn!("Order book unavailable for {}: {}", symbol, e);
                Vec::new()
            }
        };
        let iceberg_count = icebergs.len();
        icebergs.sort_by(|a, b| b.size.total_cmp(&a.size));
        icebergs.truncate(MAX_REPORTED_ICEBERGS);

        let ratio = buy_sell_ratio(&trades);
        let strength = if divergence && ratio > 1.0 + self.config.cvd_threshold {
            FlowStrength::Strong
        } else {
            FlowStrength::Neutral
        };
        if strength.is_strong() {
            info!(
                "Strong flow on {}: price down, CVD up, buy/sell={:.2}",
                symbol, ratio
            );
        }

        OrderFlowAnalysis::Complete(OrderFlowReport {
            symbol: symbol.to_string(),
            cvd_last: cvd.last().copied().unwrap_or(0.0),
            bullish_divergence: divergence,
            buy_sell_ratio: ratio,
            iceberg_count,
            icebergs,
            strength,
            observed_at: Utc::now(),
        })
    }
}
