use argus_core::{
    ImbalanceReport, OrderFlowReport, Signal, SignalIndicators, SignalTier, Timestamp,
    VolumeAnomaly,
};
use argus_indicators::detect_bb_squeeze;

/// Tier from score, inclusive lower bounds
pub fn classify(score: u8) -> SignalTier {
    if score >= 80 {
        SignalTier::SniperShot
    } else if score >= 60 {
        SignalTier::CloseWatch
    } else if score >= 40 {
        SignalTier::QuietAccumulation
    } else {
        SignalTier::Noise
    }
}

/// Action text mirroring the tiers; deterministic in the score
pub fn recommend_action(score: u8) -> &'static str {
    if score >= 80 {
        "Immediate entry, aggressive, with a tight stop loss"
    } else if score >= 60 {
        "Prepare entry, wait for 15m confirmation"
    } else if score >= 40 {
        "Accumulate gradually over the next 24-48h"
    } else {
        "No action, keep monitoring"
    }
}

#[derive(Debug, Clone)]
pub struct ScorerConfig {
    pub bb_period: usize,
    pub bb_std: f64,
    pub bb_squeeze_threshold: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            bb_period: 20,
            bb_std: 2.0,
            bb_squeeze_threshold: 0.02,
        }
    }
}

/// Additive scorer over the per-symbol readings.
///
/// Volume pays up to 30 points by relative-volume band, bullish
/// divergence pays 40 (plus 5 when buyers clearly dominate), a squeeze
/// pays 20, any iceberg presence pays 10, and the total is capped at 100.
/// A missing reading simply contributes nothing.
#[derive(Debug, Clone)]
pub struct SignalScorer {
    config: ScorerConfig,
}

impl SignalScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        anomaly: Option<&VolumeAnomaly>,
        flow: Option<&OrderFlowReport>,
        closes: &[f64],
    ) -> u8 {
        Self::score_parts(anomaly, flow, self.detects_squeeze(closes))
    }

    /// Assemble the outbound signal for one symbol from whatever readings
    /// survived the cycle
    pub fn build_signal(
        &self,
        symbol: &str,
        anomaly: Option<&VolumeAnomaly>,
        flow: Option<&OrderFlowReport>,
        closes: &[f64],
        imbalance: Option<ImbalanceReport>,
        observed_at: Timestamp,
    ) -> Signal {
        let bb_squeeze = self.detects_squeeze(closes);
        let score = Self::score_parts(anomaly, flow, bb_squeeze);
        let price = anomaly
            .map(|a| a.price)
            .or_else(|| closes.last().copied())
            .unwrap_or(0.0);

        Signal {
            symbol: symbol.to_string(),
            observed_at,
            score,
            tier: classify(score),
            price,
            indicators: SignalIndicators {
                rvol: anomaly.map(|a| a.rvol).unwrap_or(0.0),
                cvd_divergence: flow.map(|f| f.bullish_divergence).unwrap_or(false),
                buy_sell_ratio: flow.map(|f| f.buy_sell_ratio).unwrap_or(0.0),
                iceberg_count: flow.map(|f| f.iceberg_count).unwrap_or(0),
                bb_squeeze,
            },
            imbalance,
            recommended_action: recommend_action(score).to_string(),
        }
    }

    /// Whether the close history shows a volatility squeeze under this
    /// scorer's band settings. Fails closed on short history.
    pub fn detects_squeeze(&self, closes: &[f64]) -> bool {
        detect_bb_squeeze(
            closes,
            self.config.bb_period,
            self.config.bb_std,
            self.config.bb_squeeze_threshold,
        )
    }

    fn score_parts(
        anomaly: Option<&VolumeAnomaly>,
        flow: Option<&OrderFlowReport>,
        bb_squeeze: bool,
    ) -> u8 {
        let mut score: u8 = 0;

        if let Some(anomaly) = anomaly {
            if anomaly.rvol >= 10.0 {
                score += 30;
            } else if anomaly.rvol >= 7.0 {
                score += 25;
            } else if anomaly.rvol >= 5.0 {
                score += 20;
            }
        }

        if let Some(flow) = flow {
            if flow.bullish_divergence {
                score += 40;
                if flow.buy_sell_ratio > 1.5 {
                    score += 5;
                }
            }
            if flow.iceberg_count > 0 {
                score += 10;
            }
        }

        if bb_squeeze {
            score += 20;
        }

        score.min(100)
    }
}
