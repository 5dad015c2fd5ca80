use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use argus_book::ImbalanceConfig;
use argus_feed::SimFeedConfig;
use argus_flow::FlowConfig;
use argus_scanner::ScannerConfig;
use argus_scorer::ScorerConfig;

use crate::engine::EngineConfig;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// Whole-process configuration, loaded from a JSON file.
///
/// Every field has a default, so an empty object (or no file at all) is a
/// complete configuration. Keys shared by several components, such as the
/// depth limit and the concurrency bound, live at the top level and are
/// copied into each component config on conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scanner: ScannerSection,

    #[serde(default)]
    pub flow: FlowSection,

    #[serde(default)]
    pub book: BookSection,

    #[serde(default)]
    pub scorer: ScorerSection,

    /// Depth levels requested per order-book snapshot
    #[serde(default = "default_orderbook_depth_limit")]
    pub orderbook_depth_limit: usize,

    /// Seconds between cycle starts in continuous mode, and the
    /// per-cycle deadline
    #[serde(default = "default_scan_interval_seconds")]
    pub scan_interval_seconds: u64,

    /// In-flight bound for both the volume pass and the deep-analysis pass
    #[serde(default = "default_max_concurrent_symbols")]
    pub max_concurrent_symbols: usize,

    #[serde(default)]
    pub feed: FeedSection,
}

fn default_orderbook_depth_limit() -> usize {
    100
}

fn default_scan_interval_seconds() -> u64 {
    60
}

fn default_max_concurrent_symbols() -> usize {
    50
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scanner: ScannerSection::default(),
            flow: FlowSection::default(),
            book: BookSection::default(),
            scorer: ScorerSection::default(),
            orderbook_depth_limit: default_orderbook_depth_limit(),
            scan_interval_seconds: default_scan_interval_seconds(),
            max_concurrent_symbols: default_max_concurrent_symbols(),
            feed: FeedSection::default(),
        }
    }
}

/// Universe membership and relative-volume settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerSection {
    #[serde(default = "default_rvol_threshold")]
    pub rvol_threshold: f64,

    #[serde(default = "default_volume_lookback_hours")]
    pub volume_lookback_hours: u32,

    #[serde(default = "default_min_candles_required")]
    pub min_candles_required: usize,

    #[serde(default = "default_quote_currencies")]
    pub quote_currencies: Vec<String>,

    #[serde(default = "default_min_volume_usd")]
    pub min_volume_usd: f64,

    #[serde(default = "default_excluded_symbol_substrings")]
    pub excluded_symbol_substrings: Vec<String>,
}

fn default_rvol_threshold() -> f64 {
    5.0
}

fn default_volume_lookback_hours() -> u32 {
    24
}

fn default_min_candles_required() -> usize {
    100
}

fn default_quote_currencies() -> Vec<String> {
    vec!["USDT".to_string()]
}

fn default_min_volume_usd() -> f64 {
    100_000.0
}

fn default_excluded_symbol_substrings() -> Vec<String> {
    ["BUSD", "USDC", "DAI", "TUSD", "USDP", "UP", "DOWN", "BEAR", "BULL"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ScannerSection {
    fn default() -> Self {
        Self {
            rvol_threshold: default_rvol_threshold(),
            volume_lookback_hours: default_volume_lookback_hours(),
            min_candles_required: default_min_candles_required(),
            quote_currencies: default_quote_currencies(),
            min_volume_usd: default_min_volume_usd(),
            excluded_symbol_substrings: default_excluded_symbol_substrings(),
        }
    }
}

/// Order-flow analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSection {
    #[serde(default = "default_trade_limit")]
    pub trade_limit: usize,

    #[serde(default = "default_cvd_divergence_lookback")]
    pub cvd_divergence_lookback: usize,

    #[serde(default = "default_cvd_threshold")]
    pub cvd_threshold: f64,
}

fn default_trade_limit() -> usize {
    500
}

fn default_cvd_divergence_lookback() -> usize {
    20
}

fn default_cvd_threshold() -> f64 {
    0.3
}

impl Default for FlowSection {
    fn default() -> Self {
        Self {
            trade_limit: default_trade_limit(),
            cvd_divergence_lookback: default_cvd_divergence_lookback(),
            cvd_threshold: default_cvd_threshold(),
        }
    }
}

/// Depth-imbalance settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSection {
    /// Half-width of the measured band around mid, as a percentage of mid
    #[serde(default = "default_depth_pct")]
    pub depth_pct: f64,
}

fn default_depth_pct() -> f64 {
    1.0
}

impl Default for BookSection {
    fn default() -> Self {
        Self {
            depth_pct: default_depth_pct(),
        }
    }
}

/// Bollinger-band squeeze settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerSection {
    #[serde(default = "default_bb_period")]
    pub bb_period: usize,

    #[serde(default = "default_bb_std")]
    pub bb_std: f64,

    #[serde(default = "default_bb_squeeze_threshold")]
    pub bb_squeeze_threshold: f64,
}

fn default_bb_period() -> usize {
    20
}

fn default_bb_std() -> f64 {
    2.0
}

fn default_bb_squeeze_threshold() -> f64 {
    0.02
}

impl Default for ScorerSection {
    fn default() -> Self {
        Self {
            bb_period: default_bb_period(),
            bb_std: default_bb_std(),
            bb_squeeze_threshold: default_bb_squeeze_threshold(),
        }
    }
}

/// Simulated-venue adapter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSection {
    #[serde(default = "default_feed_seed")]
    pub seed: u64,

    #[serde(default = "default_feed_symbols")]
    pub symbols: Vec<String>,

    #[serde(default = "default_spiked_symbols")]
    pub spiked_symbols: Vec<String>,

    #[serde(default = "default_spike_factor")]
    pub spike_factor: f64,

    /// Per-request deadline applied by the timeout decorator
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_feed_seed() -> u64 {
    42
}

fn default_feed_symbols() -> Vec<String> {
    SimFeedConfig::default().symbols
}

fn default_spiked_symbols() -> Vec<String> {
    SimFeedConfig::default().spiked_symbols
}

fn default_spike_factor() -> f64 {
    6.0
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            seed: default_feed_seed(),
            symbols: default_feed_symbols(),
            spiked_symbols: default_spiked_symbols(),
            spike_factor: default_spike_factor(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            rvol_threshold: self.scanner.rvol_threshold,
            volume_lookback_hours: self.scanner.volume_lookback_hours,
            min_candles_required: self.scanner.min_candles_required,
            quote_currencies: self.scanner.quote_currencies.clone(),
            min_volume_usd: self.scanner.min_volume_usd,
            excluded_symbol_substrings: self.scanner.excluded_symbol_substrings.clone(),
            max_concurrent_symbols: self.max_concurrent_symbols,
        }
    }

    pub fn flow_config(&self) -> FlowConfig {
        FlowConfig {
            trade_limit: self.flow.trade_limit,
            cvd_divergence_lookback: self.flow.cvd_divergence_lookback,
            cvd_threshold: self.flow.cvd_threshold,
            orderbook_depth_limit: self.orderbook_depth_limit,
        }
    }

    pub fn book_config(&self) -> ImbalanceConfig {
        ImbalanceConfig {
            depth_pct: self.book.depth_pct,
            orderbook_depth_limit: self.orderbook_depth_limit,
        }
    }

    pub fn scorer_config(&self) -> ScorerConfig {
        ScorerConfig {
            bb_period: self.scorer.bb_period,
            bb_std: self.scorer.bb_std,
            bb_squeeze_threshold: self.scorer.bb_squeeze_threshold,
        }
    }

    /// Assemble the full engine configuration from the sections
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            scanner: self.scanner_config(),
            flow: self.flow_config(),
            book: self.book_config(),
            scorer: self.scorer_config(),
            scan_interval: Duration::from_secs(self.scan_interval_seconds),
            max_concurrent_symbols: self.max_concurrent_symbols,
        }
    }

    pub fn feed_config(&self) -> SimFeedConfig {
        SimFeedConfig {
            seed: self.feed.seed,
            symbols: self.feed.symbols.clone(),
            spiked_symbols: self.feed.spiked_symbols.clone(),
            spike_factor: self.feed.spike_factor,
            ..SimFeedConfig::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.feed.request_timeout_secs)
    }
}
