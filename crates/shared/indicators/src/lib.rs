//! Argus Indicators
//!
//! Pure indicator math for the Argus market scanner: series in, series or
//! summary out. No I/O, no shared state, every degenerate input mapped to
//! a defined value instead of a panic or a NaN.

mod atr;
mod bollinger;
mod moving;
mod rsi;
mod stats;
mod volume;

pub use atr::{atr, true_range};
pub use bollinger::{BollingerBands, bollinger_bands, detect_bb_squeeze};
pub use moving::{ema, sma};
pub use rsi::rsi;
pub use stats::{mean, sample_std_dev};
pub use volume::{VolumeBin, relative_volume, volume_profile};
