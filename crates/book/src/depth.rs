use argus_core::{BookLevel, OrderBookSnapshot, Wall};

/// Walls are searched this deep into each side
const WALL_SCAN_LEVELS: usize = 10;

/// A level holding at least this share of the scanned window is a wall
const WALL_SHARE_PCT: f64 = 30.0;

/// Bid and ask size summed inside `band` of the mid: bids priced at or
/// above `mid - band`, asks priced at or below `mid + band`.
pub fn band_volumes(book: &OrderBookSnapshot, mid: f64, band: f64) -> (f64, f64) {
    let bid: f64 = book
        .bids
        .iter()
        .filter(|l| l.price >= mid - band)
        .map(|l| l.size)
        .sum();
    let ask: f64 = book
        .asks
        .iter()
        .filter(|l| l.price <= mid + band)
        .map(|l| l.size)
        .sum();
    (bid, ask)
}

/// Signed imbalance in percent, positive when bids dominate.
/// Exactly 0 when the band is empty on both sides.
pub fn imbalance_pct(bid_volume: f64, ask_volume: f64) -> f64 {
    let total = bid_volume + ask_volume;
    if total == 0.0 {
        return 0.0;
    }
    (bid_volume - ask_volume) / total * 100.0
}

/// First level inside the near-touch window holding an outsized share of
/// it. The share denominator is the summed size of the same window, never
/// the full book, so a deep tail cannot dilute a wall at the touch.
pub fn detect_wall(levels: &[BookLevel]) -> Option<Wall> {
    let window = &levels[..levels.len().min(WALL_SCAN_LEVELS)];
    let total: f64 = window.iter().map(|l| l.size).sum();
    if total == 0.0 {
        return None;
    }
    window
        .iter()
        .map(|l| (l, l.size / total * 100.0))
        .find(|(_, share)| *share >= WALL_SHARE_PCT)
        .map(|(l, share)| Wall {
            price: l.price,
            size: l.size,
            share_pct: share,
        })
}
