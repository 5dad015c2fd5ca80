use argus_core::TickerStats;

/// Decides which listed markets belong in the scan universe.
///
/// A market passes when its quote currency is on the allow-list, its 24h
/// quote volume clears the floor, and its base asset contains none of the
/// excluded substrings (stable-coin pairs, leveraged tokens).
#[derive(Debug, Clone)]
pub struct UniverseFilter {
    quote_currencies: Vec<String>,
    min_quote_volume: f64,
    excluded_substrings: Vec<String>,
}

impl UniverseFilter {
    pub fn new(
        quote_currencies: Vec<String>,
        min_quote_volume: f64,
        excluded_substrings: Vec<String>,
    ) -> Self {
        Self {
            quote_currencies,
            min_quote_volume,
            excluded_substrings,
        }
    }

    pub fn accepts(&self, symbol: &str, stats: &TickerStats) -> bool {
        // Base/quote split on the last separator; anything unparseable is out
        let Some((base, quote)) = symbol.rsplit_once('/') else {
            return false;
        };
        if !self.quote_currencies.iter().any(|q| q == quote) {
            return false;
        }
        // Substring match deliberately applies to the base asset only
        if self
            .excluded_substrings
            .iter()
            .any(|pat| base.contains(pat.as_str()))
        {
            return false;
        }
        stats.quote_volume >= self.min_quote_volume
    }
}
