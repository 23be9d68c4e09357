//! Market regime classification.
//!
//! Classifies a candle series as Trending, Ranging, or Volatile from three
//! window measures the indicator layer already provides: annualized
//! volatility, the volume trend, and ADX trend strength. Volatility is
//! checked first; a strongly directional but wild market is still Volatile
//! for strategy-selection purposes.

use stratsim_core::domain::{Candle, MarketRegime};
use stratsim_core::indicators::adx;
use stratsim_core::indicators::snapshot::{annualized_volatility, volume_change_pct, ADX_PERIOD};
use stratsim_core::signal::ADX_TREND_THRESHOLD;

/// Annualized volatility at or above this is Volatile outright.
pub const VOLATILE_VOLATILITY_THRESHOLD: f64 = 8.0;

/// Annualized volatility at or above this counts as elevated; combined with
/// a volume surge it also classifies as Volatile.
pub const ELEVATED_VOLATILITY_THRESHOLD: f64 = 4.0;

/// Volume change (percent, fast window vs. slow window) that counts as a
/// surge.
pub const VOLUME_SURGE_THRESHOLD: f64 = 50.0;

/// Classifies the market regime over the whole series.
///
/// Short series degrade the same way indicators do: each measure falls back
/// to its neutral value when its own window cannot be filled.
pub fn detect_regime(candles: &[Candle]) -> MarketRegime {
    let volatility = annualized_volatility(candles);
    let volume_trend = volume_change_pct(candles);

    if volatility >= VOLATILE_VOLATILITY_THRESHOLD
        || (volatility >= ELEVATED_VOLATILITY_THRESHOLD
            && volume_trend >= VOLUME_SURGE_THRESHOLD)
    {
        return MarketRegime::Volatile;
    }

    if adx(candles, ADX_PERIOD) > ADX_TREND_THRESHOLD {
        return MarketRegime::Trending;
    }

    MarketRegime::Ranging
}
