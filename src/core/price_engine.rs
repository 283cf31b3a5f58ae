// Synthetic price engine
// Advances every asset's price once per tick under a shared volatility/trend model

use crate::core::assets::{Asset, AssetSpec};
use crate::core::rng::RandomSource;
use crate::types::PricePoint;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Trend weight for the focused asset vs. the background market
const FOCUSED_TREND_WEIGHT: f64 = 0.3;
const BACKGROUND_TREND_WEIGHT: f64 = 0.05;

/// Slight upward drift used when synthesising chart history
const BACKFILL_CENTER: f64 = 0.48;
const BACKFILL_WICK: f64 = 0.2;

/// Result of advancing one asset by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTick {
    pub asset: Asset,
    pub old_price: f64,
    pub new_price: f64,
    pub change: f64,
}

/// Process-wide modulation applied during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulation {
    pub trend: f64,
    pub volatility_multiplier: f64,
}

impl Default for Modulation {
    fn default() -> Self {
        Self { trend: 0.0, volatility_multiplier: 1.0 }
    }
}

#[derive(Debug, Clone)]
pub struct PriceEngine {
    prices: BTreeMap<Asset, f64>,
    /// Cumulative percentage change per asset, shown as the 24h figure
    stats: BTreeMap<Asset, f64>,
    floor: f64,
}

/// One random-walk step. Never returns a non-positive or non-finite price.
pub fn step_price(
    old_price: f64,
    spec: &AssetSpec,
    modulation: Modulation,
    focused: bool,
    floor: f64,
    rng: &mut dyn RandomSource,
) -> (f64, f64) {
    let weight = if focused { FOCUSED_TREND_WEIGHT } else { BACKGROUND_TREND_WEIGHT };
    let base_change = (rng.unit() - 0.5 + modulation.trend * weight) * spec.volatility;
    let change = base_change * if focused { modulation.volatility_multiplier } else { 1.0 };

    let next = (old_price + change).max(floor);
    if next.is_finite() {
        (next, change)
    } else {
        (old_price.max(floor), 0.0)
    }
}

impl PriceEngine {
    pub fn new(floor: f64) -> Self {
        let prices = Asset::ALL.into_iter().map(|a| (a, a.spec().base_price)).collect();
        let stats = Asset::ALL.into_iter().map(|a| (a, 0.0)).collect();
        Self { prices, stats, floor }
    }

    /// Seed the 24h figures the way a freshly opened terminal shows them
    pub fn seed_stats(&mut self, rng: &mut dyn RandomSource) {
        for asset in Asset::ALL {
            self.stats.insert(asset, rng.unit() * 12.0 - 4.0);
        }
    }

    /// Restore a saved price map; unusable entries fall back to base price
    pub fn restore(&mut self, prices: &BTreeMap<Asset, f64>, stats: &BTreeMap<Asset, f64>) {
        for (asset, price) in prices {
            if price.is_finite() && *price >= self.floor {
                self.prices.insert(*asset, *price);
            } else {
                warn!("⚠️  Ignoring saved {} price {}", asset, price);
            }
        }
        for (asset, stat) in stats {
            if stat.is_finite() {
                self.stats.insert(*asset, *stat);
            }
        }
    }

    pub fn price(&self, asset: Asset) -> f64 {
        self.prices.get(&asset).copied().unwrap_or_else(|| asset.spec().base_price)
    }

    pub fn prices(&self) -> &BTreeMap<Asset, f64> {
        &self.prices
    }

    pub fn change_pct(&self, asset: Asset) -> f64 {
        self.stats.get(&asset).copied().unwrap_or(0.0)
    }

    pub fn stats(&self) -> &BTreeMap<Asset, f64> {
        &self.stats
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub(crate) fn set_price(&mut self, asset: Asset, price: f64) {
        if price.is_finite() {
            self.prices.insert(asset, price.max(self.floor));
        }
    }

    /// Advance every asset by one step
    pub fn tick(
        &mut self,
        focused: Asset,
        modulation: Modulation,
        rng: &mut dyn RandomSource,
    ) -> Vec<PriceTick> {
        let mut ticks = Vec::with_capacity(Asset::ALL.len());

        for asset in Asset::ALL {
            let spec = asset.spec();
            let old_price = self.price(asset);
            let (new_price, change) =
                step_price(old_price, &spec, modulation, asset == focused, self.floor, rng);

            self.prices.insert(asset, new_price);
            let stat = self.stats.entry(asset).or_insert(0.0);
            *stat += change / spec.base_price * 100.0;

            ticks.push(PriceTick { asset, old_price, new_price, change });
        }

        debug!("📊 Price tick: {} = {:.6}", focused, self.price(focused));
        ticks
    }

    /// Synthesise `points` candles ending at `now`, one per `spacing_ms`,
    /// starting from the asset's latest known price. The final close
    /// becomes the asset's current price.
    pub fn backfill(
        &mut self,
        asset: Asset,
        points: usize,
        now: i64,
        spacing_ms: i64,
        rng: &mut dyn RandomSource,
    ) -> Vec<PricePoint> {
        let volatility = asset.spec().volatility;
        let mut last = self.price(asset);
        let mut history = Vec::with_capacity(points);

        for i in (0..points).rev() {
            let change = (rng.unit() - BACKFILL_CENTER) * volatility;
            let price = (last + change).max(self.floor);
            history.push(PricePoint {
                timestamp: now - i as i64 * spacing_ms,
                price,
                open: last,
                high: price + volatility * BACKFILL_WICK,
                low: (price - volatility * BACKFILL_WICK).max(self.floor),
                close: price,
            });
            last = price;
        }

        self.set_price(asset, last);
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::{ScriptedRandom, StdRandom};

    #[test]
    fn test_neutral_draw_keeps_price() {
        let mut engine = PriceEngine::new(1e-7);
        let mut rng = ScriptedRandom::constant(0.5);
        engine.tick(Asset::Doge, Modulation::default(), &mut rng);
        for asset in Asset::ALL {
            assert!((engine.price(asset) - asset.spec().base_price).abs() < 1e-12);
        }
    }

    #[test]
    fn test_focused_asset_gets_multiplier() {
        let mut engine = PriceEngine::new(1e-7);
        let mut rng = ScriptedRandom::constant(1.0);
        let modulation = Modulation { trend: 0.0, volatility_multiplier: 4.0 };
        let ticks = engine.tick(Asset::Ltc, modulation, &mut rng);

        let ltc = ticks.iter().find(|t| t.asset == Asset::Ltc).unwrap();
        let ada = ticks.iter().find(|t| t.asset == Asset::Ada).unwrap();
        assert!((ltc.change - 0.5 * 0.8 * 4.0).abs() < 1e-9);
        assert!((ada.change - 0.5 * 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_trend_weight_differs_for_background() {
        let mut engine = PriceEngine::new(1e-7);
        let mut rng = ScriptedRandom::constant(0.5);
        let modulation = Modulation { trend: -0.8, volatility_multiplier: 1.0 };
        let ticks = engine.tick(Asset::Sol, modulation, &mut rng);

        let sol = ticks.iter().find(|t| t.asset == Asset::Sol).unwrap();
        let dot = ticks.iter().find(|t| t.asset == Asset::Dot).unwrap();
        assert!((sol.change - (-0.8 * 0.3 * 4.5)).abs() < 1e-9);
        assert!((dot.change - (-0.8 * 0.05 * 1.2)).abs() < 1e-9);
    }

    #[test]
    fn test_price_floor_holds_under_crash() {
        let mut engine = PriceEngine::new(1e-7);
        let mut rng = ScriptedRandom::constant(0.0);
        let crash = Modulation { trend: -0.8, volatility_multiplier: 6.0 };
        for _ in 0..2_000 {
            engine.tick(Asset::Doge, crash, &mut rng);
        }
        for asset in Asset::ALL {
            let price = engine.price(asset);
            assert!(price > 0.0 && price.is_finite(), "{} -> {}", asset, price);
        }
        assert_eq!(engine.price(Asset::Doge), 1e-7);
    }

    #[test]
    fn test_random_walk_stays_positive() {
        let mut engine = PriceEngine::new(1e-7);
        let mut rng = StdRandom::seeded(7);
        for i in 0..5_000 {
            let modulation = if i % 50 < 8 {
                Modulation { trend: -0.8, volatility_multiplier: 6.0 }
            } else {
                Modulation::default()
            };
            for tick in engine.tick(Asset::Btc, modulation, &mut rng) {
                assert!(tick.new_price > 0.0 && tick.new_price.is_finite());
            }
        }
    }

    #[test]
    fn test_stats_accumulate_against_base_price() {
        let mut engine = PriceEngine::new(1e-7);
        let mut rng = ScriptedRandom::constant(1.0);
        engine.tick(Asset::Doge, Modulation::default(), &mut rng);
        let expected = 0.5 * 0.005 / 0.4285 * 100.0;
        assert!((engine.change_pct(Asset::Doge) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_backfill_shape() {
        let mut engine = PriceEngine::new(1e-7);
        let mut rng = StdRandom::seeded(3);
        let history = engine.backfill(Asset::Eth, 150, 1_000_000, 1_000, &mut rng);

        assert_eq!(history.len(), 150);
        assert_eq!(history.last().unwrap().timestamp, 1_000_000);
        assert_eq!(history[0].timestamp, 1_000_000 - 149 * 1_000);
        for pair in history.windows(2) {
            assert_eq!(pair[1].open, pair[0].close);
        }
        assert_eq!(engine.price(Asset::Eth), history.last().unwrap().close);
    }

    #[test]
    fn test_restore_rejects_bad_prices() {
        let mut engine = PriceEngine::new(1e-7);
        let prices = BTreeMap::from([(Asset::Ltc, 130.0), (Asset::Btc, f64::NAN), (Asset::Eth, -5.0)]);
        engine.restore(&prices, &BTreeMap::new());
        assert_eq!(engine.price(Asset::Ltc), 130.0);
        assert_eq!(engine.price(Asset::Btc), Asset::Btc.spec().base_price);
        assert_eq!(engine.price(Asset::Eth), Asset::Eth.spec().base_price);
    }
}
