// Candle history builder
// Bounded OHLC window for the focused asset, derived from the price tick stream

use crate::core::assets::Asset;
use crate::core::price_engine::{PriceEngine, PriceTick};
use crate::core::rng::RandomSource;
use crate::types::{Direction, PricePoint};
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CandleHistory {
    asset: Asset,
    points: VecDeque<PricePoint>,
    window: usize,
    wick_factor: f64,
    /// Bumped on every rebuild so stale consumers can tell the window was replaced
    generation: u64,
    direction: Direction,
}

impl CandleHistory {
    pub fn new(asset: Asset, window: usize, wick_factor: f64) -> Self {
        Self {
            asset,
            points: VecDeque::with_capacity(window),
            window: window.max(1),
            wick_factor,
            generation: 0,
            direction: Direction::Neutral,
        }
    }

    pub fn asset(&self) -> Asset {
        self.asset
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.back()
    }

    /// Drop the current window and synthesise a fresh one for `asset`
    /// seeded at its latest known price
    pub fn rebuild(
        &mut self,
        asset: Asset,
        engine: &mut PriceEngine,
        points: usize,
        now: i64,
        spacing_ms: i64,
        rng: &mut dyn RandomSource,
    ) {
        self.asset = asset;
        self.points.clear();
        self.generation += 1;
        self.direction = Direction::Neutral;

        let history = engine.backfill(asset, points.min(self.window), now, spacing_ms, rng);
        self.points.extend(history);
        debug!("🕯️  Rebuilt {} history: {} candles (generation {})", asset, self.points.len(), self.generation);
    }

    /// Append a candle for the focused asset; ticks for other assets are ignored
    pub fn on_tick(&mut self, tick: &PriceTick, now: i64, floor: f64) -> Option<PricePoint> {
        if tick.asset != self.asset {
            return None;
        }
        let previous_close = self.points.back()?.close;

        let volatility = tick.asset.spec().volatility;
        let open = previous_close;
        let close = tick.new_price;
        let candle = PricePoint {
            timestamp: now,
            price: close,
            open,
            high: open.max(close) + volatility * self.wick_factor,
            low: (open.min(close) - volatility * self.wick_factor).max(floor),
            close,
        };

        self.direction = if close > tick.old_price { Direction::Up } else { Direction::Down };

        self.points.push_back(candle);
        while self.points.len() > self.window {
            self.points.pop_front();
        }
        Some(candle)
    }
}
