// Synthetic order book
// Derives bid/ask depth around the current price on demand; nothing persists between calls

use crate::core::assets::Asset;
use crate::core::rng::RandomSource;
use serde::{Deserialize, Serialize};

/// Represents a single price level in the order book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: f64,
    pub amount: f64,
    pub total: f64,
    /// Running amount from the best price outwards, including this level
    pub cumulative: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBookSide {
    Bid,
    Ask,
}

/// Which sides to generate; a single side gets double depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookView {
    #[default]
    Both,
    BidsOnly,
    AsksOnly,
}

/// Complete synthetic book for one asset
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticOrderBook {
    pub asset: Asset,
    pub reference_price: f64,
    /// Ascending by price, best ask first
    pub asks: Vec<OrderBookLevel>,
    /// Descending by price, best bid first
    pub bids: Vec<OrderBookLevel>,
}

/// Half-spread as a fraction of volatility
const SPREAD_FACTOR: f64 = 0.1;
/// Per-row price step as a fraction of volatility
const STEP_FACTOR: f64 = 0.05;

impl SyntheticOrderBook {
    /// Generate `depth` rows per side (doubled for a single-side view).
    /// Row `i` sits `spread + i * volatility * 0.05 * U` away from the price.
    pub fn generate(
        asset: Asset,
        price: f64,
        volatility: f64,
        depth: usize,
        view: BookView,
        floor: f64,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let (ask_rows, bid_rows) = match view {
            BookView::Both => (depth, depth),
            BookView::AsksOnly => (depth * 2, 0),
            BookView::BidsOnly => (0, depth * 2),
        };
        let spread = volatility * SPREAD_FACTOR;
        let lot = asset.spec().lot_scale;

        let mut asks: Vec<OrderBookLevel> = (1..=ask_rows)
            .map(|i| {
                let level_price = price + spread + i as f64 * volatility * STEP_FACTOR * rng.unit();
                let amount = (rng.unit() * 10.0 + 0.1) * lot;
                OrderBookLevel { price: level_price, amount, total: level_price * amount, cumulative: 0.0 }
            })
            .collect();

        let mut bids: Vec<OrderBookLevel> = (1..=bid_rows)
            .map(|i| {
                let level_price =
                    (price - spread - i as f64 * volatility * STEP_FACTOR * rng.unit()).max(floor);
                let amount = (rng.unit() * 10.0 + 0.1) * lot;
                OrderBookLevel { price: level_price, amount, total: level_price * amount, cumulative: 0.0 }
            })
            .collect();

        asks.sort_by(|a, b| a.price.total_cmp(&b.price));
        bids.sort_by(|a, b| b.price.total_cmp(&a.price));
        accumulate(&mut asks);
        accumulate(&mut bids);

        Self { asset, reference_price: price, asks, bids }
    }

    /// Asks in ladder order (farthest on top, best ask just above the price)
    pub fn asks_for_display(&self) -> Vec<OrderBookLevel> {
        self.asks.iter().rev().copied().collect()
    }

    pub fn best_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.first()
    }

    pub fn spread(&self) -> Option<f64> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some((ask.price + bid.price) / 2.0),
            _ => None,
        }
    }

    /// Total depth on one side, used to scale depth bars
    pub fn max_cumulative(&self, side: OrderBookSide) -> f64 {
        let levels = match side {
            OrderBookSide::Bid => &self.bids,
            OrderBookSide::Ask => &self.asks,
        };
        levels.last().map(|l| l.cumulative).unwrap_or(1.0)
    }

    /// Validate order book integrity
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            if bid.price >= ask.price {
                return Err(format!(
                    "Invalid order book: best bid ({}) >= best ask ({})",
                    bid.price, ask.price
                ));
            }
        }

        for (name, levels) in [("bid", &self.bids), ("ask", &self.asks)] {
            let mut previous = 0.0;
            for level in levels {
                if level.amount <= 0.0 {
                    return Err(format!("Non-positive {} amount at {}", name, level.price));
                }
                if level.cumulative < previous {
                    return Err(format!("Cumulative {} depth decreases at {}", name, level.price));
                }
                previous = level.cumulative;
            }
        }

        Ok(())
    }
}

/// Running sum from the best level outwards
fn accumulate(levels: &mut [OrderBookLevel]) {
    let mut running = 0.0;
    for level in levels.iter_mut() {
        running += level.amount;
        level.cumulative = running;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::StdRandom;

    fn book(view: BookView) -> SyntheticOrderBook {
        let mut rng = StdRandom::seeded(9);
        SyntheticOrderBook::generate(Asset::Ltc, 124.5, 0.8, 20, view, 1e-7, &mut rng)
    }

    #[test]
    fn test_sides_and_sorting() {
        let book = book(BookView::Both);
        assert_eq!(book.asks.len(), 20);
        assert_eq!(book.bids.len(), 20);
        assert!(book.asks.windows(2).all(|w| w[0].price <= w[1].price));
        assert!(book.bids.windows(2).all(|w| w[0].price >= w[1].price));
        assert!(book.asks.iter().all(|l| l.price > 124.5));
        assert!(book.bids.iter().all(|l| l.price < 124.5));
    }

    #[test]
    fn test_cumulative_is_monotonic() {
        let book = book(BookView::Both);
        assert!(book.validate().is_ok());
        let ask_sum: f64 = book.asks.iter().map(|l| l.amount).sum();
        assert!((book.max_cumulative(OrderBookSide::Ask) - ask_sum).abs() < 1e-9);
        assert_eq!(book.bids[0].cumulative, book.bids[0].amount);
    }

    #[test]
    fn test_spread_at_least_twice_half_spread() {
        let book = book(BookView::Both);
        assert!(book.spread().unwrap() >= 2.0 * 0.8 * SPREAD_FACTOR - 1e-9);
        let mid = book.mid_price().unwrap();
        assert!(mid > 120.0 && mid < 130.0);
    }

    #[test]
    fn test_single_side_view_doubles_depth() {
        let asks = book(BookView::AsksOnly);
        assert_eq!(asks.asks.len(), 40);
        assert!(asks.bids.is_empty());
        assert!(asks.spread().is_none());
        assert_eq!(asks.max_cumulative(OrderBookSide::Bid), 1.0);
    }

    #[test]
    fn test_display_order_puts_best_ask_last() {
        let book = book(BookView::Both);
        let ladder = book.asks_for_display();
        assert_eq!(ladder.last().unwrap().price, book.best_ask().unwrap().price);
    }

    #[test]
    fn test_tiny_price_bids_stay_positive() {
        let mut rng = StdRandom::seeded(1);
        let book = SyntheticOrderBook::generate(Asset::Btc, 1e-7, 1000.0, 20, BookView::Both, 1e-7, &mut rng);
        assert!(book.bids.iter().all(|l| l.price > 0.0));
    }
}
