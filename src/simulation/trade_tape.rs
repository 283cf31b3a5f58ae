// Trade recorder
// Bounded newest-first tapes of user fills and synthetic market prints per asset

use crate::core::assets::Asset;
use crate::core::rng::RandomSource;
use crate::types::{Side, Trade};
use std::collections::{BTreeMap, VecDeque};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TradeRecorder {
    market: BTreeMap<Asset, VecDeque<Trade>>,
    user: BTreeMap<Asset, VecDeque<Trade>>,
    market_capacity: usize,
    user_capacity: usize,
}

fn push_front_bounded(tape: &mut VecDeque<Trade>, trade: Trade, capacity: usize) {
    tape.push_front(trade);
    tape.truncate(capacity);
}

impl TradeRecorder {
    pub fn new(market_capacity: usize, user_capacity: usize) -> Self {
        Self {
            market: BTreeMap::new(),
            user: BTreeMap::new(),
            market_capacity,
            user_capacity,
        }
    }

    pub fn record_user(&mut self, asset: Asset, side: Side, amount: f64, price: f64, now: i64) -> Trade {
        let trade = Trade {
            id: format!("user-{}", Uuid::new_v4()),
            price,
            amount,
            timestamp: now,
            side,
        };
        let tape = self.user.entry(asset).or_default();
        push_front_bounded(tape, trade.clone(), self.user_capacity);
        trade
    }

    pub fn record_market(&mut self, asset: Asset, trade: Trade) {
        let tape = self.market.entry(asset).or_default();
        push_front_bounded(tape, trade, self.market_capacity);
    }

    /// With probability `chance`, print a synthetic trade near `price`
    pub fn maybe_print(
        &mut self,
        asset: Asset,
        price: f64,
        now: i64,
        chance: f64,
        floor: f64,
        rng: &mut dyn RandomSource,
    ) -> Option<Trade> {
        if !rng.chance(chance) {
            return None;
        }
        let volatility = asset.spec().volatility;
        let trade = Trade {
            id: Uuid::from_u64_pair(rng.bits(), rng.bits()).simple().to_string()[..9].to_string(),
            price: (price + (rng.unit() - 0.5) * volatility * 0.2).max(floor),
            amount: rng.unit() * asset.max_tape_amount(),
            timestamp: now,
            side: if rng.chance(0.5) { Side::Buy } else { Side::Sell },
        };
        self.record_market(asset, trade.clone());
        Some(trade)
    }

    pub fn market_tape(&self, asset: Asset) -> Vec<Trade> {
        self.market.get(&asset).map(|t| t.iter().cloned().collect()).unwrap_or_default()
    }

    pub fn user_tape(&self, asset: Asset) -> Vec<Trade> {
        self.user.get(&asset).map(|t| t.iter().cloned().collect()).unwrap_or_default()
    }

    /// Snapshot of every user tape, for persistence
    pub fn user_history(&self) -> BTreeMap<Asset, Vec<Trade>> {
        self.user
            .iter()
            .map(|(asset, tape)| (*asset, tape.iter().cloned().collect()))
            .collect()
    }

    /// Load saved user tapes, keeping each within capacity and newest-first
    pub fn restore_user(&mut self, history: BTreeMap<Asset, Vec<Trade>>) {
        self.user.clear();
        for (asset, mut trades) in history {
            trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            trades.truncate(self.user_capacity);
            self.user.insert(asset, trades.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::{ScriptedRandom, StdRandom};

    #[test]
    fn test_user_tape_bounded_newest_first() {
        let mut recorder = TradeRecorder::new(25, 50);
        for i in 0..80 {
            recorder.record_user(Asset::Doge, Side::Buy, 1.0, 0.4, i);
        }
        let tape = recorder.user_tape(Asset::Doge);
        assert_eq!(tape.len(), 50);
        assert_eq!(tape[0].timestamp, 79);
        assert_eq!(tape[49].timestamp, 30);
        assert!(tape.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn test_market_tape_bounded() {
        let mut recorder = TradeRecorder::new(25, 50);
        let mut rng = StdRandom::seeded(5);
        for i in 0..200 {
            recorder.maybe_print(Asset::Btc, 98_000.0, i, 1.0, 1e-7, &mut rng);
        }
        let tape = recorder.market_tape(Asset::Btc);
        assert_eq!(tape.len(), 25);
        assert_eq!(tape[0].timestamp, 199);
        assert!(tape.iter().all(|t| t.amount < 0.005 && t.price > 0.0));
    }

    #[test]
    fn test_print_miss() {
        let mut recorder = TradeRecorder::new(25, 50);
        let mut rng = ScriptedRandom::constant(0.9);
        assert!(recorder.maybe_print(Asset::Doge, 0.4, 0, 0.2, 1e-7, &mut rng).is_none());
        assert!(recorder.market_tape(Asset::Doge).is_empty());
    }

    #[test]
    fn test_restore_enforces_bounds() {
        let mut recorder = TradeRecorder::new(25, 3);
        let trades: Vec<Trade> = (0..6)
            .map(|i| Trade { id: i.to_string(), price: 1.0, amount: 1.0, timestamp: i, side: Side::Sell })
            .collect();
        recorder.restore_user(BTreeMap::from([(Asset::Ada, trades)]));
        let tape = recorder.user_tape(Asset::Ada);
        assert_eq!(tape.iter().map(|t| t.timestamp).collect::<Vec<_>>(), vec![5, 4, 3]);
    }
}
