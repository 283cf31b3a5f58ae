// Portfolio ledger
// Sole owner of cash and holdings; every mutation is checked before it is applied

use crate::core::assets::Asset;
use crate::error::{TerminalError, TerminalResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    cash_balance: f64,
    holdings: BTreeMap<Asset, f64>,
}

/// Balances touched by a successful trade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub asset: Asset,
    pub amount: f64,
    pub price: f64,
    pub volume: f64,
    pub cash_balance: f64,
    pub holding: f64,
}

fn validate_trade(amount: f64, price: f64) -> TerminalResult<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(TerminalError::InvalidAmount(format!("amount must be positive, got {}", amount)));
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(TerminalError::InvalidAmount(format!("price must be positive, got {}", price)));
    }
    let volume = amount * price;
    if !volume.is_finite() {
        return Err(TerminalError::InvalidAmount("trade value overflows".to_string()));
    }
    Ok(volume)
}

impl Ledger {
    pub fn new(cash_balance: f64) -> Self {
        Self {
            cash_balance: cash_balance.max(0.0),
            holdings: BTreeMap::new(),
        }
    }

    pub fn with_holdings(cash_balance: f64, holdings: BTreeMap<Asset, f64>) -> Self {
        let holdings = holdings
            .into_iter()
            .filter(|(_, q)| q.is_finite() && *q > 0.0)
            .collect();
        Self {
            cash_balance: if cash_balance.is_finite() { cash_balance.max(0.0) } else { 0.0 },
            holdings,
        }
    }

    pub fn cash_balance(&self) -> f64 {
        self.cash_balance
    }

    pub fn holding(&self, asset: Asset) -> f64 {
        self.holdings.get(&asset).copied().unwrap_or(0.0)
    }

    pub fn holdings(&self) -> &BTreeMap<Asset, f64> {
        &self.holdings
    }

    /// Cash plus holdings marked at the given prices
    pub fn net_worth(&self, prices: &BTreeMap<Asset, f64>) -> f64 {
        self.cash_balance
            + self
                .holdings
                .iter()
                .map(|(asset, qty)| qty * prices.get(asset).copied().unwrap_or(0.0))
                .sum::<f64>()
    }

    /// Cash and holdings are never negative or non-finite
    pub fn is_consistent(&self) -> bool {
        self.cash_balance.is_finite()
            && self.cash_balance >= 0.0
            && self.holdings.values().all(|q| q.is_finite() && *q >= 0.0)
    }

    pub fn buy(&mut self, asset: Asset, amount: f64, price: f64) -> TerminalResult<Settlement> {
        let cost = validate_trade(amount, price)?;
        if cost > self.cash_balance {
            return Err(TerminalError::InsufficientFunds {
                required: cost,
                available: self.cash_balance,
            });
        }

        self.cash_balance -= cost;
        let holding = self.holdings.entry(asset).or_insert(0.0);
        *holding += amount;
        let holding = *holding;

        debug!("🟢 Ledger buy {} {} @ {} (cash {:.2})", amount, asset, price, self.cash_balance);
        Ok(Settlement { asset, amount, price, volume: cost, cash_balance: self.cash_balance, holding })
    }

    pub fn sell(&mut self, asset: Asset, amount: f64, price: f64) -> TerminalResult<Settlement> {
        let proceeds = validate_trade(amount, price)?;
        let available = self.holding(asset);
        if amount > available {
            return Err(TerminalError::InsufficientHolding { asset, required: amount, available });
        }

        self.cash_balance += proceeds;
        let remaining = available - amount;
        if remaining > 0.0 {
            self.holdings.insert(asset, remaining);
        } else {
            self.holdings.remove(&asset);
        }

        debug!("🔴 Ledger sell {} {} @ {} (cash {:.2})", amount, asset, price, self.cash_balance);
        Ok(Settlement {
            asset,
            amount,
            price,
            volume: proceeds,
            cash_balance: self.cash_balance,
            holding: remaining.max(0.0),
        })
    }

    /// Spend cash on something that isn't a trade (unlocks, upgrades)
    pub fn debit(&mut self, amount: f64) -> TerminalResult<f64> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(TerminalError::InvalidAmount(format!("debit must be non-negative, got {}", amount)));
        }
        if amount > self.cash_balance {
            return Err(TerminalError::InsufficientFunds {
                required: amount,
                available: self.cash_balance,
            });
        }
        self.cash_balance -= amount;
        Ok(self.cash_balance)
    }

    /// Unconditional additive credit (quest rewards, ad bonus, idle income).
    /// Non-finite or negative amounts are ignored.
    pub fn credit_reward(&mut self, amount: f64) -> f64 {
        if amount.is_finite() && amount > 0.0 {
            self.cash_balance += amount;
        }
        self.cash_balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_then_sell_scenario() {
        let mut ledger = Ledger::new(1_000.0);
        ledger.buy(Asset::Doge, 100.0, 0.5).unwrap();
        assert!((ledger.cash_balance() - 950.0).abs() < 1e-9);
        assert_eq!(ledger.holding(Asset::Doge), 100.0);

        ledger.sell(Asset::Doge, 50.0, 0.6).unwrap();
        assert!((ledger.cash_balance() - 980.0).abs() < 1e-9);
        assert_eq!(ledger.holding(Asset::Doge), 50.0);
    }

    #[test]
    fn test_overspend_is_rejected_untouched() {
        let mut ledger = Ledger::new(100.0);
        let before = ledger.clone();
        let err = ledger.buy(Asset::Ltc, 1.0, 124.5).unwrap_err();
        assert!(matches!(err, TerminalError::InsufficientFunds { .. }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_oversell_is_rejected_untouched() {
        let mut ledger = Ledger::with_holdings(10.0, BTreeMap::from([(Asset::Doge, 5.0)]));
        let before = ledger.clone();
        let err = ledger.sell(Asset::Doge, 5.5, 0.4).unwrap_err();
        assert!(matches!(err, TerminalError::InsufficientHolding { asset: Asset::Doge, .. }));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_invalid_amounts() {
        let mut ledger = Ledger::new(100.0);
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(ledger.buy(Asset::Doge, amount, 0.5), Err(TerminalError::InvalidAmount(_))));
            assert!(matches!(ledger.sell(Asset::Doge, amount, 0.5), Err(TerminalError::InvalidAmount(_))));
        }
        assert_eq!(ledger.cash_balance(), 100.0);
    }

    #[test]
    fn test_selling_everything_clears_holding() {
        let mut ledger = Ledger::with_holdings(0.0, BTreeMap::from([(Asset::Ada, 3.0)]));
        let settlement = ledger.sell(Asset::Ada, 3.0, 1.0).unwrap();
        assert_eq!(settlement.holding, 0.0);
        assert!(ledger.holdings().is_empty());
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_debit_and_credit() {
        let mut ledger = Ledger::new(4_000.0);
        assert!(ledger.debit(5_000.0).is_err());
        assert_eq!(ledger.cash_balance(), 4_000.0);
        ledger.credit_reward(2_000.0);
        assert_eq!(ledger.debit(5_000.0).unwrap(), 1_000.0);
        ledger.credit_reward(-50.0);
        ledger.credit_reward(f64::NAN);
        assert_eq!(ledger.cash_balance(), 1_000.0);
    }

    #[test]
    fn test_net_worth() {
        let ledger = Ledger::with_holdings(100.0, BTreeMap::from([(Asset::Doge, 10.0)]));
        let prices = BTreeMap::from([(Asset::Doge, 0.5)]);
        assert_eq!(ledger.net_worth(&prices), 105.0);
    }
}
