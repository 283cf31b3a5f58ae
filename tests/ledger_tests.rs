// Integration tests for the portfolio ledger and the asset catalogue

mod common;

use common::{funded_terminal, seeded_terminal};
use crypto_terminal_sim::{
    Asset, Ledger, SimConfig, StdRandom, Terminal, TerminalError, UnlockOutcome, Upgrade,
};

fn terminal_with_cash(cash: f64) -> Terminal {
    let mut config = SimConfig::default();
    config.account.starting_cash = cash;
    Terminal::new(config, Box::new(StdRandom::seeded(3)), 0)
}

#[test]
fn test_buy_then_sell_scenario() {
    let mut ledger = Ledger::new(1_000.0);

    let buy = ledger.buy(Asset::Doge, 100.0, 0.5).expect("buy should settle");
    assert_eq!(buy.cash_balance, 950.0);
    assert_eq!(ledger.holding(Asset::Doge), 100.0);

    let sell = ledger.sell(Asset::Doge, 50.0, 0.6).expect("sell should settle");
    assert!((sell.cash_balance - 980.0).abs() < 1e-9);
    assert_eq!(ledger.holding(Asset::Doge), 50.0);
    assert!(ledger.is_consistent());
}

#[test]
fn test_rejections_leave_ledger_untouched() {
    let mut ledger = Ledger::new(100.0);
    let before = ledger.clone();

    assert!(matches!(
        ledger.buy(Asset::Ltc, 1.0, 124.5),
        Err(TerminalError::InsufficientFunds { .. })
    ));
    assert!(matches!(
        ledger.sell(Asset::Doge, 1.0, 0.4),
        Err(TerminalError::InsufficientHolding { asset: Asset::Doge, .. })
    ));
    assert!(matches!(ledger.buy(Asset::Doge, 0.0, 0.4), Err(TerminalError::InvalidAmount(_))));
    assert!(matches!(ledger.buy(Asset::Doge, -5.0, 0.4), Err(TerminalError::InvalidAmount(_))));
    assert!(matches!(ledger.buy(Asset::Doge, 1.0, f64::NAN), Err(TerminalError::InvalidAmount(_))));

    assert_eq!(ledger, before);
}

#[test]
fn test_unlock_requires_cash() {
    let mut poor = terminal_with_cash(4_000.0);
    let err = poor.unlock_asset(Asset::Ltc).unwrap_err();
    assert!(matches!(err, TerminalError::InsufficientFunds { .. }));
    assert!(!poor.purchased().contains(&Asset::Ltc));
    assert_eq!(poor.ledger().cash_balance(), 4_000.0);
}

#[test]
fn test_unlock_charges_once() {
    let mut rich = terminal_with_cash(6_000.0);
    assert_eq!(
        rich.unlock_asset(Asset::Ltc).unwrap(),
        UnlockOutcome::Unlocked { cash_balance: 1_000.0 }
    );
    assert_eq!(rich.unlock_asset(Asset::Ltc).unwrap(), UnlockOutcome::AlreadyUnlocked);

    assert_eq!(rich.ledger().cash_balance(), 1_000.0);
    assert_eq!(rich.purchased().iter().filter(|a| **a == Asset::Ltc).count(), 1);
}

#[test]
fn test_unlocked_asset_is_tradeable() {
    let mut terminal = funded_terminal(8, 2);
    terminal.unlock_asset(Asset::Ltc).unwrap();
    terminal.select_asset(Asset::Ltc, 5_000).unwrap();

    let price = terminal.price(Asset::Ltc);
    let receipt = terminal.market_buy(Asset::Ltc, 2.0, 5_000).unwrap();
    assert_eq!(receipt.settlement.price, price);
    assert_eq!(terminal.ledger().holding(Asset::Ltc), 2.0);

    terminal.market_sell(Asset::Ltc, 2.0, 6_000).unwrap();
    assert_eq!(terminal.ledger().holding(Asset::Ltc), 0.0);
    assert!(!terminal.ledger().holdings().contains_key(&Asset::Ltc));
}

#[test]
fn test_upgrade_costs_grow() {
    let mut terminal = funded_terminal(4, 1);
    let first = terminal.buy_upgrade(Upgrade::Cpu).unwrap();
    let second = terminal.buy_upgrade(Upgrade::Cpu).unwrap();
    assert_eq!(first.cost, 15.0);
    assert_eq!(second.cost, 19.0);
    assert_eq!(second.level, 2);
    assert!((terminal.idle().click_value() - 11.0).abs() < 1e-9);
    assert_eq!(terminal.ledger().cash_balance(), 6_000.0 - 34.0);
}

#[test]
fn test_net_worth_counts_holdings() {
    let terminal = seeded_terminal(2);
    let expected = 1_000.0 + 1_000.0 * terminal.price(Asset::Doge);
    assert!((terminal.net_worth() - expected).abs() < 1e-9);
}
