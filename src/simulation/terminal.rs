// Terminal orchestrator
// Owns every engine and exposes the operation set: tick, trade, unlock, select, quests, clicker

use crate::config::SimConfig;
use crate::core::assets::Asset;
use crate::core::candles::CandleHistory;
use crate::core::ledger::{Ledger, Settlement};
use crate::core::market_events::{EventModulator, MarketEvent};
use crate::core::price_engine::{Modulation, PriceEngine, PriceTick};
use crate::core::rng::RandomSource;
use crate::db::snapshot::PersistedState;
use crate::error::{TerminalError, TerminalResult};
use crate::progression::idle::{IdleIncome, Upgrade};
use crate::progression::quests::{ClaimOutcome, Quest, QuestBoard, QuestKind, QuestPhase};
use crate::progression::rewards::{request_reward, AdOutcome, RewardedVideo};
use crate::simulation::order_book::{BookView, SyntheticOrderBook};
use crate::simulation::trade_tape::TradeRecorder;
use crate::types::{Direction, Side, Trade};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub const SUPPORTED_LANGUAGES: [&str; 2] = ["ru", "en"];

/// Statistics tracked by the terminal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerminalStats {
    pub ticks: u64,
    pub user_trades: u64,
    pub rejected_orders: u64,
    pub market_prints: u64,
    pub events_started: u64,
    pub rewards_credited: f64,
    pub clicks: u64,
}

/// What happened during one price tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub now: i64,
    pub prices: Vec<PriceTick>,
    pub event_ended: Option<MarketEvent>,
    pub market_prints: usize,
}

/// Result of a successful user trade
#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    pub trade: Trade,
    pub settlement: Settlement,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnlockOutcome {
    Unlocked { cash_balance: f64 },
    AlreadyUnlocked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeReceipt {
    pub upgrade: Upgrade,
    pub level: u32,
    pub cost: f64,
    pub click_value: f64,
    pub passive_income: f64,
    pub cash_balance: f64,
}

pub struct Terminal {
    config: SimConfig,
    engine: PriceEngine,
    events: EventModulator,
    candles: CandleHistory,
    ledger: Ledger,
    tapes: TradeRecorder,
    quests: QuestBoard,
    idle: IdleIncome,
    purchased: Vec<Asset>,
    favorites: Vec<Asset>,
    selected: Asset,
    language: String,
    rng: Box<dyn RandomSource + Send>,
    rewards: Option<Box<dyn RewardedVideo>>,
    stats: TerminalStats,
    dirty: bool,
}

impl Terminal {
    /// Fresh terminal with the configured starting account
    pub fn new(config: SimConfig, rng: Box<dyn RandomSource + Send>, now: i64) -> Self {
        let state = PersistedState::defaults(&config);
        Self::restore(config, state, rng, now)
    }

    /// Rebuild a terminal from a persisted snapshot. Every field is
    /// sanitised; nothing here can fail.
    pub fn restore(
        config: SimConfig,
        state: PersistedState,
        mut rng: Box<dyn RandomSource + Send>,
        now: i64,
    ) -> Self {
        let mut engine = PriceEngine::new(config.market.price_floor);
        engine.seed_stats(rng.as_mut());
        engine.restore(&state.market_prices, &state.market_stats);

        let ledger = Ledger::with_holdings(state.portfolio.cash_balance(), state.portfolio.holdings().clone());

        let mut tapes = TradeRecorder::new(config.market.market_tape_len, config.market.user_tape_len);
        tapes.restore_user(state.user_trades);

        let mut idle = IdleIncome::new(config.idle.base_click_value);
        idle.restore(state.upgrades, Some(state.click_value), Some(state.passive_income));

        let mut purchased: Vec<Asset> = Vec::new();
        for asset in state.purchased_assets {
            if !purchased.contains(&asset) {
                purchased.push(asset);
            }
        }
        if purchased.is_empty() {
            purchased.push(Asset::Doge);
        }

        let mut favorites: Vec<Asset> = Vec::new();
        for asset in state.favorites {
            if !favorites.contains(&asset) {
                favorites.push(asset);
            }
        }

        let selected = if purchased.contains(&state.selected_asset) {
            state.selected_asset
        } else {
            purchased[0]
        };

        let language = if SUPPORTED_LANGUAGES.contains(&state.language.as_str()) {
            state.language
        } else {
            config.account.language.clone()
        };

        let mut quests = QuestBoard::new(&config.quests);
        if state.quests.is_empty() {
            quests.regenerate(purchased.len(), now, rng.as_mut());
        } else {
            quests.restore(state.quests, state.quest_cooldown_end, now);
        }

        let mut candles = CandleHistory::new(selected, config.market.candle_window, config.market.wick_factor);
        candles.rebuild(
            selected,
            &mut engine,
            config.market.backfill_points,
            now,
            config.market.tick_interval_ms as i64,
            rng.as_mut(),
        );

        Self {
            events: EventModulator::new(&config.events),
            config,
            engine,
            candles,
            ledger,
            tapes,
            quests,
            idle,
            purchased,
            favorites,
            selected,
            language,
            rng,
            rewards: None,
            stats: TerminalStats::default(),
            dirty: false,
        }
    }

    /// Capture everything that survives a restart
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            portfolio: self.ledger.clone(),
            upgrades: self.idle.levels().clone(),
            quests: self.quests.quests().to_vec(),
            quest_cooldown_end: self.quests.cooldown_until(),
            click_value: self.idle.click_value(),
            passive_income: self.idle.passive_income(),
            language: self.language.clone(),
            purchased_assets: self.purchased.clone(),
            favorites: self.favorites.clone(),
            user_trades: self.tapes.user_history(),
            market_prices: self.engine.prices().clone(),
            market_stats: self.engine.stats().clone(),
            selected_asset: self.selected,
        }
    }

    pub fn set_reward_provider(&mut self, provider: Box<dyn RewardedVideo>) {
        self.rewards = Some(provider);
    }

    // ---------------------------------------------------------------------
    // Timer handlers
    // ---------------------------------------------------------------------

    /// Price cadence: revert an expired event, advance every asset, extend
    /// the focused chart and print synthetic market trades
    pub fn tick(&mut self, now: i64) -> TickReport {
        let event_ended = self.events.expire(now);

        let modulation = Modulation {
            trend: self.events.trend(),
            volatility_multiplier: self.events.volatility_multiplier(),
        };
        let prices = self.engine.tick(self.selected, modulation, self.rng.as_mut());
        let floor = self.engine.floor();

        let mut market_prints = 0;
        for tick in &prices {
            if tick.asset == self.selected {
                self.candles.on_tick(tick, now, floor);
                if self.config.logging.enable_tick_logging {
                    debug!("💰 {} {:.6} -> {:.6}", tick.asset, tick.old_price, tick.new_price);
                }
            }
            if self
                .tapes
                .maybe_print(
                    tick.asset,
                    tick.new_price,
                    now,
                    self.config.market.market_trade_chance,
                    floor,
                    self.rng.as_mut(),
                )
                .is_some()
            {
                market_prints += 1;
            }
        }

        self.stats.ticks += 1;
        self.stats.market_prints += market_prints as u64;
        TickReport { now, prices, event_ended, market_prints }
    }

    /// Event cadence: maybe start a market-wide event on an unlocked asset
    pub fn roll_event(&mut self, now: i64) -> Option<MarketEvent> {
        let event = self.events.roll(now, &self.purchased, self.rng.as_mut());
        if event.is_some() {
            self.stats.events_started += 1;
        }
        event
    }

    /// Income cadence: credit one slice of passive income
    pub fn accrue_income(&mut self) -> f64 {
        let per_second = 1_000.0 / self.config.idle.income_interval_ms.max(1) as f64;
        let amount = self.idle.income_per_tick(per_second);
        if amount > 0.0 {
            self.ledger.credit_reward(amount);
            self.dirty = true;
        }
        amount
    }

    /// Cooldown cadence: regenerate the quest set once the deadline passes
    pub fn cooldown_tick(&mut self, now: i64) -> bool {
        let regenerated = self.quests.on_cooldown_tick(now, self.purchased.len(), self.rng.as_mut());
        if regenerated {
            self.dirty = true;
        }
        regenerated
    }

    // ---------------------------------------------------------------------
    // Trading
    // ---------------------------------------------------------------------

    pub fn buy(&mut self, asset: Asset, amount: f64, price: f64, now: i64) -> TerminalResult<TradeReceipt> {
        if !self.purchased.contains(&asset) {
            self.stats.rejected_orders += 1;
            return Err(TerminalError::AssetLocked(asset));
        }
        let settlement = self.ledger.buy(asset, amount, price).map_err(|e| {
            self.stats.rejected_orders += 1;
            warn!("❌ Buy rejected: {}", e);
            e
        })?;

        let trade = self.tapes.record_user(asset, Side::Buy, amount, price, now);
        self.quests.record_progress(QuestKind::BuyVolume, settlement.volume);
        self.quests.record_progress(QuestKind::TradesCount, 1.0);
        self.stats.user_trades += 1;
        self.dirty = true;

        info!("🟢 BUY {} {} @ ${} | cash ${:.2}", amount, asset, price, settlement.cash_balance);
        Ok(TradeReceipt { trade, settlement })
    }

    pub fn sell(&mut self, asset: Asset, amount: f64, price: f64, now: i64) -> TerminalResult<TradeReceipt> {
        let settlement = self.ledger.sell(asset, amount, price).map_err(|e| {
            self.stats.rejected_orders += 1;
            warn!("❌ Sell rejected: {}", e);
            e
        })?;

        let trade = self.tapes.record_user(asset, Side::Sell, amount, price, now);
        self.quests.record_progress(QuestKind::SellVolume, settlement.volume);
        self.quests.record_progress(QuestKind::TradesCount, 1.0);
        self.stats.user_trades += 1;
        self.dirty = true;

        info!("🔴 SELL {} {} @ ${} | cash ${:.2}", amount, asset, price, settlement.cash_balance);
        Ok(TradeReceipt { trade, settlement })
    }

    /// Buy at the asset's current simulated price
    pub fn market_buy(&mut self, asset: Asset, amount: f64, now: i64) -> TerminalResult<TradeReceipt> {
        let price = self.engine.price(asset);
        self.buy(asset, amount, price, now)
    }

    /// Sell at the asset's current simulated price
    pub fn market_sell(&mut self, asset: Asset, amount: f64, now: i64) -> TerminalResult<TradeReceipt> {
        let price = self.engine.price(asset);
        self.sell(asset, amount, price, now)
    }

    // ---------------------------------------------------------------------
    // Catalogue
    // ---------------------------------------------------------------------

    /// Pay the unlock cost once; a second call is a no-op that charges nothing
    pub fn unlock_asset(&mut self, asset: Asset) -> TerminalResult<UnlockOutcome> {
        if self.purchased.contains(&asset) {
            return Ok(UnlockOutcome::AlreadyUnlocked);
        }
        let cash_balance = self.ledger.debit(asset.spec().unlock_cost)?;
        self.purchased.push(asset);
        self.dirty = true;
        info!("🔓 Unlocked {} for ${:.0}", asset, asset.spec().unlock_cost);
        Ok(UnlockOutcome::Unlocked { cash_balance })
    }

    /// Focus a purchased asset. The chart window is discarded and rebuilt
    /// from the asset's latest price.
    pub fn select_asset(&mut self, asset: Asset, now: i64) -> TerminalResult<u64> {
        if !self.purchased.contains(&asset) {
            return Err(TerminalError::AssetLocked(asset));
        }
        self.selected = asset;
        self.candles.rebuild(
            asset,
            &mut self.engine,
            self.config.market.backfill_points,
            now,
            self.config.market.tick_interval_ms as i64,
            self.rng.as_mut(),
        );
        self.dirty = true;
        info!("🎯 Focused {}", asset);
        Ok(self.candles.generation())
    }

    /// Returns true when the asset is now a favorite
    pub fn toggle_favorite(&mut self, asset: Asset) -> bool {
        self.dirty = true;
        if let Some(pos) = self.favorites.iter().position(|a| *a == asset) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(asset);
            true
        }
    }

    pub fn set_language(&mut self, code: &str) -> bool {
        if SUPPORTED_LANGUAGES.contains(&code) {
            self.language = code.to_string();
            self.dirty = true;
            true
        } else {
            false
        }
    }

    // ---------------------------------------------------------------------
    // Quests
    // ---------------------------------------------------------------------

    pub fn claim_quest(&mut self, id: &str, now: i64) -> TerminalResult<ClaimOutcome> {
        let outcome = self.quests.claim(id, now)?;
        if let ClaimOutcome::Claimed { reward, .. } = outcome {
            self.ledger.credit_reward(reward);
            self.stats.rewards_credited += reward;
            self.dirty = true;
        }
        Ok(outcome)
    }

    /// Ad-assisted skip of a single quest. Closes it at its target with no
    /// reward; skipping the last open quest starts the cooldown.
    pub fn skip_quest(&mut self, id: &str, now: i64) -> TerminalResult<AdOutcome> {
        if self.quests.quest(id).is_none() {
            return Err(TerminalError::QuestNotFound(id.to_string()));
        }
        let outcome = request_reward(self.rewards.as_deref_mut());
        match &outcome {
            AdOutcome::Rewarded => {
                self.quests.complete_quest(id, now)?;
                self.dirty = true;
            }
            AdOutcome::Failed(reason) => warn!("📺 Rewarded video failed: {}", reason),
        }
        Ok(outcome)
    }

    /// Mark every open quest claimed without reward
    pub fn forfeit_quests(&mut self, now: i64) -> usize {
        let count = self.quests.forfeit_all(now);
        if count > 0 {
            self.dirty = true;
        }
        count
    }

    /// Ad-assisted early end of the cooldown
    pub fn skip_cooldown(&mut self, now: i64) -> AdOutcome {
        if self.quests.cooldown_until().is_none() {
            return AdOutcome::Failed("no cooldown pending".to_string());
        }
        let outcome = request_reward(self.rewards.as_deref_mut());
        match &outcome {
            AdOutcome::Rewarded => {
                self.quests.skip_cooldown(self.purchased.len(), now, self.rng.as_mut());
                self.dirty = true;
            }
            AdOutcome::Failed(reason) => warn!("📺 Rewarded video failed: {}", reason),
        }
        outcome
    }

    // ---------------------------------------------------------------------
    // Clicker
    // ---------------------------------------------------------------------

    /// Manual collect: credit the click value and count one click
    pub fn collect_click(&mut self) -> f64 {
        let value = self.idle.click_value();
        self.ledger.credit_reward(value);
        self.quests.record_progress(QuestKind::Clicks, 1.0);
        self.stats.clicks += 1;
        self.dirty = true;
        value
    }

    pub fn buy_upgrade(&mut self, upgrade: Upgrade) -> TerminalResult<UpgradeReceipt> {
        let cost = self.idle.next_cost(upgrade);
        let cash_balance = self.ledger.debit(cost)?;
        let level = self.idle.apply_upgrade(upgrade);
        self.dirty = true;
        info!("⚙️  {} upgraded to level {} for ${:.0}", upgrade.spec().name, level, cost);
        Ok(UpgradeReceipt {
            upgrade,
            level,
            cost,
            click_value: self.idle.click_value(),
            passive_income: self.idle.passive_income(),
            cash_balance,
        })
    }

    /// Rewarded-video cash bonus scaled by the number of owned assets.
    /// Returns the amount credited (zero when the video failed).
    pub fn claim_ad_bonus(&mut self) -> (AdOutcome, f64) {
        let outcome = request_reward(self.rewards.as_deref_mut());
        let amount = match outcome {
            AdOutcome::Rewarded => {
                let amount = self.config.idle.ad_reward_per_asset * self.purchased.len() as f64;
                self.ledger.credit_reward(amount);
                self.stats.rewards_credited += amount;
                self.dirty = true;
                amount
            }
            AdOutcome::Failed(ref reason) => {
                warn!("📺 Rewarded video failed: {}", reason);
                0.0
            }
        };
        (outcome, amount)
    }

    // ---------------------------------------------------------------------
    // Read side
    // ---------------------------------------------------------------------

    /// Volatility as the order book sees it; the focused asset carries the
    /// event multiplier
    pub fn effective_volatility(&self, asset: Asset) -> f64 {
        let base = asset.spec().volatility;
        if asset == self.selected {
            base * self.events.volatility_multiplier()
        } else {
            base
        }
    }

    pub fn order_book(&mut self, asset: Asset, view: BookView) -> SyntheticOrderBook {
        let price = self.engine.price(asset);
        let volatility = self.effective_volatility(asset);
        SyntheticOrderBook::generate(
            asset,
            price,
            volatility,
            self.config.market.order_book_depth,
            view,
            self.engine.floor(),
            self.rng.as_mut(),
        )
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn price(&self, asset: Asset) -> f64 {
        self.engine.price(asset)
    }

    pub fn prices(&self) -> &BTreeMap<Asset, f64> {
        self.engine.prices()
    }

    pub fn change_pct(&self, asset: Asset) -> f64 {
        self.engine.change_pct(asset)
    }

    pub fn candles(&self) -> &CandleHistory {
        &self.candles
    }

    pub fn direction(&self) -> Direction {
        self.candles.direction()
    }

    pub fn active_event(&self) -> Option<&MarketEvent> {
        self.events.active()
    }

    pub fn events_mut(&mut self) -> &mut EventModulator {
        &mut self.events
    }

    pub fn market_tape(&self, asset: Asset) -> Vec<Trade> {
        self.tapes.market_tape(asset)
    }

    pub fn user_tape(&self, asset: Asset) -> Vec<Trade> {
        self.tapes.user_tape(asset)
    }

    pub fn quests(&self) -> &[Quest] {
        self.quests.quests()
    }

    pub fn quest_phase(&self, now: i64) -> QuestPhase {
        self.quests.phase(now)
    }

    pub fn quest_cooldown_until(&self) -> Option<i64> {
        self.quests.cooldown_until()
    }

    pub fn idle(&self) -> &IdleIncome {
        &self.idle
    }

    pub fn purchased(&self) -> &[Asset] {
        &self.purchased
    }

    pub fn favorites(&self) -> &[Asset] {
        &self.favorites
    }

    pub fn selected(&self) -> Asset {
        self.selected
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn stats(&self) -> &TerminalStats {
        &self.stats
    }

    pub fn net_worth(&self) -> f64 {
        self.ledger.net_worth(self.engine.prices())
    }

    /// True when state changed since the last `mark_saved`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::market_events::EventKind;
    use crate::core::rng::StdRandom;
    use crate::progression::rewards::{AlwaysFails, AlwaysRewarded};

    fn terminal() -> Terminal {
        Terminal::new(SimConfig::default(), Box::new(StdRandom::seeded(21)), 0)
    }

    #[test]
    fn test_fresh_terminal_defaults() {
        let t = terminal();
        assert_eq!(t.ledger().cash_balance(), 1_000.0);
        assert_eq!(t.ledger().holding(Asset::Doge), 1_000.0);
        assert_eq!(t.purchased(), &[Asset::Doge]);
        assert_eq!(t.selected(), Asset::Doge);
        assert_eq!(t.quests().len(), 4);
        assert_eq!(t.candles().len(), 150);
        assert_eq!(t.language(), "ru");
    }

    #[test]
    fn test_trade_reports_quest_progress() {
        let mut t = terminal();
        t.buy(Asset::Doge, 100.0, 0.5, 1_000).unwrap();
        t.sell(Asset::Doge, 10.0, 0.5, 2_000).unwrap();

        let progress = |kind: QuestKind| t.quests().iter().find(|q| q.kind == kind).unwrap().current;
        assert_eq!(progress(QuestKind::BuyVolume), 50.0);
        assert_eq!(progress(QuestKind::SellVolume), 5.0);
        assert_eq!(progress(QuestKind::TradesCount), 2.0);
        assert_eq!(t.user_tape(Asset::Doge).len(), 2);
        assert_eq!(t.user_tape(Asset::Doge)[0].side, Side::Sell);
    }

    #[test]
    fn test_buy_locked_asset() {
        let mut t = terminal();
        assert!(matches!(t.buy(Asset::Btc, 0.001, 98_000.0, 0), Err(TerminalError::AssetLocked(Asset::Btc))));
        assert_eq!(t.stats().rejected_orders, 1);
    }

    #[test]
    fn test_unlock_idempotent() {
        let mut t = terminal();
        t.ledger.credit_reward(5_000.0);
        assert_eq!(t.unlock_asset(Asset::Ltc).unwrap(), UnlockOutcome::Unlocked { cash_balance: 1_000.0 });
        assert_eq!(t.unlock_asset(Asset::Ltc).unwrap(), UnlockOutcome::AlreadyUnlocked);
        assert_eq!(t.ledger().cash_balance(), 1_000.0);
        assert_eq!(t.purchased().iter().filter(|a| **a == Asset::Ltc).count(), 1);
    }

    #[test]
    fn test_select_requires_unlock() {
        let mut t = terminal();
        assert!(t.select_asset(Asset::Eth, 0).is_err());
        assert_eq!(t.selected(), Asset::Doge);
    }

    #[test]
    fn test_tick_extends_chart() {
        let mut t = terminal();
        for i in 1..=5 {
            let report = t.tick(i * 1_000);
            assert_eq!(report.prices.len(), 9);
        }
        assert_eq!(t.candles().len(), 150);
        assert_eq!(t.candles().last().unwrap().timestamp, 5_000);
        assert_eq!(t.stats().ticks, 5);
    }

    #[test]
    fn test_event_reverts_on_tick() {
        let mut t = terminal();
        t.events_mut().trigger(EventKind::Crash, Asset::Doge, 0);
        assert_eq!(t.effective_volatility(Asset::Doge), 0.005 * 6.0);
        assert!(t.tick(4_000).event_ended.is_none());
        assert!(t.tick(8_000).event_ended.is_some());
        assert!(t.active_event().is_none());
    }

    #[test]
    fn test_collect_click_and_upgrade() {
        let mut t = terminal();
        assert_eq!(t.collect_click(), 10.0);
        assert_eq!(t.ledger().cash_balance(), 1_010.0);
        let clicks = t.quests().iter().find(|q| q.kind == QuestKind::Clicks).unwrap().current;
        assert_eq!(clicks, 1.0);

        let receipt = t.buy_upgrade(Upgrade::Bot).unwrap();
        assert_eq!(receipt.cost, 80.0);
        assert_eq!(receipt.cash_balance, 930.0);
        assert_eq!(t.accrue_income(), 0.2);
    }

    #[test]
    fn test_upgrade_insufficient_funds() {
        let mut t = terminal();
        assert!(matches!(t.buy_upgrade(Upgrade::Quantum), Err(TerminalError::InsufficientFunds { .. })));
        assert_eq!(t.idle().level(Upgrade::Quantum), 0);
    }

    #[test]
    fn test_ad_bonus_with_and_without_provider() {
        let mut t = terminal();
        assert_eq!(t.claim_ad_bonus(), (AdOutcome::Rewarded, 5_000.0));

        t.set_reward_provider(Box::new(AlwaysFails("offline".to_string())));
        let (outcome, amount) = t.claim_ad_bonus();
        assert!(matches!(outcome, AdOutcome::Failed(_)));
        assert_eq!(amount, 0.0);
        assert_eq!(t.ledger().cash_balance(), 6_000.0);
    }

    #[test]
    fn test_skipped_quest_pays_nothing() {
        let mut t = terminal();
        t.set_reward_provider(Box::new(AlwaysRewarded));
        let quest = t.quests()[0].clone();
        assert_eq!(t.skip_quest(&quest.id, 0).unwrap(), AdOutcome::Rewarded);
        let skipped = &t.quests()[0];
        assert!(skipped.claimed);
        assert_eq!(skipped.current, skipped.target);

        assert_eq!(t.claim_quest(&quest.id, 0).unwrap(), ClaimOutcome::AlreadyClaimed);
        assert_eq!(t.ledger().cash_balance(), 1_000.0);
        assert_eq!(t.stats().rewards_credited, 0.0);
    }

    #[test]
    fn test_failed_video_leaves_quest_open() {
        let mut t = terminal();
        t.set_reward_provider(Box::new(AlwaysFails("offline".to_string())));
        let id = t.quests()[0].id.clone();
        assert!(matches!(t.skip_quest(&id, 0).unwrap(), AdOutcome::Failed(_)));
        assert!(!t.quests()[0].claimed);
    }

    #[test]
    fn test_snapshot_restore_keeps_account() {
        let mut t = terminal();
        t.buy(Asset::Doge, 20.0, 0.4, 0).unwrap();
        t.toggle_favorite(Asset::Btc);
        let snapshot = t.snapshot();

        let restored = Terminal::restore(SimConfig::default(), snapshot.clone(), Box::new(StdRandom::seeded(1)), 10);
        assert_eq!(restored.ledger(), t.ledger());
        assert_eq!(restored.quests(), t.quests());
        assert_eq!(restored.favorites(), &[Asset::Doge, Asset::Btc]);
        assert_eq!(restored.user_tape(Asset::Doge).len(), 1);
    }
}
