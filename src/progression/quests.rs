// Quest engine
// Four randomly generated objectives per set, claimed once each, then a regeneration cooldown

use crate::config::QuestConfig;
use crate::core::rng::RandomSource;
use crate::error::{TerminalError, TerminalResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    Clicks,
    SellVolume,
    BuyVolume,
    TradesCount,
}

impl QuestKind {
    pub const ALL: [QuestKind; 4] = [
        QuestKind::Clicks,
        QuestKind::SellVolume,
        QuestKind::BuyVolume,
        QuestKind::TradesCount,
    ];

    fn is_volume(self) -> bool {
        matches!(self, QuestKind::SellVolume | QuestKind::BuyVolume)
    }

    /// Unscaled target drawn for a fresh quest
    fn base_target(self, rng: &mut dyn RandomSource) -> f64 {
        match self {
            QuestKind::SellVolume | QuestKind::BuyVolume => (rng.unit() * 2_000.0).floor() + 500.0,
            QuestKind::Clicks => (rng.unit() * 1_000.0).floor() + 300.0,
            QuestKind::TradesCount => (rng.unit() * 10.0).floor() + 5.0,
        }
    }

    fn reward_rate(self) -> f64 {
        match self {
            QuestKind::SellVolume | QuestKind::BuyVolume => 0.3,
            QuestKind::Clicks => 1.5,
            QuestKind::TradesCount => 50.0,
        }
    }

    fn titles(self) -> &'static [&'static str] {
        match self {
            QuestKind::Clicks => &["Mining Marathon", "Click Storm", "Hash Grinder"],
            QuestKind::SellVolume => &["Take Profits", "Distribution Phase", "Paper Hands"],
            QuestKind::BuyVolume => &["Buy The Dip", "Accumulation Phase", "Diamond Hands"],
            QuestKind::TradesCount => &["Day Trader", "Scalper", "Market Regular"],
        }
    }

    fn describe(self, target: f64) -> String {
        match self {
            QuestKind::Clicks => format!("Click {} times", target),
            QuestKind::TradesCount => format!("Complete {} trades", target),
            QuestKind::SellVolume => format!("Sell assets for ${}", target),
            QuestKind::BuyVolume => format!("Buy assets for ${}", target),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target: f64,
    pub current: f64,
    pub reward: f64,
    pub claimed: bool,
    pub kind: QuestKind,
}

impl Quest {
    pub fn is_complete(&self) -> bool {
        self.current >= self.target
    }

    pub fn is_claimable(&self) -> bool {
        self.is_complete() && !self.claimed
    }
}

/// Lifecycle of the active quest set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestPhase {
    /// At least one quest still unclaimed
    Active,
    /// Every quest claimed, cooldown not yet armed
    AllClaimed,
    /// Waiting for a fresh set
    Regenerating { remaining_ms: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClaimOutcome {
    Claimed { reward: f64, cooldown_started: bool },
    NotReady,
    AlreadyClaimed,
}

/// Build one quest per kind; targets scale with the number of purchased assets
pub fn generate_quests(
    purchased_assets: usize,
    difficulty_step: f64,
    now: i64,
    rng: &mut dyn RandomSource,
) -> Vec<Quest> {
    let difficulty = 1.0 + purchased_assets as f64 * difficulty_step;

    QuestKind::ALL
        .into_iter()
        .enumerate()
        .map(|(i, kind)| {
            let target = (kind.base_target(rng) * difficulty).floor();
            let reward = (target * kind.reward_rate()).floor();
            let titles = kind.titles();
            let title = titles[rng.index(titles.len())].to_string();
            Quest {
                id: format!("rq-{}-{}", now, i),
                title,
                description: kind.describe(target),
                target,
                current: 0.0,
                reward,
                claimed: false,
                kind,
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct QuestBoard {
    quests: Vec<Quest>,
    cooldown_until: Option<i64>,
    cooldown_ms: i64,
    difficulty_step: f64,
}

impl QuestBoard {
    pub fn new(config: &QuestConfig) -> Self {
        Self {
            quests: Vec::new(),
            cooldown_until: None,
            cooldown_ms: config.cooldown_ms(),
            difficulty_step: config.difficulty_step,
        }
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub fn cooldown_until(&self) -> Option<i64> {
        self.cooldown_until
    }

    pub fn phase(&self, now: i64) -> QuestPhase {
        match self.cooldown_until {
            Some(deadline) => QuestPhase::Regenerating { remaining_ms: (deadline - now).max(0) },
            None if self.all_claimed() => QuestPhase::AllClaimed,
            None => QuestPhase::Active,
        }
    }

    fn all_claimed(&self) -> bool {
        !self.quests.is_empty() && self.quests.iter().all(|q| q.claimed)
    }

    /// Replace the set with a freshly generated one and clear any cooldown
    pub fn regenerate(&mut self, purchased_assets: usize, now: i64, rng: &mut dyn RandomSource) {
        self.quests = generate_quests(purchased_assets, self.difficulty_step, now, rng);
        self.cooldown_until = None;
        info!("📜 New quest set generated ({} quests, {} assets owned)", self.quests.len(), purchased_assets);
    }

    /// Load a saved set. Progress is clamped back into [0, target].
    pub fn restore(&mut self, mut quests: Vec<Quest>, cooldown_until: Option<i64>, now: i64) {
        for quest in &mut quests {
            if !quest.target.is_finite() || quest.target < 0.0 {
                quest.target = 0.0;
            }
            quest.current = if quest.current.is_finite() {
                quest.current.clamp(0.0, quest.target)
            } else {
                0.0
            };
        }
        self.quests = quests;
        self.cooldown_until = cooldown_until;
        self.arm_cooldown(now);
    }

    /// Add progress to every unclaimed quest of `kind`. Ignored while the
    /// cooldown is pending.
    pub fn record_progress(&mut self, kind: QuestKind, amount: f64) -> bool {
        if self.cooldown_until.is_some() || !amount.is_finite() || amount <= 0.0 {
            return false;
        }
        let mut touched = false;
        for quest in self.quests.iter_mut().filter(|q| q.kind == kind && !q.claimed) {
            let next = (quest.current + amount).min(quest.target);
            if next > quest.current {
                quest.current = next;
                touched = true;
            }
        }
        if touched {
            debug!("📈 Quest progress {:?} +{}", kind, amount);
        }
        touched
    }

    /// Claim a completed quest. The reward is returned exactly once; the
    /// caller credits it to the ledger.
    pub fn claim(&mut self, id: &str, now: i64) -> TerminalResult<ClaimOutcome> {
        let quest = self
            .quests
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| TerminalError::QuestNotFound(id.to_string()))?;

        if quest.claimed {
            return Ok(ClaimOutcome::AlreadyClaimed);
        }
        if !quest.is_complete() {
            return Ok(ClaimOutcome::NotReady);
        }

        quest.claimed = true;
        let reward = quest.reward;
        info!("🏆 Quest '{}' claimed: +${:.0}", quest.title, reward);

        let cooldown_started = self.arm_cooldown(now);
        Ok(ClaimOutcome::Claimed { reward, cooldown_started })
    }

    /// Ad-assisted shortcut: close a quest at its target without paying the
    /// reward. May start the cooldown like a normal claim.
    pub fn complete_quest(&mut self, id: &str, now: i64) -> TerminalResult<bool> {
        let quest = self
            .quests
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| TerminalError::QuestNotFound(id.to_string()))?;
        if quest.claimed {
            return Ok(false);
        }
        quest.current = quest.target;
        quest.claimed = true;
        info!("⏩ Quest '{}' skipped, no reward", quest.title);
        self.arm_cooldown(now);
        Ok(true)
    }

    /// Give up on the remaining quests without reward; starts the cooldown
    pub fn forfeit_all(&mut self, now: i64) -> usize {
        let mut forfeited = 0;
        for quest in self.quests.iter_mut().filter(|q| !q.claimed) {
            quest.claimed = true;
            forfeited += 1;
        }
        self.arm_cooldown(now);
        forfeited
    }

    /// Start the cooldown the moment every quest is claimed. Only arms once.
    fn arm_cooldown(&mut self, now: i64) -> bool {
        if self.cooldown_until.is_none() && self.all_claimed() {
            let deadline = now.saturating_add(self.cooldown_ms);
            self.cooldown_until = Some(deadline);
            info!("⏳ All quests claimed, new set in {}s", self.cooldown_ms / 1_000);
            true
        } else {
            false
        }
    }

    /// Cooldown clock. Regenerates once the deadline has passed.
    pub fn on_cooldown_tick(&mut self, now: i64, purchased_assets: usize, rng: &mut dyn RandomSource) -> bool {
        match self.cooldown_until {
            Some(deadline) if now >= deadline => {
                self.regenerate(purchased_assets, now, rng);
                true
            }
            _ => false,
        }
    }

    /// Finish the cooldown early (rewarded action)
    pub fn skip_cooldown(&mut self, purchased_assets: usize, now: i64, rng: &mut dyn RandomSource) -> bool {
        if self.cooldown_until.is_none() {
            return false;
        }
        self.regenerate(purchased_assets, now, rng);
        true
    }
}
