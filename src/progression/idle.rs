// Idle income engine
// Upgrade levels drive the click value and the passive income rate

use crate::error::TerminalError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Geometric cost growth per level
const COST_GROWTH: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Upgrade {
    Cpu,
    Bot,
    Server,
    Quantum,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeSpec {
    pub name: &'static str,
    pub base_cost: f64,
    pub click_boost: f64,
    pub passive_boost: f64,
}

impl Upgrade {
    pub const ALL: [Upgrade; 4] = [Upgrade::Cpu, Upgrade::Bot, Upgrade::Server, Upgrade::Quantum];

    pub fn spec(self) -> UpgradeSpec {
        match self {
            Upgrade::Cpu => UpgradeSpec { name: "CPU Overclocking", base_cost: 15.0, click_boost: 0.5, passive_boost: 0.0 },
            Upgrade::Bot => UpgradeSpec { name: "Auto-Mining Bot", base_cost: 80.0, click_boost: 0.0, passive_boost: 2.0 },
            Upgrade::Server => UpgradeSpec { name: "Server Rack", base_cost: 500.0, click_boost: 0.2, passive_boost: 12.0 },
            Upgrade::Quantum => UpgradeSpec { name: "Quantum Node", base_cost: 3_500.0, click_boost: 10.0, passive_boost: 150.0 },
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Upgrade::Cpu => "cpu",
            Upgrade::Bot => "bot",
            Upgrade::Server => "server",
            Upgrade::Quantum => "quantum",
        }
    }

    /// Price of the next level
    pub fn cost_at(self, level: u32) -> f64 {
        (self.spec().base_cost * COST_GROWTH.powi(level as i32)).floor()
    }
}

impl fmt::Display for Upgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Upgrade {
    type Err = TerminalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Upgrade::ALL
            .into_iter()
            .find(|u| u.id() == lower)
            .ok_or_else(|| TerminalError::UnknownUpgrade(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdleIncome {
    levels: BTreeMap<Upgrade, u32>,
    click_value: f64,
    passive_income: f64,
}

impl IdleIncome {
    pub fn new(base_click_value: f64) -> Self {
        Self {
            levels: Upgrade::ALL.into_iter().map(|u| (u, 0)).collect(),
            click_value: base_click_value,
            passive_income: 0.0,
        }
    }

    /// Load saved state; levels only ever move up, so unknown or missing
    /// entries stay at zero
    pub fn restore(&mut self, levels: BTreeMap<Upgrade, u32>, click_value: Option<f64>, passive_income: Option<f64>) {
        for (upgrade, level) in levels {
            self.levels.insert(upgrade, level);
        }
        if let Some(v) = click_value.filter(|v| v.is_finite() && *v >= 0.0) {
            self.click_value = v;
        }
        if let Some(v) = passive_income.filter(|v| v.is_finite() && *v >= 0.0) {
            self.passive_income = v;
        }
    }

    pub fn level(&self, upgrade: Upgrade) -> u32 {
        self.levels.get(&upgrade).copied().unwrap_or(0)
    }

    pub fn levels(&self) -> &BTreeMap<Upgrade, u32> {
        &self.levels
    }

    pub fn click_value(&self) -> f64 {
        self.click_value
    }

    /// Income per second
    pub fn passive_income(&self) -> f64 {
        self.passive_income
    }

    pub fn next_cost(&self, upgrade: Upgrade) -> f64 {
        upgrade.cost_at(self.level(upgrade))
    }

    /// Apply a purchased level. Payment happens in the ledger first.
    pub fn apply_upgrade(&mut self, upgrade: Upgrade) -> u32 {
        let spec = upgrade.spec();
        let level = self.levels.entry(upgrade).or_insert(0);
        *level += 1;
        self.click_value += spec.click_boost;
        self.passive_income += spec.passive_boost;
        *level
    }

    /// Amount credited per income tick; `ticks_per_second` is 10 at the
    /// standard 100 ms cadence
    pub fn income_per_tick(&self, ticks_per_second: f64) -> f64 {
        if self.passive_income > 0.0 && ticks_per_second > 0.0 {
            self.passive_income / ticks_per_second
        } else {
            0.0
        }
    }
}
