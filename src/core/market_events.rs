// Market-wide event modulator
// Calm <-> Active state machine that biases the price engine

use crate::config::EventConfig;
use crate::core::assets::Asset;
use crate::core::rng::RandomSource;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Whale,
    Elon,
    Crash,
    Pump,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [EventKind::Whale, EventKind::Elon, EventKind::Crash, EventKind::Pump];

    pub fn volatility_multiplier(self) -> f64 {
        match self {
            EventKind::Whale | EventKind::Elon | EventKind::Pump => 4.0,
            EventKind::Crash => 6.0,
        }
    }

    pub fn trend(self) -> f64 {
        match self {
            EventKind::Elon | EventKind::Pump => 0.8,
            EventKind::Crash => -0.8,
            EventKind::Whale => 0.0,
        }
    }

    pub fn headline(self, asset: Asset) -> String {
        match self {
            EventKind::Whale => format!("🐋 Whale alert: massive {} transfer detected", asset),
            EventKind::Elon => format!("🚀 A celebrity just tweeted about {}", asset),
            EventKind::Crash => format!("📉 Panic selling hits {}", asset),
            EventKind::Pump => format!("📈 {} is pumping on heavy volume", asset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub kind: EventKind,
    pub subject: Asset,
    pub headline: String,
    pub started_at: i64,
    pub ends_at: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventState {
    Calm,
    Active(MarketEvent),
}

#[derive(Debug, Clone)]
pub struct EventModulator {
    state: EventState,
    probability: f64,
    duration_ms: i64,
}

impl EventModulator {
    pub fn new(config: &EventConfig) -> Self {
        Self {
            state: EventState::Calm,
            probability: config.probability,
            duration_ms: config.duration(),
        }
    }

    pub fn state(&self) -> &EventState {
        &self.state
    }

    pub fn active(&self) -> Option<&MarketEvent> {
        match &self.state {
            EventState::Active(event) => Some(event),
            EventState::Calm => None,
        }
    }

    /// Directional bias fed into the price engine
    pub fn trend(&self) -> f64 {
        self.active().map(|e| e.kind.trend()).unwrap_or(0.0)
    }

    pub fn volatility_multiplier(&self) -> f64 {
        self.active().map(|e| e.kind.volatility_multiplier()).unwrap_or(1.0)
    }

    /// Periodic check. Starts an event with the configured probability when
    /// calm; does nothing while an event is still running.
    pub fn roll(
        &mut self,
        now: i64,
        unlocked: &[Asset],
        rng: &mut dyn RandomSource,
    ) -> Option<MarketEvent> {
        self.expire(now);
        if self.active().is_some() || unlocked.is_empty() {
            return None;
        }

        if !rng.chance(self.probability) {
            return None;
        }

        let subject = unlocked[rng.index(unlocked.len())];
        let kind = EventKind::ALL[rng.index(EventKind::ALL.len())];
        Some(self.trigger(kind, subject, now))
    }

    /// Start an event immediately; replaces any running event and its deadline
    pub fn trigger(&mut self, kind: EventKind, subject: Asset, now: i64) -> MarketEvent {
        let event = MarketEvent {
            kind,
            subject,
            headline: kind.headline(subject),
            started_at: now,
            ends_at: now.saturating_add(self.duration_ms),
        };
        info!("⚡ Market event: {} (x{:.1} volatility, trend {:+.1})",
            event.headline,
            kind.volatility_multiplier(),
            kind.trend()
        );
        self.state = EventState::Active(event.clone());
        event
    }

    /// Revert to calm once the running event's deadline has passed
    pub fn expire(&mut self, now: i64) -> Option<MarketEvent> {
        let expired = matches!(&self.state, EventState::Active(event) if now >= event.ends_at);
        if !expired {
            return None;
        }
        match std::mem::replace(&mut self.state, EventState::Calm) {
            EventState::Active(event) => {
                info!("🌤️  Market calm again after {:?} on {}", event.kind, event.subject);
                Some(event)
            }
            EventState::Calm => None,
        }
    }
}
