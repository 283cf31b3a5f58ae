// Runtime wiring
// Binds the terminal to its periodic cadences and the snapshot store

use crate::config::SimConfig;
use crate::core::rng::RandomSource;
use crate::core::scheduler::Scheduler;
use crate::db::{Database, PersistedState};
use crate::error::TerminalResult;
use crate::simulation::terminal::Terminal;
use tracing::{info, warn};

pub const CADENCE_PRICES: &str = "prices";
pub const CADENCE_INCOME: &str = "income";
pub const CADENCE_EVENTS: &str = "events";
pub const CADENCE_COOLDOWN: &str = "quest_cooldown";
pub const CADENCE_SNAPSHOT: &str = "snapshot";

/// A terminal plus its optional backing store
pub struct Session {
    pub terminal: Terminal,
    pub store: Option<Database>,
}

impl Session {
    /// Session without persistence
    pub fn ephemeral(config: SimConfig, rng: Box<dyn RandomSource + Send>, now: i64) -> Self {
        Self {
            terminal: Terminal::new(config, rng, now),
            store: None,
        }
    }

    /// Restore from the store; every unreadable key falls back to its default
    pub fn open(
        config: SimConfig,
        store: Database,
        rng: Box<dyn RandomSource + Send>,
        now: i64,
    ) -> Self {
        let state = PersistedState::load(&store, &config);
        Self {
            terminal: Terminal::restore(config, state, rng, now),
            store: Some(store),
        }
    }

    /// Write the full snapshot and clear the dirty flag
    pub fn save(&mut self) -> TerminalResult<()> {
        if let Some(store) = &self.store {
            self.terminal.snapshot().save(store)?;
            self.terminal.mark_saved();
        }
        Ok(())
    }

    /// Snapshot cadence: only writes when something changed. Failures are
    /// logged; the simulation keeps running.
    pub fn save_if_dirty(&mut self) -> bool {
        if self.store.is_none() || !self.terminal.is_dirty() {
            return false;
        }
        match self.save() {
            Ok(()) => true,
            Err(e) => {
                warn!("💾 Snapshot failed: {}", e.user_message());
                false
            }
        }
    }
}

/// The standard cadence set: prices, idle income, market events, quest
/// cooldown and snapshots
pub fn standard_schedule(config: &SimConfig, start_ms: i64) -> Scheduler<Session> {
    let mut scheduler = Scheduler::new(start_ms);

    scheduler.on_tick(CADENCE_PRICES, config.market.tick_interval_ms, |session: &mut Session, now| {
        let report = session.terminal.tick(now);
        if let Some(event) = report.event_ended {
            info!("📰 {} is over", event.headline);
        }
    });

    scheduler.on_tick(CADENCE_INCOME, config.idle.income_interval_ms, |session: &mut Session, _now| {
        session.terminal.accrue_income();
    });

    scheduler.on_tick(CADENCE_EVENTS, config.events.check_interval_ms, |session: &mut Session, now| {
        if let Some(event) = session.terminal.roll_event(now) {
            info!("📰 {}", event.headline);
        }
    });

    scheduler.on_tick(CADENCE_COOLDOWN, config.quests.cooldown_check_ms, |session: &mut Session, now| {
        session.terminal.cooldown_tick(now);
    });

    scheduler.on_tick(CADENCE_SNAPSHOT, config.persistence.snapshot_interval_ms, |session: &mut Session, _now| {
        session.save_if_dirty();
    });

    scheduler
}
