// Terminal command implementations
use chrono::Utc;
use crypto_terminal_sim::{
    standard_schedule, AdOutcome, Asset, BookView, ClaimOutcome, Database, OrderBookLevel, OrderBookSide,
    QuestPhase, Session, SimConfig, SimulationProgress, Spinner, StdRandom, Terminal, TerminalError,
    TerminalResult, UnlockOutcome, Upgrade,
};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Load config and restore the persisted session
fn open_session(config_path: &str) -> TerminalResult<Session> {
    if !Path::new(config_path).exists() {
        return Err(TerminalError::ConfigNotFound(config_path.to_string()));
    }
    let config = SimConfig::from_file(config_path)?;
    let store = Database::open(&config.persistence.db_path)?;
    Ok(Session::open(config, store, Box::new(StdRandom::from_entropy()), now_ms()))
}

/// Run a mutating operation and persist the result
fn with_session<T>(
    config_path: &str,
    op: impl FnOnce(&mut Session) -> TerminalResult<T>,
) -> TerminalResult<T> {
    let mut session = open_session(config_path)?;
    let result = op(&mut session)?;
    session.save()?;
    Ok(result)
}

pub fn init_workspace(config_path: &str) -> TerminalResult<()> {
    info!("🔧 Initializing workspace...");

    let config = if Path::new(config_path).exists() {
        warn!("⚠️  {} already exists, keeping it", config_path);
        SimConfig::from_file(config_path)?
    } else {
        let config = SimConfig::load_or_create(config_path)?;
        info!("📝 Created {}", config_path);
        config
    };

    let store = Database::open(&config.persistence.db_path)?;
    if store.keys()?.is_empty() {
        let mut session = Session::open(config.clone(), store, Box::new(StdRandom::from_entropy()), now_ms());
        session.save()?;
        info!("💾 Created {}", config.persistence.db_path);
    } else {
        warn!("⚠️  {} already holds a session, keeping it", config.persistence.db_path);
    }

    info!("✅ Workspace initialized successfully!");
    info!("💡 Next steps:");
    info!("   1. Run: terminal-sim status");
    info!("   2. Run: terminal-sim run --seconds 120");
    Ok(())
}

pub fn show_status(config_path: &str) -> TerminalResult<()> {
    let session = open_session(config_path)?;
    let terminal = &session.terminal;
    let now = now_ms();

    info!("📊 Terminal Status");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("💵 Cash: ${:.2}", terminal.ledger().cash_balance());
    info!("💼 Net worth: ${:.2}", terminal.net_worth());
    for (asset, amount) in terminal.ledger().holdings() {
        info!("   {} {:.6} (${:.2})", asset, amount, amount * terminal.price(*asset));
    }

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for asset in Asset::ALL {
        let unlocked = terminal.purchased().contains(&asset);
        let star = if terminal.favorites().contains(&asset) { "★" } else { " " };
        let marker = if asset == terminal.selected() { "▶" } else { " " };
        if unlocked {
            info!("{}{} {:<5} ${:<14.6} {:+.2}%", marker, star, asset, terminal.price(asset), terminal.change_pct(asset));
        } else {
            info!("{}{} {:<5} 🔒 ${:.0}", marker, star, asset, asset.spec().unlock_cost);
        }
    }

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    match terminal.quest_phase(now) {
        QuestPhase::Regenerating { remaining_ms } => info!("📜 New quests in {}s", remaining_ms / 1_000),
        QuestPhase::AllClaimed => info!("📜 All quests claimed"),
        QuestPhase::Active => {
            for quest in terminal.quests() {
                let state = if quest.claimed {
                    "✅"
                } else if quest.is_complete() {
                    "🎁"
                } else {
                    "⏳"
                };
                info!(
                    "{} [{}] {} ({:.0}/{:.0}) reward ${:.0}",
                    state, quest.id, quest.description, quest.current, quest.target, quest.reward
                );
            }
        }
    }

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let idle = terminal.idle();
    info!("👆 Click value: ${:.2} | ⛏️  Passive: ${:.2}/s", idle.click_value(), idle.passive_income());
    for upgrade in Upgrade::ALL {
        info!(
            "   {:<8} level {:<3} next ${:.0}",
            upgrade.id(),
            idle.level(upgrade),
            idle.next_cost(upgrade)
        );
    }
    info!("🌐 Language: {}", terminal.language());
    Ok(())
}

pub fn run_simulated(config_path: &str, seconds: u64, seed: Option<u64>) -> TerminalResult<()> {
    let mut session = open_session(config_path)?;
    let start = now_ms();
    if let Some(seed) = seed {
        info!("🎲 Seeded run: {}", seed);
        let config = session.terminal.config().clone();
        let state = session.terminal.snapshot();
        session.terminal = Terminal::restore(config, state, Box::new(StdRandom::seeded(seed)), start);
    }

    let mut scheduler = standard_schedule(session.terminal.config(), start);
    let progress = SimulationProgress::new(seconds);

    for second in 1..=seconds {
        scheduler.advance(&mut session, 1_000);
        let headline = session.terminal.active_event().map(|e| e.headline.clone());
        progress.update(second, session.terminal.net_worth(), headline.as_deref());
    }

    progress.finish(session.terminal.net_worth(), session.terminal.stats().market_prints);
    session.save()?;
    info!("⏱️  {} handlers fired over {}s of simulated time", scheduler.fired(), seconds);
    Ok(())
}

pub async fn run_live(config_path: &str, seconds: u64) -> TerminalResult<()> {
    let mut session = open_session(config_path)?;
    let start = now_ms();
    let deadline = start + (seconds as i64) * 1_000;
    let mut scheduler = standard_schedule(session.terminal.config(), start);
    let mut interval = tokio::time::interval(Duration::from_millis(session.terminal.config().idle.income_interval_ms));
    let spinner = Spinner::new("Market is live");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = now_ms();
                scheduler.advance_to(&mut session, now.min(deadline));
                let asset = session.terminal.selected();
                spinner.update(&format!(
                    "{} ${:.6} | 💼 ${:.2}",
                    asset,
                    session.terminal.price(asset),
                    session.terminal.net_worth()
                ));
                if now >= deadline {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("🛑 Interrupted, saving session");
                break;
            }
        }
    }

    spinner.finish("Session closed");
    session.save()?;
    Ok(())
}

pub fn trade(config_path: &str, asset: Asset, amount: f64, is_buy: bool) -> TerminalResult<()> {
    with_session(config_path, |session| {
        let now = now_ms();
        let receipt = if is_buy {
            session.terminal.market_buy(asset, amount, now)?
        } else {
            session.terminal.market_sell(asset, amount, now)?
        };
        info!(
            "✅ {} {} for ${:.2} | cash ${:.2} | holding {:.6}",
            if is_buy { "Bought" } else { "Sold" },
            asset,
            receipt.settlement.volume,
            receipt.settlement.cash_balance,
            receipt.settlement.holding
        );
        Ok(())
    })
}

pub fn unlock(config_path: &str, asset: Asset) -> TerminalResult<()> {
    with_session(config_path, |session| {
        match session.terminal.unlock_asset(asset)? {
            UnlockOutcome::Unlocked { cash_balance } => info!("✅ {} unlocked | cash ${:.2}", asset, cash_balance),
            UnlockOutcome::AlreadyUnlocked => info!("ℹ️  {} is already unlocked", asset),
        }
        Ok(())
    })
}

pub fn select(config_path: &str, asset: Asset) -> TerminalResult<()> {
    with_session(config_path, |session| {
        session.terminal.select_asset(asset, now_ms())?;
        let candles = session.terminal.candles();
        info!("✅ {} selected, chart rebuilt with {} candles", asset, candles.len());
        Ok(())
    })
}

pub fn favorite(config_path: &str, asset: Asset) -> TerminalResult<()> {
    with_session(config_path, |session| {
        if session.terminal.toggle_favorite(asset) {
            info!("★ {} added to favorites", asset);
        } else {
            info!("☆ {} removed from favorites", asset);
        }
        Ok(())
    })
}

fn print_level(level: &OrderBookLevel, max: f64) {
    let width = ((level.cumulative / max) * 20.0).round() as usize;
    info!(
        "{:>16.6} {:>14.4} {:>14.2} {}",
        level.price,
        level.amount,
        level.total,
        "█".repeat(width.min(20))
    );
}

pub fn show_book(config_path: &str, asset: Asset, view: BookView) -> TerminalResult<()> {
    let mut session = open_session(config_path)?;
    let book = session.terminal.order_book(asset, view);
    if let Err(e) = book.validate() {
        warn!("⚠️  {}", e);
    }

    info!("📖 {} order book", asset);
    info!("{:>16} {:>14} {:>14}", "PRICE", "AMOUNT", "TOTAL");
    let ask_max = book.max_cumulative(OrderBookSide::Ask);
    for level in book.asks_for_display() {
        print_level(&level, ask_max);
    }
    info!("━━━━━━━━━━━━━━ ${:.6} ━━━━━━━━━━━━━━", book.reference_price);
    let bid_max = book.max_cumulative(OrderBookSide::Bid);
    for level in &book.bids {
        print_level(level, bid_max);
    }
    if let Some(spread) = book.spread() {
        info!("Spread: {:.6}", spread);
    }
    Ok(())
}

pub fn claim_quest(config_path: &str, quest_id: &str) -> TerminalResult<()> {
    with_session(config_path, |session| {
        match session.terminal.claim_quest(quest_id, now_ms())? {
            ClaimOutcome::Claimed { reward, cooldown_started } => {
                info!("🏆 +${:.0}", reward);
                if cooldown_started {
                    info!("⏳ All quests claimed, a new set arrives after the cooldown");
                }
            }
            ClaimOutcome::NotReady => warn!("⏳ Quest {} is not complete yet", quest_id),
            ClaimOutcome::AlreadyClaimed => warn!("ℹ️  Quest {} was already claimed", quest_id),
        }
        Ok(())
    })
}

pub fn skip_quest(config_path: &str, quest_id: &str) -> TerminalResult<()> {
    with_session(config_path, |session| {
        match session.terminal.skip_quest(quest_id, now_ms())? {
            AdOutcome::Rewarded => info!("⏩ Quest {} skipped without reward", quest_id),
            AdOutcome::Failed(reason) => warn!("📺 No reward: {}", reason),
        }
        Ok(())
    })
}

pub fn forfeit_quests(config_path: &str) -> TerminalResult<()> {
    with_session(config_path, |session| {
        let count = session.terminal.forfeit_quests(now_ms());
        info!("🏳️  Forfeited {} quests", count);
        Ok(())
    })
}

pub fn skip_cooldown(config_path: &str) -> TerminalResult<()> {
    with_session(config_path, |session| {
        match session.terminal.skip_cooldown(now_ms()) {
            AdOutcome::Rewarded => info!("📜 Fresh quests are available"),
            AdOutcome::Failed(reason) => warn!("📺 Cooldown not skipped: {}", reason),
        }
        Ok(())
    })
}

pub fn collect(config_path: &str, times: u32) -> TerminalResult<()> {
    with_session(config_path, |session| {
        let total: f64 = (0..times).map(|_| session.terminal.collect_click()).sum();
        info!("👆 Collected ${:.2} over {} clicks", total, times);
        Ok(())
    })
}

pub fn buy_upgrade(config_path: &str, upgrade: Upgrade) -> TerminalResult<()> {
    with_session(config_path, |session| {
        let receipt = session.terminal.buy_upgrade(upgrade)?;
        info!(
            "✅ {} level {} | click ${:.2} | passive ${:.2}/s | cash ${:.2}",
            upgrade.spec().name,
            receipt.level,
            receipt.click_value,
            receipt.passive_income,
            receipt.cash_balance
        );
        Ok(())
    })
}

pub fn ad_bonus(config_path: &str) -> TerminalResult<()> {
    with_session(config_path, |session| {
        match session.terminal.claim_ad_bonus() {
            (AdOutcome::Rewarded, amount) => info!("🎁 +${:.0}", amount),
            (AdOutcome::Failed(reason), _) => warn!("📺 No reward: {}", reason),
        }
        Ok(())
    })
}

pub fn set_language(config_path: &str, code: &str) -> TerminalResult<()> {
    with_session(config_path, |session| {
        if session.terminal.set_language(code) {
            info!("🌐 Language set to {}", code);
        } else {
            warn!("⚠️  Unsupported language '{}', expected ru or en", code);
        }
        Ok(())
    })
}
