// Crypto Terminal Simulator - CLI
// Single entry point for driving and inspecting a persisted terminal session

use clap::{Parser, Subcommand};
use crypto_terminal_sim::{Asset, BookView, SimConfig, Upgrade};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// Load command module from cli directory
#[path = "../cli/terminal_commands.rs"]
mod terminal_commands;

#[derive(Parser)]
#[command(name = "terminal-sim")]
#[command(version = "0.2.0")]
#[command(about = "Simulated crypto exchange terminal", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "terminal.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration and create the database
    Init,

    /// Show balances, prices, quests and upgrades
    Status,

    /// Fast-forward the market in simulated time
    Run {
        /// Simulated seconds to run
        #[arg(short, long, default_value = "60")]
        seconds: u64,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run the market in wall-clock time
    Live {
        /// Seconds to run before saving and exiting
        #[arg(short, long, default_value = "30")]
        seconds: u64,
    },

    /// Buy at the current price
    Buy {
        asset: Asset,
        amount: f64,
    },

    /// Sell at the current price
    Sell {
        asset: Asset,
        amount: f64,
    },

    /// Pay to unlock an asset
    Unlock {
        asset: Asset,
    },

    /// Focus an unlocked asset
    Select {
        asset: Asset,
    },

    /// Toggle an asset in the favorites list
    Favorite {
        asset: Asset,
    },

    /// Print a synthetic order book
    Book {
        asset: Asset,

        /// Show only one side: "bids" or "asks"
        #[arg(long)]
        side: Option<String>,
    },

    /// Claim a completed quest
    Claim {
        quest_id: String,
    },

    /// Complete a quest via rewarded video
    SkipQuest {
        quest_id: String,
    },

    /// Give up on the remaining quests without reward
    ForfeitQuests,

    /// End the quest cooldown via rewarded video
    SkipCooldown,

    /// Collect the click reward
    Collect {
        #[arg(short, long, default_value = "1")]
        times: u32,
    },

    /// Buy the next level of an upgrade (cpu, bot, server, quantum)
    Upgrade {
        upgrade: Upgrade,
    },

    /// Watch a rewarded video for a cash bonus
    AdBonus,

    /// Switch the interface language (ru, en)
    Language {
        code: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging first (before config load so we can see config errors)
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        SimConfig::from_file(&cli.config)
            .map(|c| c.logging.level)
            .unwrap_or_else(|_| "info".to_string())
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)))
        .init();

    info!("🚀 Crypto Terminal Simulator v0.2.0");
    info!("📁 Config: {}", cli.config);

    let result = match cli.command {
        // Init doesn't require config (it creates it)
        Commands::Init => terminal_commands::init_workspace(&cli.config),
        Commands::Status => terminal_commands::show_status(&cli.config),
        Commands::Run { seconds, seed } => terminal_commands::run_simulated(&cli.config, seconds, seed),
        Commands::Live { seconds } => terminal_commands::run_live(&cli.config, seconds).await,
        Commands::Buy { asset, amount } => terminal_commands::trade(&cli.config, asset, amount, true),
        Commands::Sell { asset, amount } => terminal_commands::trade(&cli.config, asset, amount, false),
        Commands::Unlock { asset } => terminal_commands::unlock(&cli.config, asset),
        Commands::Select { asset } => terminal_commands::select(&cli.config, asset),
        Commands::Favorite { asset } => terminal_commands::favorite(&cli.config, asset),
        Commands::Book { asset, side } => {
            let view = match side.as_deref() {
                Some("bids") => BookView::BidsOnly,
                Some("asks") => BookView::AsksOnly,
                _ => BookView::Both,
            };
            terminal_commands::show_book(&cli.config, asset, view)
        }
        Commands::Claim { quest_id } => terminal_commands::claim_quest(&cli.config, &quest_id),
        Commands::SkipQuest { quest_id } => terminal_commands::skip_quest(&cli.config, &quest_id),
        Commands::ForfeitQuests => terminal_commands::forfeit_quests(&cli.config),
        Commands::SkipCooldown => terminal_commands::skip_cooldown(&cli.config),
        Commands::Collect { times } => terminal_commands::collect(&cli.config, times),
        Commands::Upgrade { upgrade } => terminal_commands::buy_upgrade(&cli.config, upgrade),
        Commands::AdBonus => terminal_commands::ad_bonus(&cli.config),
        Commands::Language { code } => terminal_commands::set_language(&cli.config, &code),
    };

    if let Err(e) = result {
        error!("❌ {} error", e.category());
        error!("{}", e.user_message());
        std::process::exit(1);
    }
}
