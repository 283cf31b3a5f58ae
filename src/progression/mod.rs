// Progression: quests, idle income and rewarded actions

pub mod quests;
pub mod idle;
pub mod rewards;

pub use quests::{generate_quests, ClaimOutcome, Quest, QuestBoard, QuestKind, QuestPhase};
pub use idle::{IdleIncome, Upgrade, UpgradeSpec};
pub use rewards::{request_reward, AdOutcome, AlwaysFails, AlwaysRewarded, RewardedVideo};
