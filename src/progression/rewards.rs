// Rewarded-video collaborator
// The engine asks for a reward and gets a plain outcome back, so no callback
// ever re-enters the terminal while it is mid-update.

/// Result of asking the reward provider to show a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdOutcome {
    Rewarded,
    Failed(String),
}

/// Opaque "show rewarded video" capability
pub trait RewardedVideo: Send {
    fn show_rewarded_video(&mut self) -> AdOutcome;
}

/// Provider that always pays out; handy for demos and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRewarded;

impl RewardedVideo for AlwaysRewarded {
    fn show_rewarded_video(&mut self) -> AdOutcome {
        AdOutcome::Rewarded
    }
}

/// Provider that always fails with a fixed reason
#[derive(Debug, Clone, Default)]
pub struct AlwaysFails(pub String);

impl RewardedVideo for AlwaysFails {
    fn show_rewarded_video(&mut self) -> AdOutcome {
        AdOutcome::Failed(self.0.clone())
    }
}

/// Ask the provider if there is one; without a provider the reward is granted
pub fn request_reward(provider: Option<&mut (dyn RewardedVideo + 'static)>) -> AdOutcome {
    match provider {
        Some(provider) => provider.show_rewarded_video(),
        None => AdOutcome::Rewarded,
    }
}
