//! Streak milestones and the jackpot overlay they trigger.

pub mod jackpot;
mod streak;

pub use jackpot::{Dismissal, EscalationHost, JackpotOverlay, OverlayConfig, Phase};
pub use streak::{BannerStage, DOUBLE_OR_NOTHING, FINAL_JACKPOT, Milestone, Streak};
