use std::collections::BTreeMap;

/// Streak length that offers double-or-nothing.
pub const DOUBLE_OR_NOTHING: u32 = 5;
/// Streak length that pays the final jackpot.
pub const FINAL_JACKPOT: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Milestone {
    DoubleOrNothing,
    FinalJackpot,
}

/// Consecutive-hit counter with milestones that fire on exact arrival.
#[derive(Clone, Debug)]
pub struct Streak {
    count: u32,
    milestones: BTreeMap<u32, Milestone>,
}

impl Default for Streak {
    fn default() -> Self {
        Self::new()
    }
}

impl Streak {
    pub fn new() -> Self {
        let mut milestones = BTreeMap::new();
        milestones.insert(DOUBLE_OR_NOTHING, Milestone::DoubleOrNothing);
        milestones.insert(FINAL_JACKPOT, Milestone::FinalJackpot);
        Self { count: 0, milestones }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Count a hit. Returns the milestone reached by this exact increment.
    pub fn hit(&mut self) -> Option<Milestone> {
        self.count += 1;
        self.milestones.get(&self.count).copied()
    }

    pub fn miss(&mut self) {
        self.count = 0;
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// Goal banner shown above streak-tracking modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerStage {
    Goal,
    DoubleOrNothing,
    MaxLuck,
}

impl BannerStage {
    pub fn for_count(count: u32) -> Self {
        if count >= FINAL_JACKPOT {
            BannerStage::MaxLuck
        } else if count >= DOUBLE_OR_NOTHING {
            BannerStage::DoubleOrNothing
        } else {
            BannerStage::Goal
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            BannerStage::Goal => "Goal: streak 5 🎯",
            BannerStage::DoubleOrNothing => "🔥 DOUBLE OR NOTHING! Goal: streak 10 🔥",
            BannerStage::MaxLuck => "🏆 MAXIMUM LUCK! 🏆",
        }
    }

    pub fn highlighted(self) -> bool {
        self == BannerStage::DoubleOrNothing
    }
}
