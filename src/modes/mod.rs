//! The mini-games. Each mode owns its frame loop, its confetti and its
//! scoring; the session owns everything shared (feedback, overlay, rng).

use crate::confetti::ConfettiEmitter;
use crate::difficulty::Difficulty;
use crate::engine::{BarView, Presets};
use crate::escalation::{BannerStage, EscalationHost, JackpotOverlay};
use crate::feedback::Feedback;
use crate::rng::Rng;
use crate::router::Screen;

mod competitive;
mod coop;
mod hits;
mod individual;
mod race;
mod ritual;
mod wheel;

pub use competitive::CompetitiveMode;
pub use coop::CoopMode;
pub use hits::HitsMode;
pub use individual::IndividualMode;
pub use race::{FINISH_LINE, RaceMode};
pub use ritual::{AURAS, Aura, RITUAL_ITEMS, RitualMode, RitualView, SLOT_ITEMS, SlotLayout};
pub use wheel::{SEGMENTS, Segment, WheelMode, segment_at};

/// A player's side of the screen. Single-player modes use `One`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lane {
    One,
    Two,
}

impl Lane {
    pub fn index(self) -> usize {
        match self {
            Lane::One => 0,
            Lane::Two => 1,
        }
    }

    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }
}

/// Discrete player input, already resolved from pointer/touch events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Press(Lane),
    Release(Lane),
    Place { item: usize, slot: usize },
    Restart,
    Reveal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Individual,
    Precision,
    Chaos,
    Competitive,
    Race,
    Coop,
    Wheel,
    Ritual,
}

impl ModeKind {
    pub const ALL: [ModeKind; 8] = [
        ModeKind::Individual,
        ModeKind::Precision,
        ModeKind::Chaos,
        ModeKind::Competitive,
        ModeKind::Race,
        ModeKind::Coop,
        ModeKind::Wheel,
        ModeKind::Ritual,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        ModeKind::ALL.into_iter().find(|k| k.screen().name() == name)
    }

    pub fn screen(self) -> Screen {
        match self {
            ModeKind::Individual => Screen::Individual,
            ModeKind::Precision => Screen::Precision,
            ModeKind::Chaos => Screen::Chaos,
            ModeKind::Competitive => Screen::Competitive,
            ModeKind::Race => Screen::Race,
            ModeKind::Coop => Screen::Coop,
            ModeKind::Wheel => Screen::Wheel,
            ModeKind::Ritual => Screen::Ritual,
        }
    }

    /// Modes that go through the difficulty screen first.
    pub fn uses_difficulty(self) -> bool {
        !matches!(self, ModeKind::Wheel | ModeKind::Ritual)
    }
}

/// Shared collaborators lent to a mode for one call.
pub struct ModeContext<'a> {
    pub fx: &'a mut Feedback,
    pub overlay: &'a mut JackpotOverlay,
    pub rng: &'a mut Rng,
}

/// What the presentation layer needs to draw a mode this frame.
#[derive(Clone, Debug, PartialEq)]
pub enum ModeView {
    /// One entry per lane, in lane order.
    Bars(Vec<BarView>),
    Race {
        /// Distance covered per lane.
        runners: [f64; 2],
        countdown: Option<&'static str>,
    },
    Coop {
        /// Height of each ball above its start.
        balls: [f64; 2],
        /// Top offset of each target.
        targets: [f64; 2],
    },
    Wheel {
        rotation: f64,
        spinning: bool,
    },
    Ritual(RitualView),
}

pub trait Mode: EscalationHost {
    fn kind(&self) -> ModeKind;

    /// Write initial stats and schedule the first frame.
    fn start(&mut self, fx: &mut Feedback);

    /// One display frame. `dt_ms` is the time since the previous frame.
    fn frame(&mut self, ctx: &mut ModeContext<'_>, dt_ms: f64);

    fn act(&mut self, ctx: &mut ModeContext<'_>, action: Action);

    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    /// Cancel the frame loop and clear particles. The mode is inert afterwards.
    fn teardown(&mut self);

    fn view(&self) -> ModeView;

    fn confetti(&self) -> &ConfettiEmitter;

    fn confetti_mut(&mut self) -> &mut ConfettiEmitter;
}

pub fn build(
    kind: ModeKind,
    difficulty: Difficulty,
    presets: &Presets,
    layout: SlotLayout,
) -> Box<dyn Mode> {
    match kind {
        ModeKind::Individual => Box::new(IndividualMode::new(presets.individual.clone(), difficulty)),
        ModeKind::Precision => Box::new(HitsMode::precision(presets.precision.clone(), difficulty)),
        ModeKind::Chaos => Box::new(HitsMode::chaos(presets.chaos.clone(), difficulty)),
        ModeKind::Competitive => {
            Box::new(CompetitiveMode::new(presets.competitive.clone(), difficulty))
        }
        ModeKind::Race => Box::new(RaceMode::new(difficulty)),
        ModeKind::Coop => Box::new(CoopMode::new()),
        ModeKind::Wheel => Box::new(WheelMode::new()),
        ModeKind::Ritual => Box::new(RitualMode::new(layout)),
    }
}

fn show_banner(fx: &mut Feedback, key: &str, streak: u32) {
    let stage = BannerStage::for_count(streak);
    fx.banner(key, stage.text(), stage.highlighted());
}
