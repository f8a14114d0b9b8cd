//! The fortune wheel: spin, land on a segment, celebrate by luck level.

use super::{Action, Lane, Mode, ModeContext, ModeKind, ModeView};
use crate::confetti::ConfettiEmitter;
use crate::engine::TickLoop;
use crate::escalation::{EscalationHost, OverlayConfig};
use crate::feedback::Feedback;

const RESULT: &str = "fortuneWheelResult";
const DETAILS: &str = "fortuneWheelResultDetails";
const CANVAS: &str = "fortuneWheelConfetti";

const FULL_TURNS_DEG: f64 = 1080.0;
const SPIN_MS: f64 = 3000.0;
const JACKPOT_DELAY_MS: f64 = 1000.0;
const MAX_LEVEL: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub name: &'static str,
    pub emoji: &'static str,
    pub message: &'static str,
    /// Luck level, 1 to 5.
    pub level: u32,
}

pub const SEGMENTS: [Segment; 6] = [
    Segment {
        name: "Maximum Luck",
        emoji: "🎰",
        message: "Your luck is maxed out. Today is your day.",
        level: 5,
    },
    Segment {
        name: "Great Fortune",
        emoji: "💰",
        message: "Fortune smiles on you. Make the most of it!",
        level: 4,
    },
    Segment {
        name: "Good Luck",
        emoji: "🍀",
        message: "The stars are lined up in your favour.",
        level: 3,
    },
    Segment {
        name: "Normal Luck",
        emoji: "🎲",
        message: "Luck is on your side. Keep going.",
        level: 2,
    },
    Segment {
        name: "Basic Luck",
        emoji: "⭐",
        message: "You have basic luck. Everything will work out.",
        level: 1,
    },
    Segment {
        name: "Minimal Luck",
        emoji: "🔮",
        message: "Luck is here, even if only a little.",
        level: 1,
    },
];

fn segment_angle() -> f64 {
    360.0 / SEGMENTS.len() as f64
}

/// Index of the segment under the pointer for a resting `rotation` in degrees.
pub fn segment_at(rotation: f64) -> usize {
    let normalized = (360.0 - rotation.rem_euclid(360.0)).rem_euclid(360.0);
    ((normalized / segment_angle()) as usize).min(SEGMENTS.len() - 1)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Spin {
    Idle,
    Turning { elapsed_ms: f64 },
}

pub struct WheelMode {
    /// Resting angle in [0, 360).
    rotation: f64,
    /// Accumulated angle handed to the renderer so the dial never turns back.
    dial: f64,
    spin: Spin,
    /// Time since a top-level landing whose overlay is still to come.
    jackpot_due_ms: Option<f64>,
    last: Option<Segment>,
    ticks: TickLoop,
    confetti: ConfettiEmitter,
}

impl Default for WheelMode {
    fn default() -> Self {
        Self::new()
    }
}

impl WheelMode {
    pub fn new() -> Self {
        Self {
            rotation: 0.0,
            dial: 0.0,
            spin: Spin::Idle,
            jackpot_due_ms: None,
            last: None,
            ticks: TickLoop::new(),
            confetti: ConfettiEmitter::new(CANVAS),
        }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.spin, Spin::Turning { .. })
    }

    pub fn last_result(&self) -> Option<Segment> {
        self.last
    }

    fn spin(&mut self, ctx: &mut ModeContext<'_>) {
        if self.spin != Spin::Idle || self.ticks.is_paused() {
            return;
        }
        let segment = ctx.rng.index(SEGMENTS.len()) as f64;
        let travel = FULL_TURNS_DEG + segment * segment_angle() + ctx.rng.unit() * segment_angle();
        self.dial += travel;
        self.rotation = (self.rotation + travel) % 360.0;
        self.spin = Spin::Turning { elapsed_ms: 0.0 };
        ctx.fx.clear_message(RESULT);
        ctx.fx.stat(DETAILS, "Spinning the wheel...");
        log::debug!("wheel spinning to {:.1}°", self.rotation);
    }

    fn land(&mut self, ctx: &mut ModeContext<'_>) {
        let result = SEGMENTS[segment_at(self.rotation)];
        log::info!("wheel landed on {}", result.name);
        self.last = Some(result);
        self.confetti.launch(result.level as usize * 30, ctx.rng);
        ctx.fx.success();
        ctx.fx.stat(RESULT, format!("{0} {1} {0}", result.emoji, result.name));
        ctx.fx.stat(DETAILS, result.message);
        self.spin = Spin::Idle;
        if result.level == MAX_LEVEL && self.jackpot_due_ms.is_none() {
            self.jackpot_due_ms = Some(0.0);
        }
    }

    fn open_jackpot(&mut self, ctx: &mut ModeContext<'_>) {
        self.jackpot_due_ms = None;
        self.pause();
        let config = OverlayConfig {
            title: "MAXIMUM LUCK!".into(),
            subtitle: "🎰 FORTUNE IS ON YOUR SIDE 🎰".into(),
            text: "CONGRATULATIONS!".into(),
            subtext: "You reached the highest level of luck. Time to go play BINGO!".into(),
            cta: "🎲 May the numbers be with you! 🎰".into(),
            button_text: "Continue".into(),
        };
        if !ctx.overlay.show(config, Some(Lane::One), ctx.fx, ctx.rng) {
            self.resume();
        }
    }
}

impl EscalationHost for WheelMode {
    fn on_continue(&mut self, _owner: Lane, _fx: &mut Feedback) {
        self.resume();
    }

    fn on_quit(&mut self, _owner: Lane, _fx: &mut Feedback) {
        self.resume();
    }

    fn on_acknowledge(&mut self, _owner: Lane, fx: &mut Feedback) {
        self.resume();
        fx.stat(DETAILS, "Go play bingo now! Luck is with you.");
    }
}

impl Mode for WheelMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Wheel
    }

    fn start(&mut self, fx: &mut Feedback) {
        fx.clear_message(RESULT);
        fx.clear_message(DETAILS);
        self.ticks.start();
    }

    fn frame(&mut self, ctx: &mut ModeContext<'_>, dt_ms: f64) {
        if self.ticks.take_frame() {
            // the jackpot delay runs independently of any new spin
            if let Some(waited) = self.jackpot_due_ms {
                let waited = waited + dt_ms;
                if waited >= JACKPOT_DELAY_MS {
                    self.open_jackpot(ctx);
                } else {
                    self.jackpot_due_ms = Some(waited);
                }
            }
            if let Spin::Turning { elapsed_ms } = self.spin {
                if self.ticks.is_paused() {
                    // overlay just opened; carry on after it closes
                } else if elapsed_ms + dt_ms >= SPIN_MS {
                    self.land(ctx);
                } else {
                    self.spin = Spin::Turning { elapsed_ms: elapsed_ms + dt_ms };
                }
            }
        }
        self.confetti.step();
    }

    fn act(&mut self, ctx: &mut ModeContext<'_>, action: Action) {
        if let Action::Press(_) = action {
            self.spin(ctx);
        }
    }

    fn pause(&mut self) {
        self.ticks.pause();
    }

    fn resume(&mut self) {
        self.ticks.resume();
    }

    fn is_paused(&self) -> bool {
        self.ticks.is_paused()
    }

    fn teardown(&mut self) {
        self.ticks.stop();
        self.spin = Spin::Idle;
        self.jackpot_due_ms = None;
        self.confetti.clear();
    }

    fn view(&self) -> ModeView {
        ModeView::Wheel {
            rotation: self.dial,
            spinning: self.is_spinning(),
        }
    }

    fn confetti(&self) -> &ConfettiEmitter {
        &self.confetti
    }

    fn confetti_mut(&mut self) -> &mut ConfettiEmitter {
        &mut self.confetti
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escalation::{Dismissal, JackpotOverlay};
    use crate::rng::Rng;

    #[test]
    fn segment_lookup_runs_against_rotation() {
        assert_eq!(segment_at(0.0), 0);
        assert_eq!(segment_at(359.0), 0);
        assert_eq!(segment_at(301.0), 0);
        assert_eq!(segment_at(299.0), 1);
        assert_eq!(segment_at(30.0), 5);
        assert_eq!(segment_at(-30.0), 0);
    }

    #[test]
    fn respins_are_ignored_while_turning() {
        let mut fx = Feedback::headless();
        let mut overlay = JackpotOverlay::new();
        let mut rng = Rng::new(21);
        let mut m = WheelMode::new();
        m.start(&mut fx);
        let mut ctx = ModeContext { fx: &mut fx, overlay: &mut overlay, rng: &mut rng };
        m.act(&mut ctx, Action::Press(Lane::One));
        let resting = m.rotation();
        assert!((0.0..360.0).contains(&resting));
        m.act(&mut ctx, Action::Press(Lane::One));
        assert_eq!(m.rotation(), resting);
        assert!(m.is_spinning());

        for _ in 0..30 {
            m.frame(&mut ctx, 100.0);
        }
        assert!(!m.is_spinning());
        let landed = m.last_result().map(|s| s.name);
        assert_eq!(landed, Some(SEGMENTS[segment_at(resting)].name));
    }

    #[test]
    fn top_level_opens_jackpot_after_delay() {
        let mut fx = Feedback::headless();
        let mut overlay = JackpotOverlay::new();
        let mut rng = Rng::new(5);
        let mut m = WheelMode::new();
        m.start(&mut fx);
        // spin until the top segment comes up
        let mut spins = 0;
        loop {
            let mut ctx = ModeContext { fx: &mut fx, overlay: &mut overlay, rng: &mut rng };
            m.act(&mut ctx, Action::Press(Lane::One));
            for _ in 0..30 {
                m.frame(&mut ctx, 100.0);
            }
            spins += 1;
            if m.last_result().map(|s| s.level) == Some(MAX_LEVEL) || spins > 200 {
                break;
            }
        }
        assert_eq!(m.last_result().map(|s| s.level), Some(MAX_LEVEL));
        assert!(!overlay.is_open());
        {
            // the wheel is free again while the jackpot is pending
            let mut ctx = ModeContext { fx: &mut fx, overlay: &mut overlay, rng: &mut rng };
            m.act(&mut ctx, Action::Press(Lane::One));
            assert!(m.is_spinning());
            for _ in 0..10 {
                m.frame(&mut ctx, 100.0);
            }
        }
        assert!(overlay.is_open());
        assert!(m.is_paused());
        assert!(m.is_spinning());
        overlay.dismiss(Dismissal::Backdrop, &mut m, &mut fx);
        assert!(!m.is_paused());
        assert!(m.is_spinning());
    }
}
