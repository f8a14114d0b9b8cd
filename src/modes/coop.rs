//! Cooperative mode: both players hold their ball up to its target at the
//! same moment.

use super::{Action, Lane, Mode, ModeContext, ModeKind, ModeView};
use crate::confetti::ConfettiEmitter;
use crate::engine::TickLoop;
use crate::escalation::EscalationHost;
use crate::feedback::Feedback;
use crate::rng::Rng;

const POINTS: &str = "coopPoints";
const MESSAGE: &str = "coopMessage";
const CANVAS: &str = "coopConfetti";

const RISE_PER_FRAME: f64 = 3.0;
const MAX_HEIGHT: f64 = 200.0;
const TARGET_MIN: f64 = 20.0;
const TARGET_SPAN: f64 = 180.0;
const RETARGET_MS: f64 = 2000.0;
const SYNC_TOLERANCE: f64 = 20.0;
const SYNC_POINTS: u32 = 20;

/// Top offset of a ball that has risen `height` from its resting spot.
fn ball_top(height: f64) -> f64 {
    MAX_HEIGHT - height
}

pub struct CoopMode {
    balls: [f64; 2],
    held: [bool; 2],
    targets: [f64; 2],
    since_retarget_ms: f64,
    points: u32,
    ticks: TickLoop,
    confetti: ConfettiEmitter,
}

impl Default for CoopMode {
    fn default() -> Self {
        Self::new()
    }
}

impl CoopMode {
    pub fn new() -> Self {
        Self {
            balls: [0.0; 2],
            held: [false; 2],
            targets: [50.0; 2],
            since_retarget_ms: 0.0,
            points: 0,
            ticks: TickLoop::new(),
            confetti: ConfettiEmitter::new(CANVAS),
        }
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn balls(&self) -> [f64; 2] {
        self.balls
    }

    pub fn targets(&self) -> [f64; 2] {
        self.targets
    }

    fn retarget(&mut self, rng: &mut Rng) {
        for target in &mut self.targets {
            *target = rng.span(TARGET_MIN, TARGET_SPAN);
        }
    }

    fn in_sync(&self) -> bool {
        self.balls
            .iter()
            .zip(&self.targets)
            .all(|(ball, target)| (ball_top(*ball) - target).abs() < SYNC_TOLERANCE)
    }

    fn step(&mut self, ctx: &mut ModeContext<'_>, dt_ms: f64) {
        for (ball, held) in self.balls.iter_mut().zip(self.held) {
            if held && *ball < MAX_HEIGHT {
                *ball += RISE_PER_FRAME;
            }
        }

        if self.in_sync() {
            self.points += SYNC_POINTS;
            log::debug!("coop sync, points now {}", self.points);
            ctx.fx.stat(POINTS, self.points);
            ctx.fx.message(MESSAGE, "PERFECT SYNC! 🎉", true);
            self.confetti.launch(150, ctx.rng);
            ctx.fx.explosion();
            self.balls = [0.0; 2];
            self.retarget(ctx.rng);
        }

        // runs on its own clock; a sync does not restart it
        self.since_retarget_ms += dt_ms;
        if self.since_retarget_ms >= RETARGET_MS {
            self.since_retarget_ms = 0.0;
            self.retarget(ctx.rng);
        }
    }

    #[cfg(test)]
    pub(crate) fn set_targets(&mut self, targets: [f64; 2]) {
        self.targets = targets;
    }
}

impl EscalationHost for CoopMode {
    fn on_continue(&mut self, _owner: Lane, _fx: &mut Feedback) {}

    fn on_quit(&mut self, _owner: Lane, _fx: &mut Feedback) {}

    fn on_acknowledge(&mut self, _owner: Lane, _fx: &mut Feedback) {}
}

impl Mode for CoopMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Coop
    }

    fn start(&mut self, fx: &mut Feedback) {
        fx.stat(POINTS, self.points);
        fx.clear_message(MESSAGE);
        self.ticks.start();
    }

    fn frame(&mut self, ctx: &mut ModeContext<'_>, dt_ms: f64) {
        if self.ticks.take_frame() {
            // first frame places the targets
            if self.ticks.frames() == 1 {
                self.retarget(ctx.rng);
            }
            self.step(ctx, dt_ms);
        }
        self.confetti.step();
    }

    fn act(&mut self, _ctx: &mut ModeContext<'_>, action: Action) {
        match action {
            Action::Press(lane) => self.held[lane.index()] = true,
            Action::Release(lane) => self.held[lane.index()] = false,
            _ => {}
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
        self.held = [false; 2];
        self.confetti.clear();
    }

    fn view(&self) -> ModeView {
        ModeView::Coop {
            balls: self.balls,
            targets: self.targets,
        }
    }

    fn confetti(&self) -> &ConfettiEmitter {
        &self.confetti
    }

    fn confetti_mut(&mut self) -> &mut ConfettiEmitter {
        &mut self.confetti
    }
}
