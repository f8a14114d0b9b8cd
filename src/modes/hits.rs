//! Raw-hit-counting timing bars: Precision (small static target, steady speed)
//! and Chaos (jittered speed, jumpy target).

use super::{Action, Lane, Mode, ModeContext, ModeKind, ModeView};
use crate::confetti::ConfettiEmitter;
use crate::difficulty::Difficulty;
use crate::engine::{TickLoop, TimingBar, TimingBarConfig};
use crate::escalation::EscalationHost;
use crate::feedback::Feedback;

struct Labels {
    kind: ModeKind,
    hits: &'static str,
    message: &'static str,
    canvas: &'static str,
    on_hit: &'static str,
    on_miss: &'static str,
    confetti: usize,
}

const PRECISION: Labels = Labels {
    kind: ModeKind::Precision,
    hits: "precisionHits",
    message: "precisionMessage",
    canvas: "precisionConfetti",
    on_hit: "PERFECT! 🎯✨",
    on_miss: "Almost! Try again 😤",
    confetti: 120,
};

const CHAOS: Labels = Labels {
    kind: ModeKind::Chaos,
    hits: "chaosHits",
    message: "chaosMessage",
    canvas: "chaosConfetti",
    on_hit: "INCREDIBLE! 🌀⚡",
    on_miss: "Too chaotic! 😈",
    confetti: 150,
};

pub struct HitsMode {
    labels: &'static Labels,
    bar: TimingBar,
    ticks: TickLoop,
    hits: u32,
    confetti: ConfettiEmitter,
}

impl HitsMode {
    fn with_labels(labels: &'static Labels, config: TimingBarConfig, difficulty: Difficulty) -> Self {
        Self {
            labels,
            bar: TimingBar::new(config, difficulty),
            ticks: TickLoop::new(),
            hits: 0,
            confetti: ConfettiEmitter::new(labels.canvas),
        }
    }

    pub fn precision(config: TimingBarConfig, difficulty: Difficulty) -> Self {
        Self::with_labels(&PRECISION, config, difficulty)
    }

    pub fn chaos(config: TimingBarConfig, difficulty: Difficulty) -> Self {
        Self::with_labels(&CHAOS, config, difficulty)
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn bar(&self) -> &TimingBar {
        &self.bar
    }

    #[cfg(test)]
    pub(crate) fn bar_mut(&mut self) -> &mut TimingBar {
        &mut self.bar
    }
}

impl EscalationHost for HitsMode {
    fn on_continue(&mut self, _owner: Lane, _fx: &mut Feedback) {
        self.resume();
    }

    fn on_quit(&mut self, _owner: Lane, _fx: &mut Feedback) {
        self.resume();
    }

    fn on_acknowledge(&mut self, _owner: Lane, _fx: &mut Feedback) {
        self.resume();
    }
}

impl Mode for HitsMode {
    fn kind(&self) -> ModeKind {
        self.labels.kind
    }

    fn start(&mut self, fx: &mut Feedback) {
        fx.stat(self.labels.hits, self.hits);
        fx.clear_message(self.labels.message);
        self.ticks.start();
    }

    fn frame(&mut self, ctx: &mut ModeContext<'_>, dt_ms: f64) {
        if self.ticks.take_frame() {
            self.bar.tick(ctx.rng, dt_ms);
        }
        self.confetti.step();
    }

    fn act(&mut self, ctx: &mut ModeContext<'_>, action: Action) {
        if !matches!(action, Action::Press(_)) || !self.ticks.is_scheduled() {
            return;
        }
        if self.bar.hit_test() {
            self.hits += 1;
            ctx.fx.stat(self.labels.hits, self.hits);
            ctx.fx.message(self.labels.message, self.labels.on_hit, true);
            self.confetti.launch(self.labels.confetti, ctx.rng);
            ctx.fx.success();
        } else {
            ctx.fx.message(self.labels.message, self.labels.on_miss, false);
            ctx.fx.fail();
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
        self.confetti.clear();
    }

    fn view(&self) -> ModeView {
        ModeView::Bars(vec![self.bar.view()])
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
    use crate::engine::presets;
    use crate::escalation::JackpotOverlay;
    use crate::rng::Rng;

    #[test]
    fn precision_target_is_centred_and_fixed() {
        let mut m = HitsMode::precision(presets::precision(), Difficulty::Insane);
        let mut fx = Feedback::headless();
        let mut overlay = JackpotOverlay::new();
        let mut rng = Rng::new(8);
        m.start(&mut fx);
        let mut ctx = ModeContext { fx: &mut fx, overlay: &mut overlay, rng: &mut rng };
        for _ in 0..2_000 {
            m.frame(&mut ctx, 16.0);
        }
        assert_eq!(m.bar().state().target_start, 42.5);
        assert!(m.bar().state().position <= 88.0);
    }

    #[test]
    fn hits_count_without_bonus() {
        let mut m = HitsMode::chaos(presets::chaos(), Difficulty::Normal);
        let mut fx = Feedback::headless();
        let mut overlay = JackpotOverlay::new();
        let mut rng = Rng::new(8);
        m.start(&mut fx);
        let mut ctx = ModeContext { fx: &mut fx, overlay: &mut overlay, rng: &mut rng };
        m.bar_mut().place(40.0, 37.5);
        m.act(&mut ctx, Action::Press(Lane::One));
        m.act(&mut ctx, Action::Press(Lane::One));
        m.bar_mut().place(0.0, 60.0);
        m.act(&mut ctx, Action::Press(Lane::One));
        assert_eq!(m.hits(), 2);
        assert!(!m.confetti().is_empty());
    }

    #[test]
    fn resume_continues_one_step_from_the_paused_spot() {
        let mut m = HitsMode::precision(presets::precision(), Difficulty::Normal);
        let mut fx = Feedback::headless();
        let mut overlay = JackpotOverlay::new();
        let mut rng = Rng::new(8);
        m.start(&mut fx);
        let mut ctx = ModeContext { fx: &mut fx, overlay: &mut overlay, rng: &mut rng };
        // past the far bound and heading back
        for _ in 0..150 {
            m.frame(&mut ctx, 16.0);
        }
        let before = m.bar().state().clone();
        assert!(before.position > 20.0 && before.position < 80.0);

        m.pause();
        for _ in 0..30 {
            m.frame(&mut ctx, 16.0);
        }
        assert_eq!(m.bar().state(), &before);

        m.resume();
        m.frame(&mut ctx, 16.0);
        let after = m.bar().state();
        assert_eq!(after.direction, before.direction);
        assert_eq!(after.speed, before.speed);
        let step = after.position - before.position;
        assert!((step - before.speed * before.direction.sign()).abs() < 1e-9);
    }
}
