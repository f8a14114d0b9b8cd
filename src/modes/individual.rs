//! Single-player timing bar with jittered speed, a wandering target and the
//! streak jackpot.

use super::{Action, Lane, Mode, ModeContext, ModeKind, ModeView, show_banner};
use crate::confetti::ConfettiEmitter;
use crate::difficulty::Difficulty;
use crate::engine::{TickLoop, TimingBar, TimingBarConfig};
use crate::escalation::{EscalationHost, Milestone, OverlayConfig, Streak};
use crate::feedback::Feedback;

const POINTS: &str = "indPoints";
const STREAK: &str = "indStreak";
const MESSAGE: &str = "indMessage";
const BANNER: &str = "streakGoalBanner";
const CANVAS: &str = "indConfetti";

const HIT_MESSAGES: [&str; 4] = [
    "LUCK IS ON YOUR SIDE! 🍀✨",
    "INCREDIBLE FORTUNE! 💰🎯",
    "YOU'RE A LUCKY ONE! ⭐💎",
    "WHAT LUCK YOU HAVE! 🎲🔮",
];

const MISS_MESSAGES: [&str; 3] = [
    "Bad luck! Try again 🎲",
    "Fortune isn't with you! 😢",
    "So close! Have another go 🍀",
];

pub struct IndividualMode {
    bar: TimingBar,
    ticks: TickLoop,
    streak: Streak,
    points: u32,
    confetti: ConfettiEmitter,
}

impl IndividualMode {
    pub fn new(config: TimingBarConfig, difficulty: Difficulty) -> Self {
        Self {
            bar: TimingBar::new(config, difficulty),
            ticks: TickLoop::new(),
            streak: Streak::new(),
            points: 0,
            confetti: ConfettiEmitter::new(CANVAS),
        }
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn streak(&self) -> u32 {
        self.streak.count()
    }

    pub fn bar(&self) -> &TimingBar {
        &self.bar
    }

    #[cfg(test)]
    pub(crate) fn bar_mut(&mut self) -> &mut TimingBar {
        &mut self.bar
    }

    fn check_hit(&mut self, ctx: &mut ModeContext<'_>) {
        if self.ticks.is_paused() || self.ticks.is_stopped() {
            return;
        }

        if !self.bar.hit_test() {
            self.streak.miss();
            ctx.fx.stat(STREAK, self.streak.count());
            show_banner(ctx.fx, BANNER, self.streak.count());
            let text = ctx.rng.pick(&MISS_MESSAGES).copied().unwrap_or_default();
            ctx.fx.message(MESSAGE, text, false);
            ctx.fx.fail();
            return;
        }

        // bonus grows with the streak held before this hit
        self.points += 10 * (self.streak.count() + 1);
        let milestone = self.streak.hit();
        ctx.fx.stat(POINTS, self.points);
        ctx.fx.stat(STREAK, self.streak.count());
        show_banner(ctx.fx, BANNER, self.streak.count());

        match milestone {
            Some(Milestone::DoubleOrNothing) => {
                self.pause();
                if !ctx.overlay.show_double_or_nothing(Lane::One, ctx.fx, ctx.rng) {
                    self.resume();
                }
            }
            Some(Milestone::FinalJackpot) => {
                self.pause();
                if !ctx.overlay.show(OverlayConfig::default(), Some(Lane::One), ctx.fx, ctx.rng) {
                    self.resume();
                }
            }
            None => {
                let text = ctx.rng.pick(&HIT_MESSAGES).copied().unwrap_or_default();
                ctx.fx.message(MESSAGE, text, true);
                self.confetti.launch(150, ctx.rng);
                ctx.fx.success();
            }
        }
    }
}

impl EscalationHost for IndividualMode {
    fn on_continue(&mut self, _owner: Lane, fx: &mut Feedback) {
        self.resume();
        fx.message(MESSAGE, "Going for streak 10! 🔥", true);
    }

    fn on_quit(&mut self, _owner: Lane, fx: &mut Feedback) {
        self.resume();
        self.streak.reset();
        fx.stat(STREAK, self.streak.count());
        show_banner(fx, BANNER, self.streak.count());
    }

    fn on_acknowledge(&mut self, _owner: Lane, fx: &mut Feedback) {
        self.resume();
        fx.message(MESSAGE, "LUCKY MOMENTUM reached! 🎰", true);
    }
}

impl Mode for IndividualMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Individual
    }

    fn start(&mut self, fx: &mut Feedback) {
        fx.stat(POINTS, self.points);
        fx.stat(STREAK, self.streak.count());
        fx.clear_message(MESSAGE);
        show_banner(fx, BANNER, self.streak.count());
        self.ticks.start();
    }

    fn frame(&mut self, ctx: &mut ModeContext<'_>, dt_ms: f64) {
        if self.ticks.take_frame() {
            self.bar.tick(ctx.rng, dt_ms);
        }
        self.confetti.step();
    }

    fn act(&mut self, ctx: &mut ModeContext<'_>, action: Action) {
        if let Action::Press(_) = action {
            self.check_hit(ctx);
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
