//! Two players, two bars, one shared pause. Each lane keeps its own score and
//! streak and can trigger the jackpot on its own.

use super::{Action, Lane, Mode, ModeContext, ModeKind, ModeView, show_banner};
use crate::confetti::ConfettiEmitter;
use crate::difficulty::Difficulty;
use crate::engine::{TickLoop, TimingBar, TimingBarConfig};
use crate::escalation::{EscalationHost, Milestone, OverlayConfig, Streak};
use crate::feedback::Feedback;

const SCORE_KEYS: [&str; 2] = ["comp1Score", "comp2Score"];
const STREAK_KEYS: [&str; 2] = ["comp1Streak", "comp2Streak"];
const MESSAGE: &str = "compMessage";
const BANNER: &str = "compStreakGoalBanner";
const CANVAS: &str = "compConfetti";

const HIT_MESSAGES: [[&str; 3]; 2] = [
    [
        "Player 1 has LUCK! 🍀⭐",
        "Fortune for Player 1! 💰",
        "Player 1 is lucky! 🎲",
    ],
    [
        "Player 2 has LUCK! ⭐🍀",
        "Fortune for Player 2! 💎",
        "Player 2 is lucky! 🔮",
    ],
];

struct Player {
    bar: TimingBar,
    streak: Streak,
    score: u32,
}

pub struct CompetitiveMode {
    players: [Player; 2],
    ticks: TickLoop,
    confetti: ConfettiEmitter,
}

impl CompetitiveMode {
    pub fn new(config: TimingBarConfig, difficulty: Difficulty) -> Self {
        let player = |config: TimingBarConfig| Player {
            bar: TimingBar::new(config, difficulty),
            streak: Streak::new(),
            score: 0,
        };
        Self {
            players: [player(config.clone()), player(config)],
            ticks: TickLoop::new(),
            confetti: ConfettiEmitter::new(CANVAS),
        }
    }

    pub fn score(&self, lane: Lane) -> u32 {
        self.players[lane.index()].score
    }

    pub fn streak(&self, lane: Lane) -> u32 {
        self.players[lane.index()].streak.count()
    }

    pub fn bar(&self, lane: Lane) -> &TimingBar {
        &self.players[lane.index()].bar
    }

    #[cfg(test)]
    pub(crate) fn bar_mut(&mut self, lane: Lane) -> &mut TimingBar {
        &mut self.players[lane.index()].bar
    }

    fn max_streak(&self) -> u32 {
        self.players.iter().map(|p| p.streak.count()).max().unwrap_or(0)
    }

    fn refresh_streak(&self, fx: &mut Feedback, lane: Lane) {
        fx.stat(STREAK_KEYS[lane.index()], self.streak(lane));
        show_banner(fx, BANNER, self.max_streak());
    }

    fn check_hit(&mut self, ctx: &mut ModeContext<'_>, lane: Lane) {
        if self.ticks.is_paused() || self.ticks.is_stopped() {
            return;
        }
        let player = &mut self.players[lane.index()];

        if !player.bar.hit_test() {
            player.streak.miss();
            self.refresh_streak(ctx.fx, lane);
            let text = format!("Player {} out of luck 😢", lane.number());
            ctx.fx.message(MESSAGE, &text, false);
            ctx.fx.fail();
            return;
        }

        player.score += 1;
        let milestone = player.streak.hit();
        ctx.fx.stat(SCORE_KEYS[lane.index()], player.score);
        self.refresh_streak(ctx.fx, lane);

        match milestone {
            Some(Milestone::DoubleOrNothing) => {
                self.pause();
                if !ctx.overlay.show_double_or_nothing(lane, ctx.fx, ctx.rng) {
                    self.resume();
                }
            }
            Some(Milestone::FinalJackpot) => {
                self.pause();
                if !ctx.overlay.show(OverlayConfig::default(), Some(lane), ctx.fx, ctx.rng) {
                    self.resume();
                }
            }
            None => {
                let text = ctx
                    .rng
                    .pick(&HIT_MESSAGES[lane.index()])
                    .copied()
                    .unwrap_or_default();
                ctx.fx.message(MESSAGE, text, true);
                self.confetti.launch(120, ctx.rng);
                ctx.fx.success();
            }
        }
    }
}

impl EscalationHost for CompetitiveMode {
    fn on_continue(&mut self, owner: Lane, fx: &mut Feedback) {
        self.resume();
        let text = format!("Player {} is going for streak 10! 🔥", owner.number());
        fx.message(MESSAGE, &text, true);
    }

    fn on_quit(&mut self, owner: Lane, fx: &mut Feedback) {
        self.resume();
        self.players[owner.index()].streak.reset();
        self.refresh_streak(fx, owner);
    }

    fn on_acknowledge(&mut self, owner: Lane, fx: &mut Feedback) {
        self.resume();
        let text = format!("Player {} reached LUCKY MOMENTUM! 🎰", owner.number());
        fx.message(MESSAGE, &text, true);
    }
}

impl Mode for CompetitiveMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Competitive
    }

    fn start(&mut self, fx: &mut Feedback) {
        for lane in [Lane::One, Lane::Two] {
            fx.stat(SCORE_KEYS[lane.index()], self.score(lane));
            fx.stat(STREAK_KEYS[lane.index()], self.streak(lane));
        }
        fx.clear_message(MESSAGE);
        show_banner(fx, BANNER, self.max_streak());
        self.ticks.start();
    }

    fn frame(&mut self, ctx: &mut ModeContext<'_>, dt_ms: f64) {
        if self.ticks.take_frame() {
            for player in &mut self.players {
                player.bar.tick(ctx.rng, dt_ms);
            }
        }
        self.confetti.step();
    }

    fn act(&mut self, ctx: &mut ModeContext<'_>, action: Action) {
        if let Action::Press(lane) = action {
            self.check_hit(ctx, lane);
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
        ModeView::Bars(self.players.iter().map(|p| p.bar.view()).collect())
    }

    fn confetti(&self) -> &ConfettiEmitter {
        &self.confetti
    }

    fn confetti_mut(&mut self) -> &mut ConfettiEmitter {
        &mut self.confetti
    }
}
