//! Two-lane tap race with a 3-2-1 countdown.

use super::{Action, Lane, Mode, ModeContext, ModeKind, ModeView};
use crate::confetti::ConfettiEmitter;
use crate::difficulty::{Difficulty, SpeedTable};
use crate::engine::TickLoop;
use crate::escalation::{EscalationHost, OverlayConfig};
use crate::feedback::Feedback;

/// Distance a runner covers to win.
pub const FINISH_LINE: f64 = 270.0;

const TAP_STEP: SpeedTable = SpeedTable::new(4.0, 3.0, 2.5, 2.0);
const COUNT_MS: f64 = 1000.0;
const GO_HOLD_MS: f64 = 500.0;

const INSTRUCTION: &str = "raceInstruction";
const MESSAGE: &str = "raceMessage";
const CANVAS: &str = "raceConfetti";

const COUNTDOWN_LABELS: [&str; 3] = ["1", "2", "3"];

const WIN_MESSAGES: [&str; 3] = [
    "🏆 {name} WINS! WHAT LUCK! 🏆",
    "🎉 {name} IS THE LUCKIEST! 🎉",
    "⭐ {name} HAS ALL THE FORTUNE! ⭐",
];

#[derive(Clone, Copy, Debug, PartialEq)]
enum Stage {
    Countdown { left: u32, elapsed_ms: f64 },
    Go { elapsed_ms: f64 },
    Running,
    Finished(Lane),
}

pub struct RaceMode {
    step: f64,
    runners: [f64; 2],
    stage: Stage,
    ticks: TickLoop,
    confetti: ConfettiEmitter,
    win_message: Option<String>,
}

fn runner_name(lane: Lane) -> &'static str {
    match lane {
        Lane::One => "Player 1 🍀",
        Lane::Two => "Player 2 ⭐",
    }
}

impl RaceMode {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            step: TAP_STEP.get(difficulty),
            runners: [0.0; 2],
            stage: Stage::Countdown { left: 3, elapsed_ms: 0.0 },
            ticks: TickLoop::new(),
            confetti: ConfettiEmitter::new(CANVAS),
            win_message: None,
        }
    }

    pub fn runners(&self) -> [f64; 2] {
        self.runners
    }

    pub fn is_running(&self) -> bool {
        self.stage == Stage::Running
    }

    pub fn winner(&self) -> Option<Lane> {
        match self.stage {
            Stage::Finished(lane) => Some(lane),
            _ => None,
        }
    }

    pub fn countdown_label(&self) -> Option<&'static str> {
        match self.stage {
            Stage::Countdown { left, .. } => {
                (left as usize).checked_sub(1).and_then(|i| COUNTDOWN_LABELS.get(i)).copied()
            }
            Stage::Go { .. } => Some("GO!"),
            _ => None,
        }
    }

    fn advance_countdown(&mut self, fx: &mut Feedback, dt_ms: f64) {
        self.stage = match self.stage {
            Stage::Countdown { left, elapsed_ms } => {
                let elapsed_ms = elapsed_ms + dt_ms;
                if elapsed_ms < COUNT_MS {
                    Stage::Countdown { left, elapsed_ms }
                } else if left > 1 {
                    Stage::Countdown { left: left - 1, elapsed_ms: elapsed_ms - COUNT_MS }
                } else {
                    Stage::Go { elapsed_ms: elapsed_ms - COUNT_MS }
                }
            }
            Stage::Go { elapsed_ms } => {
                let elapsed_ms = elapsed_ms + dt_ms;
                if elapsed_ms < GO_HOLD_MS {
                    Stage::Go { elapsed_ms }
                } else {
                    log::debug!("race started");
                    fx.stat(INSTRUCTION, "Tap your lane fast to move ahead!");
                    Stage::Running
                }
            }
            other => other,
        };
    }

    fn tap(&mut self, ctx: &mut ModeContext<'_>, lane: Lane) {
        if !self.is_running() || self.ticks.is_paused() {
            return;
        }
        let runner = &mut self.runners[lane.index()];
        if *runner >= FINISH_LINE {
            return;
        }
        *runner += self.step;
        if *runner >= FINISH_LINE {
            self.finish(ctx, lane);
        }
    }

    fn finish(&mut self, ctx: &mut ModeContext<'_>, lane: Lane) {
        let name = runner_name(lane);
        log::info!("race won by {name}");
        self.stage = Stage::Finished(lane);
        self.pause();
        let template = ctx.rng.pick(&WIN_MESSAGES).copied().unwrap_or(WIN_MESSAGES[0]);
        self.win_message = Some(template.replace("{name}", name));
        let config = OverlayConfig {
            title: "WINNER!".into(),
            subtitle: format!("🏆 {name} WINS THE RACE 🏆"),
            text: "CONGRATULATIONS!".into(),
            subtext: "Fortune was on your side".into(),
            cta: "🎲 Time to go play BINGO! 🎰".into(),
            button_text: "Back to Menu".into(),
        };
        if !ctx.overlay.show(config, Some(lane), ctx.fx, ctx.rng) {
            self.resume();
        }
    }
}

impl EscalationHost for RaceMode {
    fn on_continue(&mut self, _owner: Lane, _fx: &mut Feedback) {
        self.resume();
    }

    fn on_quit(&mut self, _owner: Lane, _fx: &mut Feedback) {
        self.resume();
    }

    fn on_acknowledge(&mut self, owner: Lane, fx: &mut Feedback) {
        self.resume();
        let text = self
            .win_message
            .take()
            .unwrap_or_else(|| format!("🏆 {} WINS! 🏆", runner_name(owner)));
        fx.message(MESSAGE, &text, true);
    }
}

impl Mode for RaceMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Race
    }

    fn start(&mut self, fx: &mut Feedback) {
        fx.clear_message(MESSAGE);
        fx.stat(INSTRUCTION, "Get ready!");
        self.ticks.start();
    }

    fn frame(&mut self, ctx: &mut ModeContext<'_>, dt_ms: f64) {
        if self.ticks.take_frame() {
            self.advance_countdown(ctx.fx, dt_ms);
        }
        self.confetti.step();
    }

    fn act(&mut self, ctx: &mut ModeContext<'_>, action: Action) {
        if let Action::Press(lane) = action {
            self.tap(ctx, lane);
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
        ModeView::Race {
            runners: self.runners,
            countdown: self.countdown_label(),
        }
    }

    fn confetti(&self) -> &ConfettiEmitter {
        &self.confetti
    }

    fn confetti_mut(&mut self) -> &mut ConfettiEmitter {
        &mut self.confetti
    }
}
