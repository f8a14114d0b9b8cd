//! The jackpot overlay: a full-screen interstitial that holds the owning mode
//! paused until the player dismisses it.
//!
//! Every dismissal path (primary button, backdrop, forfeit button) funnels
//! through [`JackpotOverlay::dismiss`], which takes the pending callback out of
//! the overlay before delivering it. A second dismissal therefore finds nothing
//! to deliver.

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::confetti::ConfettiEmitter;
use crate::feedback::Feedback;
use crate::modes::Lane;
use crate::rng::Rng;

pub const OVERLAY_CANVAS: &str = "jackpotConfetti";

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlayConfig {
    pub title: String,
    pub subtitle: String,
    pub text: String,
    pub subtext: String,
    pub cta: String,
    pub button_text: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            title: "LUCKY MOMENTUM!".into(),
            subtitle: "🔥 MAXIMUM LUCK REACHED 🔥".into(),
            text: "CONGRATULATIONS!".into(),
            subtext: "You have proven an incredible fortune".into(),
            cta: "🎲 Time to go play BINGO! 🎰".into(),
            button_text: "Keep Playing".into(),
        }
    }
}

impl OverlayConfig {
    pub fn double_or_nothing() -> Self {
        Self {
            title: "STREAK 5!".into(),
            subtitle: "🔥 DOUBLE OR NOTHING 🔥".into(),
            text: "INCREDIBLE LUCK!".into(),
            subtext: "Keep going and risk your streak?".into(),
            cta: "🎲 Reach streak 10 for the FINAL LUCKY MOMENTUM 🎰".into(),
            button_text: "YES, keep going!".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingChoice,
}

/// How the player closed the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dismissal {
    /// The main call-to-action button.
    Primary,
    /// A tap on the dimmed backdrop; treated like `Primary`.
    Backdrop,
    /// The explicit "take the loss" button of a double-or-nothing prompt.
    Forfeit,
}

/// Receiver of overlay callbacks, tagged with the lane that triggered them.
pub trait EscalationHost {
    fn on_continue(&mut self, owner: Lane, fx: &mut Feedback);
    fn on_quit(&mut self, owner: Lane, fx: &mut Feedback);
    fn on_acknowledge(&mut self, owner: Lane, fx: &mut Feedback);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Choice(Lane),
    Close(Lane),
}

/// Recurring confetti while the overlay is up.
#[derive(Clone, Debug)]
struct BurstSchedule {
    interval_ms: f64,
    particles: usize,
    remaining: Option<u32>,
    elapsed_ms: f64,
}

impl BurstSchedule {
    /// Number of bursts due after `dt_ms` more milliseconds.
    fn advance(&mut self, dt_ms: f64) -> u32 {
        self.elapsed_ms += dt_ms.max(0.0);
        let mut due = 0;
        while self.elapsed_ms >= self.interval_ms && self.remaining != Some(0) {
            self.elapsed_ms -= self.interval_ms;
            if let Some(left) = self.remaining.as_mut() {
                *left -= 1;
            }
            due += 1;
        }
        due
    }
}

pub struct JackpotOverlay {
    phase: Phase,
    pending: Option<Pending>,
    content: OverlayConfig,
    forfeit_offered: bool,
    bursts: Option<BurstSchedule>,
    confetti: ConfettiEmitter,
    revision: u64,
}

impl Default for JackpotOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl JackpotOverlay {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            pending: None,
            content: OverlayConfig::default(),
            forfeit_offered: false,
            bursts: None,
            confetti: ConfettiEmitter::new(OVERLAY_CANVAS),
            revision: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == Phase::AwaitingChoice
    }

    pub fn content(&self) -> &OverlayConfig {
        &self.content
    }

    /// Whether the forfeit button should be visible.
    pub fn forfeit_offered(&self) -> bool {
        self.forfeit_offered
    }

    /// Bumped on every open/close so renderers can skip unchanged frames.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn confetti(&self) -> &ConfettiEmitter {
        &self.confetti
    }

    pub fn confetti_mut(&mut self) -> &mut ConfettiEmitter {
        &mut self.confetti
    }

    /// Open the celebratory overlay. `on_close` names the lane whose owner gets
    /// `on_acknowledge` when it is dismissed. Refused while already open.
    pub fn show(
        &mut self,
        config: OverlayConfig,
        on_close: Option<Lane>,
        fx: &mut Feedback,
        rng: &mut Rng,
    ) -> bool {
        if self.is_open() {
            log::warn!("jackpot overlay already open, ignoring '{}'", config.title);
            return false;
        }
        log::info!("jackpot: {}", config.title);
        self.open(config, on_close.map(Pending::Close), false);
        self.confetti.launch(300, rng);
        fx.explosion();
        self.bursts = Some(BurstSchedule {
            interval_ms: 1500.0,
            particles: 150,
            remaining: None,
            elapsed_ms: 0.0,
        });
        true
    }

    /// Open the streak-5 prompt. Exactly one of `on_continue` / `on_quit` is
    /// delivered to the host for `owner` on dismissal.
    pub fn show_double_or_nothing(&mut self, owner: Lane, fx: &mut Feedback, rng: &mut Rng) -> bool {
        if self.is_open() {
            log::warn!("jackpot overlay already open, ignoring double-or-nothing");
            return false;
        }
        log::info!("double or nothing offered to {owner:?}");
        self.open(OverlayConfig::double_or_nothing(), Some(Pending::Choice(owner)), true);
        self.confetti.launch(200, rng);
        fx.success();
        self.bursts = Some(BurstSchedule {
            interval_ms: 1000.0,
            particles: 100,
            remaining: Some(3),
            elapsed_ms: 0.0,
        });
        true
    }

    fn open(&mut self, config: OverlayConfig, pending: Option<Pending>, forfeit: bool) {
        self.content = config;
        self.pending = pending;
        self.forfeit_offered = forfeit;
        self.phase = Phase::AwaitingChoice;
        self.revision += 1;
    }

    /// Close the overlay and deliver its pending callback, at most once.
    /// Returns false if the overlay was not open.
    pub fn dismiss<H>(&mut self, how: Dismissal, host: &mut H, fx: &mut Feedback) -> bool
    where
        H: EscalationHost + ?Sized,
    {
        if !self.is_open() {
            return false;
        }
        let pending = self.pending.take();
        self.hide();
        match (pending, how) {
            (Some(Pending::Choice(owner)), Dismissal::Forfeit) => {
                log::info!("{owner:?} forfeits the streak");
                host.on_quit(owner, fx);
            }
            (Some(Pending::Choice(owner)), _) => {
                log::info!("{owner:?} doubles down");
                host.on_continue(owner, fx);
            }
            (Some(Pending::Close(owner)), _) => host.on_acknowledge(owner, fx),
            (None, _) => {}
        }
        true
    }

    /// Close without delivering anything (the owning mode is gone).
    pub fn abandon(&mut self) {
        if self.is_open() {
            log::debug!("jackpot overlay abandoned");
            self.pending = None;
            self.hide();
        }
    }

    fn hide(&mut self) {
        self.phase = Phase::Idle;
        self.forfeit_offered = false;
        self.bursts = None;
        self.confetti.clear();
        self.revision += 1;
    }

    /// Advance recurring bursts and the overlay's own particles.
    pub fn frame(&mut self, dt_ms: f64, rng: &mut Rng) {
        if let Some(schedule) = self.bursts.as_mut() {
            let due = schedule.advance(dt_ms);
            let particles = schedule.particles;
            for _ in 0..due {
                self.confetti.launch(particles, rng);
            }
        }
        self.confetti.step();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Calls {
        cont: Vec<Lane>,
        quit: Vec<Lane>,
        ack: Vec<Lane>,
    }

    impl EscalationHost for Calls {
        fn on_continue(&mut self, owner: Lane, _fx: &mut Feedback) {
            self.cont.push(owner);
        }
        fn on_quit(&mut self, owner: Lane, _fx: &mut Feedback) {
            self.quit.push(owner);
        }
        fn on_acknowledge(&mut self, owner: Lane, _fx: &mut Feedback) {
            self.ack.push(owner);
        }
    }

    #[test]
    fn capped_schedule_stops_after_three() {
        let mut s = BurstSchedule {
            interval_ms: 1000.0,
            particles: 100,
            remaining: Some(3),
            elapsed_ms: 0.0,
        };
        assert_eq!(s.advance(999.0), 0);
        assert_eq!(s.advance(2.0), 1);
        assert_eq!(s.advance(10_000.0), 2);
        assert_eq!(s.advance(10_000.0), 0);
    }

    #[test]
    fn uncapped_schedule_keeps_going() {
        let mut s = BurstSchedule {
            interval_ms: 1500.0,
            particles: 150,
            remaining: None,
            elapsed_ms: 0.0,
        };
        assert_eq!(s.advance(15_000.0), 10);
        assert_eq!(s.advance(1_500.0), 1);
    }

    #[test]
    fn backdrop_on_prompt_continues() {
        let mut fx = Feedback::headless();
        let mut rng = Rng::new(1);
        let mut o = JackpotOverlay::new();
        let mut host = Calls::default();
        assert!(o.show_double_or_nothing(Lane::Two, &mut fx, &mut rng));
        assert!(o.forfeit_offered());
        assert!(o.dismiss(Dismissal::Backdrop, &mut host, &mut fx));
        assert!(!o.dismiss(Dismissal::Primary, &mut host, &mut fx));
        assert_eq!(host.cont, vec![Lane::Two]);
        assert!(host.quit.is_empty());
    }

    #[test]
    fn second_show_while_open_is_refused() {
        let mut fx = Feedback::headless();
        let mut rng = Rng::new(1);
        let mut o = JackpotOverlay::new();
        assert!(o.show(OverlayConfig::default(), Some(Lane::One), &mut fx, &mut rng));
        assert!(!o.show_double_or_nothing(Lane::Two, &mut fx, &mut rng));
        let mut host = Calls::default();
        o.dismiss(Dismissal::Forfeit, &mut host, &mut fx);
        assert_eq!(host.ack, vec![Lane::One]);
        assert!(host.quit.is_empty());
    }

    #[test]
    fn close_clears_confetti_and_bursts() {
        let mut fx = Feedback::headless();
        let mut rng = Rng::new(4);
        let mut o = JackpotOverlay::new();
        o.show(OverlayConfig::default(), None, &mut fx, &mut rng);
        o.frame(1600.0, &mut rng);
        assert!(!o.confetti().is_empty());
        o.dismiss(Dismissal::Primary, &mut Calls::default(), &mut fx);
        assert!(o.confetti().is_empty());
        o.frame(5000.0, &mut rng);
        assert!(o.confetti().is_empty());
        assert_eq!(o.phase(), Phase::Idle);
    }

    #[test]
    fn abandon_delivers_nothing() {
        let mut fx = Feedback::headless();
        let mut rng = Rng::new(4);
        let mut o = JackpotOverlay::new();
        let mut host = Calls::default();
        o.show_double_or_nothing(Lane::One, &mut fx, &mut rng);
        o.abandon();
        assert!(!o.dismiss(Dismissal::Primary, &mut host, &mut fx));
        assert!(host.cont.is_empty() && host.quit.is_empty() && host.ack.is_empty());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn config_fields_default_individually() {
        let cfg: OverlayConfig =
            serde_json::from_str(r#"{ "title": "WINNER!", "button_text": "Back" }"#).unwrap();
        assert_eq!(cfg.title, "WINNER!");
        assert_eq!(cfg.button_text, "Back");
        assert_eq!(cfg.cta, OverlayConfig::default().cta);
    }
}
