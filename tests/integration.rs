// Native integration tests: modes, escalation and session flow driven through
// the public API with recording feedback doubles. No DOM involved.

use std::cell::RefCell;
use std::rc::Rc;

use mr_lucky::difficulty::Difficulty;
use mr_lucky::engine::presets;
use mr_lucky::error::AudioError;
use mr_lucky::escalation::{Dismissal, JackpotOverlay, Phase};
use mr_lucky::feedback::{AudioCue, Cue, Feedback, Presenter};
use mr_lucky::modes::{Action, IndividualMode, Lane, Mode, ModeContext, ModeKind, ModeView};
use mr_lucky::rng::Rng;
use mr_lucky::router::Screen;
use mr_lucky::session::Session;

#[derive(Default)]
struct Record {
    cues: Vec<Cue>,
    stats: Vec<(String, String)>,
    messages: Vec<(String, String, bool)>,
    banners: Vec<(String, bool)>,
}

impl Record {
    fn last_stat(&self, key: &str) -> Option<&str> {
        self.stats
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

struct Recorder(Rc<RefCell<Record>>);

impl AudioCue for Recorder {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        self.0.borrow_mut().cues.push(cue);
        Ok(())
    }

    fn set_music(&mut self, _on: bool) -> Result<(), AudioError> {
        Ok(())
    }
}

impl Presenter for Recorder {
    fn update_stat(&mut self, key: &str, value: &str) {
        self.0.borrow_mut().stats.push((key.into(), value.into()));
    }

    fn show_message(&mut self, key: &str, text: &str, success: bool) {
        self.0
            .borrow_mut()
            .messages
            .push((key.into(), text.into(), success));
    }

    fn clear_message(&mut self, _key: &str) {}

    fn show_banner(&mut self, key: &str, _text: &str, highlighted: bool) {
        self.0.borrow_mut().banners.push((key.into(), highlighted));
    }
}

fn recording() -> (Feedback, Rc<RefCell<Record>>) {
    let record = Rc::new(RefCell::new(Record::default()));
    let fx = Feedback::new(
        Box::new(Recorder(record.clone())),
        Box::new(Recorder(record.clone())),
    );
    (fx, record)
}

struct Rig {
    fx: Feedback,
    overlay: JackpotOverlay,
    rng: Rng,
    record: Rc<RefCell<Record>>,
}

impl Rig {
    fn new(seed: u64) -> Self {
        let (fx, record) = recording();
        Self {
            fx,
            overlay: JackpotOverlay::new(),
            rng: Rng::new(seed),
            record,
        }
    }

    fn ctx(&mut self) -> ModeContext<'_> {
        ModeContext {
            fx: &mut self.fx,
            overlay: &mut self.overlay,
            rng: &mut self.rng,
        }
    }
}

/// Advance frames until the marker sits on the target, then press.
fn land_hit(mode: &mut IndividualMode, rig: &mut Rig) {
    for _ in 0..20_000 {
        if mode.bar().hit_test() {
            mode.act(&mut rig.ctx(), Action::Press(Lane::One));
            return;
        }
        mode.frame(&mut rig.ctx(), 16.0);
    }
    panic!("marker never crossed the target");
}

fn started_individual(rig: &mut Rig) -> IndividualMode {
    let mut mode = IndividualMode::new(presets::individual(), Difficulty::Normal);
    mode.start(&mut rig.fx);
    mode
}

#[test]
fn bar_stays_on_track_for_every_difficulty() {
    let mut rng = Rng::new(11);
    for d in Difficulty::ALL {
        let mut mode = IndividualMode::new(presets::individual(), d);
        mode.start(&mut Feedback::headless());
        let mut fx = Feedback::headless();
        let mut overlay = JackpotOverlay::new();
        for _ in 0..5_000 {
            let mut ctx = ModeContext {
                fx: &mut fx,
                overlay: &mut overlay,
                rng: &mut rng,
            };
            mode.frame(&mut ctx, 16.0);
            let st = mode.bar().state();
            let cfg = mode.bar().config();
            assert!(st.position >= 0.0 && st.position <= cfg.max_travel);
            assert!(st.target_start >= 0.0 && st.target_start + cfg.target_width <= 100.0);
        }
    }
}

#[test]
fn fifth_hit_offers_double_or_nothing() {
    let mut rig = Rig::new(3);
    let mut mode = started_individual(&mut rig);
    for _ in 0..5 {
        land_hit(&mut mode, &mut rig);
    }
    assert_eq!(mode.streak(), 5);
    assert_eq!(mode.points(), 10 + 20 + 30 + 40 + 50);
    assert!(rig.overlay.is_open());
    assert!(rig.overlay.forfeit_offered());
    assert!(mode.is_paused());
    assert_eq!(rig.record.borrow().last_stat("indStreak"), Some("5"));
    assert!(rig.record.borrow().banners.last().is_some_and(|(_, hl)| *hl));

    // frozen while the prompt is up
    let before = mode.view();
    for _ in 0..30 {
        mode.frame(&mut rig.ctx(), 16.0);
    }
    assert_eq!(mode.view(), before);
}

#[test]
fn forfeit_resets_streak_exactly_once() {
    let mut rig = Rig::new(5);
    let mut mode = started_individual(&mut rig);
    for _ in 0..5 {
        land_hit(&mut mode, &mut rig);
    }
    assert!(rig.overlay.dismiss(Dismissal::Forfeit, &mut mode, &mut rig.fx));
    assert!(!rig.overlay.dismiss(Dismissal::Primary, &mut mode, &mut rig.fx));
    assert_eq!(mode.streak(), 0);
    assert_eq!(mode.points(), 150);
    assert!(!mode.is_paused());
    assert_eq!(rig.overlay.phase(), Phase::Idle);
}

#[test]
fn continuing_to_ten_reaches_the_final_jackpot() {
    let mut rig = Rig::new(8);
    let mut mode = started_individual(&mut rig);
    for _ in 0..5 {
        land_hit(&mut mode, &mut rig);
    }
    assert!(rig.overlay.dismiss(Dismissal::Backdrop, &mut mode, &mut rig.fx));
    assert_eq!(mode.streak(), 5);
    for _ in 0..5 {
        land_hit(&mut mode, &mut rig);
    }
    assert_eq!(mode.streak(), 10);
    assert!(rig.overlay.is_open());
    assert!(!rig.overlay.forfeit_offered());
    assert!(rig.record.borrow().cues.contains(&Cue::Explosion));

    rig.overlay.dismiss(Dismissal::Primary, &mut mode, &mut rig.fx);
    assert!(!mode.is_paused());
    let record = rig.record.borrow();
    let (_, text, ok) = record.messages.last().expect("acknowledged");
    assert!(*ok);
    assert!(text.contains("LUCKY MOMENTUM"));
}

#[test]
fn a_miss_resets_the_streak() {
    let mut rig = Rig::new(13);
    let mut mode = started_individual(&mut rig);
    land_hit(&mut mode, &mut rig);
    land_hit(&mut mode, &mut rig);
    while mode.bar().hit_test() {
        mode.frame(&mut rig.ctx(), 16.0);
    }
    mode.act(&mut rig.ctx(), Action::Press(Lane::One));
    assert_eq!(mode.streak(), 0);
    assert_eq!(mode.points(), 30);
    assert_eq!(rig.record.borrow().cues.last(), Some(&Cue::Fail));
}

#[test]
fn teardown_makes_the_mode_inert() {
    let mut rig = Rig::new(2);
    let mut mode = started_individual(&mut rig);
    mode.frame(&mut rig.ctx(), 16.0);
    mode.teardown();
    let before = mode.view();
    for _ in 0..20 {
        mode.frame(&mut rig.ctx(), 16.0);
        mode.act(&mut rig.ctx(), Action::Press(Lane::One));
    }
    assert_eq!(mode.view(), before);
    assert_eq!(mode.points(), 0);
    assert!(mode.confetti().is_empty());
}

#[test]
fn session_walks_menu_difficulty_and_mode() {
    let mut s = Session::headless(21);
    s.open();
    assert_eq!(s.active_screen(), Some(Screen::Welcome));
    s.enter_menu();
    assert!(s.select_mode("competitive"));
    s.choose_difficulty("hard");
    assert_eq!(s.active_screen(), Some(Screen::Competitive));

    let first = s.mode().map(|m| m.view());
    for _ in 0..10 {
        s.frame(16.0);
    }
    let later = s.mode().map(|m| m.view());
    assert_ne!(first, later);
    assert!(matches!(later, Some(ModeView::Bars(ref bars)) if bars.len() == 2));

    s.back();
    assert_eq!(s.active_screen(), Some(Screen::Main));
    assert!(s.mode().is_none());
}

#[test]
fn unknown_difficulty_runs_as_normal() {
    let mut s = Session::headless(1);
    s.enter_menu();
    s.select_mode("precision");
    s.choose_difficulty("nightmare");
    assert_eq!(s.difficulty(), Difficulty::Normal);
    assert_eq!(s.mode().map(|m| m.kind()), Some(ModeKind::Precision));
}

#[test]
fn stopping_a_mode_abandons_its_overlay() {
    let mut s = Session::headless(4);
    s.start_mode(ModeKind::Wheel);
    s.act(Action::Press(Lane::One));
    // spin, land, then wait out the jackpot delay; rolls until the top segment comes up
    for _ in 0..200 {
        if s.overlay().is_open() {
            break;
        }
        for _ in 0..300 {
            s.frame(16.0);
        }
        s.act(Action::Press(Lane::One));
    }
    assert!(s.overlay().is_open());
    s.back();
    assert!(!s.overlay().is_open());
    assert!(!s.dismiss_overlay(Dismissal::Primary));
}

#[test]
fn input_under_the_overlay_is_ignored() {
    let mut s = Session::headless(4);
    s.start_mode(ModeKind::Race);
    // countdown
    for _ in 0..300 {
        s.frame(16.0);
    }
    for _ in 0..200 {
        s.act(Action::Press(Lane::One));
    }
    assert!(s.overlay().is_open());
    let before = s.mode().map(|m| m.view());
    s.act(Action::Press(Lane::Two));
    assert_eq!(s.mode().map(|m| m.view()), before);
    assert!(s.dismiss_overlay(Dismissal::Primary));
    assert!(!s.mode().is_some_and(|m| m.is_paused()));
}
