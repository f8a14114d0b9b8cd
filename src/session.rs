//! One player session: screen flow, the active mode and everything the modes
//! share. There is no global game state; the web layer owns one `Session`.

use crate::difficulty::Difficulty;
use crate::engine::Presets;
#[cfg(feature = "serde_json")]
use crate::error::GameError;
use crate::escalation::{Dismissal, JackpotOverlay};
use crate::feedback::Feedback;
use crate::modes::{self, Action, Mode, ModeContext, ModeKind, SlotLayout};
use crate::rng::Rng;
use crate::router::{Screen, ScreenRouter, ScreenSurface};

pub struct Session {
    router: ScreenRouter,
    fx: Feedback,
    overlay: JackpotOverlay,
    presets: Presets,
    ritual_layout: SlotLayout,
    rng: Rng,
    mode: Option<Box<dyn Mode>>,
    selected: Option<ModeKind>,
    difficulty: Difficulty,
}

impl Session {
    pub fn new(surface: Box<dyn ScreenSurface>, fx: Feedback, rng: Rng) -> Self {
        Self {
            router: ScreenRouter::new(surface),
            fx,
            overlay: JackpotOverlay::new(),
            presets: Presets::default(),
            ritual_layout: SlotLayout::default(),
            rng,
            mode: None,
            selected: None,
            difficulty: Difficulty::default(),
        }
    }

    /// A session with no DOM and no sound.
    pub fn headless(seed: u64) -> Self {
        Self::new(Box::new(()), Feedback::headless(), Rng::new(seed))
    }

    pub fn open(&mut self) {
        self.router.show(Screen::Welcome);
    }

    pub fn enter_menu(&mut self) {
        self.router.show(Screen::Main);
    }

    /// Pick a mode from the main menu. Modes with difficulty levels go to the
    /// difficulty screen; the rest start right away.
    pub fn select_mode(&mut self, name: &str) -> bool {
        let Some(kind) = ModeKind::from_name(name) else {
            log::warn!("unknown mode '{name}'");
            return false;
        };
        if kind.uses_difficulty() {
            self.stop_mode();
            self.selected = Some(kind);
            self.router.show(Screen::Difficulty);
        } else {
            self.start_mode(kind);
        }
        true
    }

    pub fn choose_difficulty(&mut self, key: &str) {
        self.difficulty = Difficulty::from_key(key);
        match self.selected {
            Some(kind) => self.start_mode(kind),
            None => log::warn!("difficulty '{key}' chosen with no mode selected"),
        }
    }

    /// Tear down whatever runs, then build and start `kind`.
    pub fn start_mode(&mut self, kind: ModeKind) {
        self.stop_mode();
        self.router.show(kind.screen());
        let mut mode = modes::build(kind, self.difficulty, &self.presets, self.ritual_layout);
        log::info!("starting {kind:?} on {}", self.difficulty.key());
        mode.start(&mut self.fx);
        self.selected = Some(kind);
        self.mode = Some(mode);
    }

    /// Cancel the running mode. An open overlay is closed without delivering
    /// its callback.
    pub fn stop_mode(&mut self) {
        self.overlay.abandon();
        if let Some(mut mode) = self.mode.take() {
            log::info!("stopping {:?}", mode.kind());
            mode.teardown();
        }
    }

    pub fn back(&mut self) {
        self.stop_mode();
        self.router.show(Screen::Main);
    }

    pub fn frame(&mut self, dt_ms: f64) {
        self.overlay.frame(dt_ms, &mut self.rng);
        if let Some(mode) = self.mode.as_mut() {
            let mut ctx = ModeContext {
                fx: &mut self.fx,
                overlay: &mut self.overlay,
                rng: &mut self.rng,
            };
            mode.frame(&mut ctx, dt_ms);
        }
    }

    pub fn act(&mut self, action: Action) {
        if self.overlay.is_open() {
            log::debug!("{action:?} ignored under the overlay");
            return;
        }
        if let Some(mode) = self.mode.as_mut() {
            let mut ctx = ModeContext {
                fx: &mut self.fx,
                overlay: &mut self.overlay,
                rng: &mut self.rng,
            };
            mode.act(&mut ctx, action);
        }
    }

    pub fn dismiss_overlay(&mut self, how: Dismissal) -> bool {
        match self.mode.as_deref_mut() {
            Some(mode) => self.overlay.dismiss(how, mode, &mut self.fx),
            None => {
                self.overlay.abandon();
                false
            }
        }
    }

    pub fn toggle_music(&mut self) -> bool {
        self.fx.toggle_music()
    }

    /// Replace the timing-bar presets. Takes effect on the next mode start.
    #[cfg(feature = "serde_json")]
    pub fn load_presets(&mut self, json: &str) -> Result<(), GameError> {
        self.presets = Presets::from_json(json)?;
        log::info!("presets reloaded");
        Ok(())
    }

    /// Which tray item each ritual slot accepts. Takes effect on the next
    /// ritual start.
    pub fn set_ritual_layout(&mut self, layout: SlotLayout) {
        self.ritual_layout = layout;
    }

    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    pub fn active_screen(&self) -> Option<Screen> {
        self.router.active()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn selected(&self) -> Option<ModeKind> {
        self.selected
    }

    pub fn mode(&self) -> Option<&dyn Mode> {
        self.mode.as_deref()
    }

    pub fn mode_mut(&mut self) -> Option<&mut (dyn Mode + 'static)> {
        self.mode.as_deref_mut()
    }

    pub fn overlay(&self) -> &JackpotOverlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut JackpotOverlay {
        &mut self.overlay
    }

    pub fn music_on(&self) -> bool {
        self.fx.music_on()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_screen_skipped_for_wheel_and_ritual() {
        let mut s = Session::headless(1);
        s.open();
        s.enter_menu();
        assert!(s.select_mode("individual"));
        assert_eq!(s.active_screen(), Some(Screen::Difficulty));
        assert!(s.mode().is_none());

        s.choose_difficulty("insane");
        assert_eq!(s.active_screen(), Some(Screen::Individual));
        assert_eq!(s.difficulty(), Difficulty::Insane);
        assert_eq!(s.mode().map(|m| m.kind()), Some(ModeKind::Individual));

        s.back();
        assert!(s.select_mode("wheel"));
        assert_eq!(s.active_screen(), Some(Screen::Wheel));
        assert_eq!(s.mode().map(|m| m.kind()), Some(ModeKind::Wheel));
    }

    #[test]
    fn unknown_names_change_nothing() {
        let mut s = Session::headless(1);
        s.enter_menu();
        assert!(!s.select_mode("bingo"));
        assert_eq!(s.active_screen(), Some(Screen::Main));
        s.choose_difficulty("extreme");
        assert!(s.mode().is_none());
        assert_eq!(s.difficulty(), Difficulty::Normal);
    }

    #[test]
    fn back_tears_the_mode_down() {
        let mut s = Session::headless(1);
        s.start_mode(ModeKind::Chaos);
        s.frame(16.0);
        s.back();
        assert!(s.mode().is_none());
        assert_eq!(s.active_screen(), Some(Screen::Main));
    }

    #[test]
    fn ritual_uses_the_layout_set_before_start() {
        let mut s = Session::headless(1);
        let layout = SlotLayout::from_emojis(&modes::RITUAL_ITEMS, &modes::RITUAL_ITEMS);
        s.set_ritual_layout(layout.unwrap_or_default());
        s.start_mode(ModeKind::Ritual);
        s.act(Action::Place { item: 3, slot: 3 });
        match s.mode().map(|m| m.view()) {
            Some(modes::ModeView::Ritual(view)) => {
                assert!(view.filled[3]);
                assert!(view.placed[3]);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn presets_load_applies_to_next_start() {
        let mut s = Session::headless(1);
        s.load_presets(r#"{"precision": {"speeds": {"easy": 1, "normal": 2, "hard": 3, "insane": 4},
            "marker_width": 12, "target_width": 15, "max_travel": 88, "initial_target": 10,
            "target_motion": {"kind": "static"}}}"#)
            .unwrap();
        assert_eq!(s.presets().precision.initial_target, 10.0);
        assert_eq!(s.presets().chaos, crate::engine::presets::chaos());
        assert!(s.load_presets("{not json").is_err());
    }
}
