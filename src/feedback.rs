//! Shared feedback sink: audio cues plus text/stat presentation.
//!
//! Both halves are capabilities supplied by the host. The DOM implementations
//! live in `web::dom`; tests plug in recorders.

use std::fmt::Display;

use crate::error::AudioError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Success,
    Fail,
    Explosion,
}

pub trait AudioCue {
    /// Start the cue from the beginning.
    fn play(&mut self, cue: Cue) -> Result<(), AudioError>;

    /// Start or stop the background loop.
    fn set_music(&mut self, on: bool) -> Result<(), AudioError>;
}

/// Pure presentation writes keyed by element id. Missing targets are no-ops.
pub trait Presenter {
    fn update_stat(&mut self, key: &str, value: &str);
    fn show_message(&mut self, key: &str, text: &str, success: bool);
    fn clear_message(&mut self, key: &str);
    fn show_banner(&mut self, key: &str, text: &str, highlighted: bool);
}

/// Audio that never plays. Every cue reports `Unavailable`.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioCue for Silent {
    fn play(&mut self, _cue: Cue) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn set_music(&mut self, _on: bool) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }
}

/// Presenter that drops every write.
#[derive(Debug, Default)]
pub struct Headless;

impl Presenter for Headless {
    fn update_stat(&mut self, _key: &str, _value: &str) {}
    fn show_message(&mut self, _key: &str, _text: &str, _success: bool) {}
    fn clear_message(&mut self, _key: &str) {}
    fn show_banner(&mut self, _key: &str, _text: &str, _highlighted: bool) {}
}

pub struct Feedback {
    audio: Box<dyn AudioCue>,
    presenter: Box<dyn Presenter>,
    music_on: bool,
}

impl Feedback {
    pub fn new(audio: Box<dyn AudioCue>, presenter: Box<dyn Presenter>) -> Self {
        Self {
            audio,
            presenter,
            music_on: false,
        }
    }

    pub fn headless() -> Self {
        Self::new(Box::new(Silent), Box::new(Headless))
    }

    /// Play a cue, swallowing failures. The result is returned for callers
    /// that care (tests, mostly).
    pub fn cue(&mut self, cue: Cue) -> Result<(), AudioError> {
        let res = self.audio.play(cue);
        if let Err(err) = &res {
            log::debug!("{cue:?} cue not played: {err}");
        }
        res
    }

    pub fn success(&mut self) {
        let _ = self.cue(Cue::Success);
    }

    pub fn fail(&mut self) {
        let _ = self.cue(Cue::Fail);
    }

    pub fn explosion(&mut self) {
        let _ = self.cue(Cue::Explosion);
    }

    /// Flip background music. Returns the new state.
    pub fn toggle_music(&mut self) -> bool {
        let want = !self.music_on;
        match self.audio.set_music(want) {
            Ok(()) => self.music_on = want,
            // stopping always succeeds from the player's point of view
            Err(err) if !want => {
                log::debug!("music stop: {err}");
                self.music_on = false;
            }
            Err(err) => log::debug!("music start: {err}"),
        }
        self.music_on
    }

    pub fn music_on(&self) -> bool {
        self.music_on
    }

    pub fn stat(&mut self, key: &str, value: impl Display) {
        self.presenter.update_stat(key, &value.to_string());
    }

    pub fn message(&mut self, key: &str, text: &str, success: bool) {
        self.presenter.show_message(key, text, success);
    }

    pub fn clear_message(&mut self, key: &str) {
        self.presenter.clear_message(key);
    }

    pub fn banner(&mut self, key: &str, text: &str, highlighted: bool) {
        self.presenter.show_banner(key, text, highlighted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Flaky(Rc<RefCell<Vec<Cue>>>);

    impl AudioCue for Flaky {
        fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
            self.0.borrow_mut().push(cue);
            if cue == Cue::Explosion {
                Err(AudioError::Rejected("autoplay".into()))
            } else {
                Ok(())
            }
        }

        fn set_music(&mut self, on: bool) -> Result<(), AudioError> {
            if on { Err(AudioError::Rejected("autoplay".into())) } else { Ok(()) }
        }
    }

    #[test]
    fn failures_are_observable_but_swallowed() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut fx = Feedback::new(Box::new(Flaky(log.clone())), Box::new(Headless));
        assert!(fx.cue(Cue::Success).is_ok());
        assert_eq!(
            fx.cue(Cue::Explosion),
            Err(AudioError::Rejected("autoplay".into()))
        );
        fx.explosion();
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn blocked_music_stays_off() {
        let mut fx = Feedback::new(Box::new(Flaky(Rc::default())), Box::new(Headless));
        assert!(!fx.toggle_music());
        assert!(!fx.music_on());
    }

    #[test]
    fn silent_reports_unavailable() {
        let mut fx = Feedback::headless();
        assert_eq!(fx.cue(Cue::Fail), Err(AudioError::Unavailable));
    }
}
