//! Thin DOM adapters: element lookup, the presenter, audio cues, screen
//! visibility and an event-listener registry.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlAudioElement, HtmlElement, window};

use crate::error::{AudioError, GameError};
use crate::feedback::{AudioCue, Cue, Presenter};
use crate::router::{Screen, ScreenSurface};

pub fn document() -> Result<Document, GameError> {
    window()
        .and_then(|w| w.document())
        .ok_or_else(|| GameError::Js("no document".into()))
}

/// Look up an element the caller cannot run without.
pub fn require(doc: &Document, id: &str) -> Result<HtmlElement, GameError> {
    doc.get_element_by_id(id)
        .ok_or_else(|| GameError::missing(id))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| GameError::Js(format!("#{id} is not an html element")))
}

/// Look up a nice-to-have element. Absence is logged, not fatal.
pub fn optional(doc: &Document, id: &str) -> Option<HtmlElement> {
    let found = doc
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    if found.is_none() {
        log::debug!("optional element #{id} not present");
    }
    found
}

pub fn select_all(doc: &Document, selector: &str) -> Result<Vec<HtmlElement>, GameError> {
    let list = doc.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

pub fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Class the streak banner wears while double-or-nothing is on offer.
pub const BANNER_OFFER_CLASS: &str = "double-or-nothing";

pub struct DomPresenter {
    doc: Document,
}

impl DomPresenter {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    fn find(&self, key: &str) -> Option<Element> {
        self.doc.get_element_by_id(key)
    }
}

impl Presenter for DomPresenter {
    fn update_stat(&mut self, key: &str, value: &str) {
        if let Some(el) = self.find(key) {
            el.set_text_content(Some(value));
        }
    }

    fn show_message(&mut self, key: &str, text: &str, success: bool) {
        if let Some(el) = self.find(key) {
            el.set_text_content(Some(text));
            el.set_class_name(if success { "message success" } else { "message fail" });
        }
    }

    fn clear_message(&mut self, key: &str) {
        if let Some(el) = self.find(key) {
            el.set_text_content(None);
        }
    }

    fn show_banner(&mut self, key: &str, text: &str, highlighted: bool) {
        let Some(banner) = self.find(key) else {
            return;
        };
        let label = banner
            .query_selector(".goal-text")
            .ok()
            .flatten()
            .unwrap_or_else(|| banner.clone());
        label.set_text_content(Some(text));
        let _ = banner.class_list().toggle_with_force(BANNER_OFFER_CLASS, highlighted);
    }
}

/// Cue sounds and the music loop, bound to `<audio>` elements by id.
pub struct DomAudio {
    success: Option<HtmlAudioElement>,
    fail: Option<HtmlAudioElement>,
    explosion: Option<HtmlAudioElement>,
    music: Option<HtmlAudioElement>,
    swallow: Closure<dyn FnMut(JsValue)>,
}

fn audio(doc: &Document, id: &str) -> Option<HtmlAudioElement> {
    optional(doc, id).and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
}

impl DomAudio {
    pub fn bind(doc: &Document) -> Self {
        let swallow = Closure::wrap(Box::new(|err: JsValue| {
            log::debug!("playback rejected: {}", js_message(&err));
        }) as Box<dyn FnMut(JsValue)>);
        Self {
            success: audio(doc, "successSound"),
            fail: audio(doc, "failSound"),
            explosion: audio(doc, "explosionSound"),
            music: audio(doc, "bgMusic"),
            swallow,
        }
    }

    /// Kick off playback; an async rejection lands in `swallow`.
    fn start(&self, el: &HtmlAudioElement) -> Result<(), AudioError> {
        match el.play() {
            Ok(promise) => {
                let promise: js_sys::Promise = promise;
                let _ = promise.catch(&self.swallow);
                Ok(())
            }
            Err(err) => Err(AudioError::Rejected(js_message(&err))),
        }
    }
}

impl AudioCue for DomAudio {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        let el = match cue {
            Cue::Success => &self.success,
            Cue::Fail => &self.fail,
            Cue::Explosion => &self.explosion,
        };
        let el = el.as_ref().ok_or(AudioError::Unavailable)?;
        el.set_current_time(0.0);
        self.start(el)
    }

    fn set_music(&mut self, on: bool) -> Result<(), AudioError> {
        let el = self.music.as_ref().ok_or(AudioError::Unavailable)?;
        if on {
            self.start(el)
        } else {
            el.pause().map_err(|err| AudioError::Rejected(js_message(&err)))
        }
    }
}

/// Screen visibility through the `active` class.
pub struct DomScreens {
    doc: Document,
}

impl DomScreens {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }
}

impl ScreenSurface for DomScreens {
    fn set_visible(&mut self, screen: Screen, visible: bool) {
        if let Some(el) = self.doc.get_element_by_id(screen.element_id()) {
            let _ = el.class_list().toggle_with_force("active", visible);
        }
    }
}

struct Bound {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Listeners that are detached again on `clear` or drop.
#[derive(Default)]
pub struct Listeners {
    bound: Vec<Bound>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, target: &EventTarget, event: &'static str, f: F) -> Result<(), GameError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        self.bound.push(Bound {
            target: target.clone(),
            event,
            callback,
        });
        Ok(())
    }

    /// Attach the same handler to several events (click + touchstart, ...).
    pub fn on_each<F>(&mut self, target: &EventTarget, events: &[&'static str], f: F) -> Result<(), GameError>
    where
        F: Fn(Event) + Clone + 'static,
    {
        for event in events {
            self.on(target, event, f.clone())?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    pub fn clear(&mut self) {
        for b in self.bound.drain(..) {
            let _ = b
                .target
                .remove_event_listener_with_callback(b.event, b.callback.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.clear();
    }
}
