//! The browser app: one `Session` in a thread-local, DOM listeners feeding it
//! actions, and a `requestAnimationFrame` loop feeding it frame deltas.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, EventTarget, window};

use super::dom::{self, DomAudio, DomPresenter, DomScreens, Listeners, optional, require, select_all};
use super::render::{
    EffectCanvas, ModeElements, OVERLAY_BACKDROP, OVERLAY_CLOSE, OVERLAY_FORFEIT, OverlayView,
    viewport,
};
use crate::background::{self, Backdrop, MOTE_COUNT};
use crate::error::GameError;
use crate::escalation::Dismissal;
use crate::escalation::jackpot::OVERLAY_CANVAS;
use crate::feedback::Feedback;
use crate::modes::{Action, Lane, ModeKind, ModeView, SlotLayout};
use crate::rng::Rng;
use crate::session::Session;

/// Assumed delta for the very first frame.
const FIRST_FRAME_MS: f64 = 16.0;
/// Cap on a single delta after the tab was hidden.
const MAX_FRAME_MS: f64 = 250.0;

const TAP_EVENTS: [&str; 2] = ["click", "touchstart"];
const HOLD_EVENTS: [&str; 2] = ["mousedown", "touchstart"];
const LET_GO_EVENTS: [&str; 3] = ["mouseup", "touchend", "mouseleave"];

struct App {
    doc: Document,
    session: Session,
    overlay_view: OverlayView,
    overlay_canvas: Option<EffectCanvas>,
    backdrop: Option<(EffectCanvas, Backdrop)>,
    mode_canvas: Option<EffectCanvas>,
    elements: Option<ModeElements>,
    last_view: Option<ModeView>,
    last_ts: Option<f64>,
    dragging: Option<usize>,
    mode_listeners: Listeners,
    // kept alive for the page lifetime
    _listeners: Listeners,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| match cell.try_borrow_mut() {
        Ok(mut app) => app.as_mut().map(f),
        Err(_) => {
            log::warn!("event arrived while the app was busy; dropped");
            None
        }
    })
}

pub fn start() -> Result<(), GameError> {
    if APP.with(|cell| cell.borrow().is_some()) {
        log::warn!("start_app called twice");
        return Ok(());
    }
    let doc = dom::document()?;

    let fx = Feedback::new(
        Box::new(DomAudio::bind(&doc)),
        Box::new(DomPresenter::new(doc.clone())),
    );
    let mut session = Session::new(Box::new(DomScreens::new(doc.clone())), fx, Rng::from_entropy());

    let overlay_view = OverlayView::bind(&doc)?;
    let overlay_canvas = EffectCanvas::bind(&doc, OVERLAY_CANVAS)?;
    if let Some(canvas) = &overlay_canvas {
        canvas.fit(session.overlay_mut().confetti_mut());
    }

    let backdrop = match EffectCanvas::bind(&doc, background::CANVAS)? {
        Some(canvas) => {
            let (width, height) = viewport();
            let mut motes = Backdrop::new(MOTE_COUNT, width, height, &mut Rng::from_entropy());
            canvas.fit(&mut motes);
            Some((canvas, motes))
        }
        None => None,
    };

    if let Some(layout) = ritual_layout(&doc)? {
        session.set_ritual_layout(layout);
    }

    let mut listeners = Listeners::new();
    wire_navigation(&doc, &mut listeners)?;
    wire_overlay(&doc, &mut listeners)?;

    session.open();
    APP.with(|cell| {
        *cell.borrow_mut() = Some(App {
            doc,
            session,
            overlay_view,
            overlay_canvas,
            backdrop,
            mode_canvas: None,
            elements: None,
            last_view: None,
            last_ts: None,
            dragging: None,
            mode_listeners: Listeners::new(),
            _listeners: listeners,
        });
    });

    start_loop();
    log::info!("mr lucky ready");
    Ok(())
}

pub fn toggle_music() -> bool {
    with_app(App::toggle_music).unwrap_or(false)
}

#[cfg(feature = "serde_json")]
pub fn load_presets(json: &str) -> Result<(), GameError> {
    with_app(|app| app.session.load_presets(json))
        .unwrap_or_else(|| Err(GameError::Js("app not started".into())))
}

impl App {
    fn tick(&mut self, ts: f64) {
        let dt = self
            .last_ts
            .map_or(FIRST_FRAME_MS, |last| (ts - last).clamp(0.0, MAX_FRAME_MS));
        self.last_ts = Some(ts);
        self.session.frame(dt);
        self.render();
    }

    fn render(&mut self) {
        if let Some((canvas, motes)) = &mut self.backdrop {
            motes.step();
            canvas.draw_backdrop(motes);
        }
        self.overlay_view.sync(self.session.overlay());
        if let Some(canvas) = &self.overlay_canvas {
            canvas.draw(self.session.overlay().confetti());
        }

        let Some(mode) = self.session.mode() else {
            return;
        };
        let view = mode.view();
        if self.last_view.as_ref() != Some(&view) {
            if let Some(elements) = &self.elements {
                elements.apply(&view);
            }
            self.last_view = Some(view);
        }
        if let Some(canvas) = &self.mode_canvas {
            canvas.draw(mode.confetti());
        }
    }

    fn toggle_music(&mut self) -> bool {
        let on = self.session.toggle_music();
        if let Some(btn) = optional(&self.doc, "musicBtn") {
            let _ = btn.class_list().toggle_with_force("muted", !on);
        }
        on
    }

    fn select_mode(&mut self, name: &str) {
        if self.session.select_mode(name) {
            self.rebind();
        }
    }

    fn choose_difficulty(&mut self, key: &str) {
        self.session.choose_difficulty(key);
        self.rebind();
    }

    fn back(&mut self) {
        self.session.back();
        self.unbind_mode();
    }

    /// Attach DOM to whatever mode the session now runs. A page missing one
    /// of the mode's nodes sends the player back to the menu.
    fn rebind(&mut self) {
        if let Err(err) = self.bind_mode() {
            log::error!("cannot start mode: {err}");
            self.back();
        }
    }

    fn bind_mode(&mut self) -> Result<(), GameError> {
        self.unbind_mode();
        let Some(kind) = self.session.mode().map(|m| m.kind()) else {
            return Ok(());
        };
        self.elements = Some(ModeElements::resolve(&self.doc, kind)?);
        if let Some(mode) = self.session.mode_mut() {
            let canvas = EffectCanvas::bind(&self.doc, mode.confetti().canvas_id())?;
            if let Some(canvas) = &canvas {
                canvas.fit(mode.confetti_mut());
            }
            self.mode_canvas = canvas;
        }
        wire_mode(&self.doc, kind, &mut self.mode_listeners)?;
        log::debug!("{kind:?} bound, {} listeners", self.mode_listeners.len());
        Ok(())
    }

    fn unbind_mode(&mut self) {
        self.mode_listeners.clear();
        if let Some(canvas) = self.mode_canvas.take() {
            canvas.clear();
        }
        self.elements = None;
        self.last_view = None;
        self.dragging = None;
    }

    fn refit(&mut self) {
        if let Some((canvas, motes)) = &mut self.backdrop {
            canvas.fit(motes);
        }
        if let Some(canvas) = &self.overlay_canvas {
            canvas.fit(self.session.overlay_mut().confetti_mut());
        }
        if let (Some(canvas), Some(mode)) = (&self.mode_canvas, self.session.mode_mut()) {
            canvas.fit(mode.confetti_mut());
        }
    }

    fn drop_on(&mut self, slot: usize) {
        if let Some(item) = self.dragging.take() {
            self.session.act(Action::Place { item, slot });
        }
    }
}

fn data_emojis(doc: &Document, selector: &str) -> Result<Vec<String>, GameError> {
    Ok(select_all(doc, selector)?
        .iter()
        .filter_map(|el| el.get_attribute("data-emoji"))
        .collect())
}

/// Slot and tray items are paired by their `data-emoji` attributes, in
/// document order. Pages without them keep the built-in pairing.
fn ritual_layout(doc: &Document) -> Result<Option<SlotLayout>, GameError> {
    let slots = data_emojis(doc, ".ritual-slot")?;
    if slots.is_empty() {
        return Ok(None);
    }
    let items = data_emojis(doc, ".ritual-item")?;
    let layout = SlotLayout::from_emojis(slots.as_slice(), items.as_slice());
    if layout.is_none() {
        log::warn!("ritual slots {slots:?} do not match items {items:?}; using built-in pairing");
    }
    Ok(layout)
}

fn wire_navigation(doc: &Document, listeners: &mut Listeners) -> Result<(), GameError> {
    if let Some(btn) = optional(doc, "startBtn") {
        listeners.on(&btn, "click", |_| {
            with_app(|app| app.session.enter_menu());
        })?;
    }
    for btn in select_all(doc, ".menu-btn")? {
        let Some(name) = btn.get_attribute("data-mode") else {
            continue;
        };
        listeners.on(&btn, "click", move |_| {
            with_app(|app| app.select_mode(&name));
        })?;
    }
    for btn in select_all(doc, ".difficulty-btn")? {
        let Some(key) = btn.get_attribute("data-difficulty") else {
            continue;
        };
        listeners.on(&btn, "click", move |_| {
            with_app(|app| app.choose_difficulty(&key));
        })?;
    }
    for btn in select_all(doc, ".back-btn")? {
        listeners.on(&btn, "click", |_| {
            with_app(App::back);
        })?;
    }
    if let Some(btn) = optional(doc, "musicBtn") {
        listeners.on(&btn, "click", |_| {
            with_app(App::toggle_music);
        })?;
    }
    if let Some(win) = window() {
        let target: &EventTarget = win.as_ref();
        listeners.on(target, "resize", |_| {
            with_app(App::refit);
        })?;
    }
    Ok(())
}

fn wire_overlay(doc: &Document, listeners: &mut Listeners) -> Result<(), GameError> {
    let dismiss = |how: Dismissal| {
        move |ev: Event| {
            ev.prevent_default();
            with_app(|app| app.session.dismiss_overlay(how));
        }
    };
    let close = require(doc, OVERLAY_CLOSE)?;
    listeners.on(&close, "click", dismiss(Dismissal::Primary))?;
    let forfeit = require(doc, OVERLAY_FORFEIT)?;
    listeners.on(&forfeit, "click", dismiss(Dismissal::Forfeit))?;
    if let Some(backdrop) = optional(doc, OVERLAY_BACKDROP) {
        listeners.on_each(&backdrop, &["click", "touchend"], dismiss(Dismissal::Backdrop))?;
    }
    // taps on the card itself must not reach the backdrop
    if let Some(content) = doc.query_selector(".jackpot-content")? {
        let stop = |ev: Event| ev.stop_propagation();
        listeners.on_each(&content, &["click", "touchend"], stop)?;
    }
    Ok(())
}

fn act_on(action: Action) -> impl Fn(Event) + Clone + 'static {
    move |ev: Event| {
        // a touch is followed by a synthetic click; keep only one of them
        if ev.type_().starts_with("touch") {
            ev.prevent_default();
        }
        with_app(|app| app.session.act(action));
    }
}

fn wire_mode(doc: &Document, kind: ModeKind, listeners: &mut Listeners) -> Result<(), GameError> {
    let mut tap = |id: &str, action: Action| -> Result<(), GameError> {
        let el = require(doc, id)?;
        listeners.on_each(&el, &TAP_EVENTS, act_on(action))
    };
    match kind {
        ModeKind::Individual => tap("indBtn", Action::Press(Lane::One)),
        ModeKind::Precision => tap("precisionBtn", Action::Press(Lane::One)),
        ModeKind::Chaos => tap("chaosBtn", Action::Press(Lane::One)),
        ModeKind::Competitive => {
            tap("comp1Btn", Action::Press(Lane::One))?;
            tap("comp2Btn", Action::Press(Lane::Two))
        }
        ModeKind::Race => {
            tap("track1", Action::Press(Lane::One))?;
            tap("track2", Action::Press(Lane::Two))
        }
        ModeKind::Wheel => tap("fortuneWheelSpinBtn", Action::Press(Lane::One)),
        ModeKind::Coop => {
            for (id, lane) in [("coopBall1", Lane::One), ("coopBall2", Lane::Two)] {
                let ball = require(doc, id)?;
                listeners.on_each(&ball, &HOLD_EVENTS, act_on(Action::Press(lane)))?;
                listeners.on_each(&ball, &LET_GO_EVENTS, act_on(Action::Release(lane)))?;
            }
            Ok(())
        }
        ModeKind::Ritual => {
            tap("ritualBlessedNumbersBtn", Action::Reveal)?;
            tap("ritualRestartBtn", Action::Restart)?;
            wire_ritual_drops(doc, listeners)
        }
    }
}

fn wire_ritual_drops(doc: &Document, listeners: &mut Listeners) -> Result<(), GameError> {
    for (index, item) in select_all(doc, ".ritual-item")?.into_iter().enumerate() {
        listeners.on(&item, "dragstart", move |_| {
            with_app(|app| app.dragging = Some(index));
        })?;
        listeners.on(&item, "dragend", |_| {
            with_app(|app| app.dragging = None);
        })?;
    }
    for (index, slot) in select_all(doc, ".ritual-slot")?.into_iter().enumerate() {
        listeners.on(&slot, "dragover", |ev: Event| ev.prevent_default())?;
        listeners.on(&slot, "drop", move |ev: Event| {
            ev.prevent_default();
            with_app(|app| app.drop_on(index));
        })?;
    }
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(callback: &FrameCallback) {
    let Some(win) = window() else {
        return;
    };
    if let Some(cb) = callback.borrow().as_ref() {
        if let Err(err) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {}", dom::js_message(&err));
        }
    }
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_app(|app| app.tick(ts));
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}
