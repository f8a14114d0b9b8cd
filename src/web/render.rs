//! Drawing: mode widgets, confetti canvases and the jackpot overlay.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, window};

use super::dom::{optional, require, select_all};
use crate::background::Backdrop;
use crate::confetti::{Bounds, ConfettiEmitter};
use crate::error::GameError;
use crate::escalation::JackpotOverlay;
use crate::modes::{ModeKind, ModeView, RITUAL_ITEMS, RitualView};

/// Resting offsets of runners and balls, in px.
const RUNNER_BASE_PX: f64 = 15.0;
const BALL_BASE_PX: f64 = 10.0;

fn set_style(el: &HtmlElement, prop: &str, value: &str) {
    let _ = el.style().set_property(prop, value);
}

fn toggle(el: &HtmlElement, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub struct BarElements {
    marker: HtmlElement,
    target: HtmlElement,
}

impl BarElements {
    fn resolve(doc: &Document, marker: &str, target: &str) -> Result<Self, GameError> {
        Ok(Self {
            marker: require(doc, marker)?,
            target: require(doc, target)?,
        })
    }
}

/// The DOM nodes a running mode draws into. Resolved once per mode start;
/// a missing node aborts the start.
pub enum ModeElements {
    Bars(Vec<BarElements>),
    Race {
        runners: [HtmlElement; 2],
        countdown: HtmlElement,
        number: HtmlElement,
    },
    Coop {
        balls: [HtmlElement; 2],
        targets: [HtmlElement; 2],
    },
    Wheel {
        wheel: HtmlElement,
        spin: HtmlElement,
    },
    Ritual {
        slots: Vec<HtmlElement>,
        items: Vec<HtmlElement>,
        progress: HtmlElement,
        fill: HtmlElement,
        result: HtmlElement,
        aura: Option<HtmlElement>,
        blessed: HtmlElement,
    },
}

impl ModeElements {
    pub fn resolve(doc: &Document, kind: ModeKind) -> Result<Self, GameError> {
        let elements = match kind {
            ModeKind::Individual => {
                ModeElements::Bars(vec![BarElements::resolve(doc, "indBar", "indTarget")?])
            }
            ModeKind::Precision => ModeElements::Bars(vec![BarElements::resolve(
                doc,
                "precisionBar",
                "precisionTarget",
            )?]),
            ModeKind::Chaos => {
                ModeElements::Bars(vec![BarElements::resolve(doc, "chaosBar", "chaosTarget")?])
            }
            ModeKind::Competitive => ModeElements::Bars(vec![
                BarElements::resolve(doc, "comp1Bar", "comp1Target")?,
                BarElements::resolve(doc, "comp2Bar", "comp2Target")?,
            ]),
            ModeKind::Race => ModeElements::Race {
                runners: [require(doc, "runner1")?, require(doc, "runner2")?],
                countdown: require(doc, "countdownOverlay")?,
                number: require(doc, "countdownNumber")?,
            },
            ModeKind::Coop => ModeElements::Coop {
                balls: [require(doc, "coopBall1")?, require(doc, "coopBall2")?],
                targets: [require(doc, "coopTarget1")?, require(doc, "coopTarget2")?],
            },
            ModeKind::Wheel => {
                let wheel = require(doc, "fortuneWheel")?;
                set_style(&wheel, "transition", "transform 3s cubic-bezier(0.17, 0.67, 0.12, 0.99)");
                ModeElements::Wheel {
                    wheel,
                    spin: require(doc, "fortuneWheelSpinBtn")?,
                }
            }
            ModeKind::Ritual => {
                let slots = select_all(doc, ".ritual-slot")?;
                if slots.len() != RITUAL_ITEMS.len() {
                    return Err(GameError::missing(".ritual-slot"));
                }
                ModeElements::Ritual {
                    slots,
                    items: select_all(doc, ".ritual-item")?,
                    progress: require(doc, "ritualProgressContainer")?,
                    fill: require(doc, "ritualProgressFill")?,
                    result: require(doc, "ritualResultContainer")?,
                    aura: optional(doc, "ritualAuraColor"),
                    blessed: require(doc, "ritualBlessedNumbers")?,
                }
            }
        };
        Ok(elements)
    }

    pub fn apply(&self, view: &ModeView) {
        match (self, view) {
            (ModeElements::Bars(bars), ModeView::Bars(states)) => {
                for (el, st) in bars.iter().zip(states) {
                    set_style(&el.marker, "left", &format!("{}%", st.marker_left));
                    set_style(&el.target, "left", &format!("{}%", st.target_left));
                }
            }
            (
                ModeElements::Race { runners, countdown, number },
                ModeView::Race { runners: ys, countdown: label },
            ) => {
                for (el, y) in runners.iter().zip(ys) {
                    set_style(el, "bottom", &format!("{}px", RUNNER_BASE_PX + y));
                }
                toggle(countdown, "active", label.is_some());
                if let Some(label) = label {
                    number.set_text_content(Some(*label));
                }
            }
            (ModeElements::Coop { balls, targets }, ModeView::Coop { balls: ys, targets: tops }) => {
                for (el, y) in balls.iter().zip(ys) {
                    set_style(el, "bottom", &format!("{}px", BALL_BASE_PX + y));
                }
                for (el, top) in targets.iter().zip(tops) {
                    set_style(el, "top", &format!("{top}px"));
                }
            }
            (ModeElements::Wheel { wheel, spin }, ModeView::Wheel { rotation, spinning }) => {
                set_style(wheel, "transform", &format!("rotate({rotation}deg)"));
                if *spinning {
                    let _ = spin.set_attribute("disabled", "");
                } else {
                    let _ = spin.remove_attribute("disabled");
                }
            }
            (elements @ ModeElements::Ritual { .. }, ModeView::Ritual(view)) => elements.apply_ritual(view),
            _ => log::warn!("mode view does not match its elements"),
        }
    }

    fn apply_ritual(&self, view: &RitualView) {
        let ModeElements::Ritual { slots, items, progress, fill, result, aura, blessed } = self else {
            return;
        };
        for (el, filled) in slots.iter().zip(view.filled) {
            toggle(el, "filled", filled);
        }
        for (el, placed) in items.iter().zip(view.placed) {
            toggle(el, "placed", placed);
        }
        toggle(progress, "active", view.charging);
        set_style(fill, "width", &format!("{}%", view.progress));
        toggle(result, "active", view.luck_level.is_some());
        if let (Some(el), Some(a)) = (aura, view.aura) {
            set_style(el, "color", a.color);
        }
        toggle(blessed, "active", !view.blessed.is_empty());
    }
}

/// Window inner size in px, 800x600 when unknown.
pub fn viewport() -> (f64, f64) {
    let Some(win) = window() else {
        return (800.0, 600.0);
    };
    let width = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
    let height = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
    (width, height)
}

/// A full-window 2d canvas for confetti or the backdrop.
pub struct EffectCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl EffectCanvas {
    /// `Ok(None)` when the page has no such canvas.
    pub fn bind(doc: &Document, id: &str) -> Result<Option<Self>, GameError> {
        let Some(el) = doc.get_element_by_id(id) else {
            log::debug!("no canvas #{id}");
            return Ok(None);
        };
        let canvas: HtmlCanvasElement = el
            .dyn_into()
            .map_err(|_| GameError::Js(format!("#{id} is not a canvas")))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| GameError::Js("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GameError::Js("unexpected context type".into()))?;
        Ok(Some(Self { canvas, ctx }))
    }

    /// Match the canvas to the viewport and tell whatever draws on it.
    pub fn fit(&self, target: &mut impl Bounds) {
        let (width, height) = viewport();
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        target.set_bounds(width, height);
    }

    pub fn clear(&self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
    }

    pub fn draw(&self, emitter: &ConfettiEmitter) {
        self.clear();
        let ctx = &self.ctx;
        for p in emitter.particles() {
            ctx.save();
            let _ = ctx.translate(p.x, p.y);
            let _ = ctx.rotate(p.rotation.to_radians());
            ctx.set_fill_style_str(p.color);
            ctx.fill_rect(-p.size / 2.0, -p.size / 2.0, p.size, p.size);
            ctx.restore();
        }
    }

    pub fn draw_backdrop(&self, backdrop: &Backdrop) {
        self.clear();
        let ctx = &self.ctx;
        for m in backdrop.motes() {
            ctx.begin_path();
            let _ = ctx.arc(m.x, m.y, m.size, 0.0, std::f64::consts::TAU);
            ctx.set_fill_style_str(&format!("rgba(0, 229, 255, {})", m.opacity));
            ctx.fill();
        }
        ctx.set_line_width(1.0);
        for link in backdrop.links() {
            ctx.begin_path();
            ctx.move_to(link.from.0, link.from.1);
            ctx.line_to(link.to.0, link.to.1);
            ctx.set_stroke_style_str(&format!("rgba(0, 229, 255, {})", link.alpha));
            ctx.stroke();
        }
    }
}

const OVERLAY_FIELDS: [&str; 5] = [
    ".jackpot-title",
    ".jackpot-subtitle",
    ".jackpot-text",
    ".jackpot-subtext",
    ".jackpot-cta",
];

pub const OVERLAY_ROOT: &str = "jackpotOverlay";
pub const OVERLAY_CLOSE: &str = "jackpotCloseBtn";
pub const OVERLAY_BACKDROP: &str = "jackpotBackdrop";
pub const OVERLAY_FORFEIT: &str = "jackpotForfeitBtn";

/// Mirrors `JackpotOverlay` into the DOM, rewriting only when its revision moves.
pub struct OverlayView {
    root: HtmlElement,
    button: HtmlElement,
    forfeit: HtmlElement,
    fields: Vec<Option<web_sys::Element>>,
    drawn: u64,
}

impl OverlayView {
    pub fn bind(doc: &Document) -> Result<Self, GameError> {
        let root = require(doc, OVERLAY_ROOT)?;
        let button = require(doc, OVERLAY_CLOSE)?;
        let forfeit = match optional(doc, OVERLAY_FORFEIT) {
            Some(el) => el,
            None => {
                let el: HtmlElement = doc
                    .create_element("button")?
                    .dyn_into()
                    .map_err(|_| GameError::Js("button is not an html element".into()))?;
                el.set_id(OVERLAY_FORFEIT);
                el.set_class_name("jackpot-forfeit-btn");
                el.set_text_content(Some("No, keep my streak safe"));
                if let Some(parent) = button.parent_node() {
                    parent.append_child(&el)?;
                }
                el
            }
        };
        let fields = OVERLAY_FIELDS
            .iter()
            .map(|sel| root.query_selector(sel).ok().flatten())
            .collect();
        Ok(Self {
            root,
            button,
            forfeit,
            fields,
            drawn: 0,
        })
    }

    pub fn sync(&mut self, overlay: &JackpotOverlay) {
        if overlay.revision() == self.drawn {
            return;
        }
        self.drawn = overlay.revision();
        if overlay.is_open() {
            let c = overlay.content();
            let texts = [&c.title, &c.subtitle, &c.text, &c.subtext, &c.cta];
            for (field, text) in self.fields.iter().zip(texts) {
                if let Some(el) = field {
                    el.set_text_content(Some(text.as_str()));
                }
            }
            self.button.set_text_content(Some(c.button_text.as_str()));
        }
        set_style(
            &self.forfeit,
            "display",
            if overlay.forfeit_offered() { "" } else { "none" },
        );
        toggle(&self.root, "active", overlay.is_open());
    }
}
