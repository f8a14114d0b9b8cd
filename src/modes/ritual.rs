//! The luck ritual: drop six items on their slots, wait for the charge, read
//! your fortune.
//!
//! Only drop resolution lives here. Turning pointer gestures into
//! `Action::Place { item, slot }` is the presentation layer's job.

use super::{Action, Lane, Mode, ModeContext, ModeKind, ModeView};
use crate::confetti::ConfettiEmitter;
use crate::engine::TickLoop;
use crate::escalation::EscalationHost;
use crate::feedback::Feedback;
use crate::rng::Rng;

const INSTRUCTION: &str = "ritualInstruction";
const STATUS: &str = "ritualStatusMessage";
const PROGRESS_TEXT: &str = "ritualProgressText";
const PROGRESS_MESSAGE: &str = "ritualProgressMessage";
const RESULT_NAME: &str = "ritualResultName";
const RESULT_MESSAGE: &str = "ritualResultMessage";
const LUCK_LEVEL: &str = "ritualLuckLevel";
const AURA_COLOR: &str = "ritualAuraColor";
const BLESSED: &str = "ritualBlessedNumbers";
const CANVAS: &str = "ritualConfetti";

const PLAYER_NAME: &str = "Player";

/// Items in the tray, by index.
pub const RITUAL_ITEMS: [&str; 6] = ["🍀", "🎲", "🔮", "⭐", "💰", "🎰"];

/// The item index each slot accepts when the page declares nothing.
pub const SLOT_ITEMS: [usize; 6] = [2, 0, 4, 1, 5, 3];

/// Which item (by tray index) each slot accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotLayout([usize; 6]);

impl Default for SlotLayout {
    fn default() -> Self {
        SlotLayout(SLOT_ITEMS)
    }
}

impl SlotLayout {
    /// Match slots to tray items by emoji, as declared in the page markup.
    /// `None` unless every slot names an emoji present in the tray and no
    /// two slots want the same item.
    pub fn from_emojis<S: AsRef<str>, I: AsRef<str>>(slots: &[S], items: &[I]) -> Option<Self> {
        if slots.len() != 6 || items.len() != RITUAL_ITEMS.len() {
            return None;
        }
        let mut layout = [0; 6];
        for (slot, emoji) in slots.iter().enumerate() {
            let item = items.iter().position(|i| i.as_ref() == emoji.as_ref())?;
            if layout[..slot].contains(&item) {
                return None;
            }
            layout[slot] = item;
        }
        Some(SlotLayout(layout))
    }

    pub fn item_for(&self, slot: usize) -> Option<usize> {
        self.0.get(slot).copied()
    }

    pub fn items(&self) -> [usize; 6] {
        self.0
    }
}

const ARM_DELAY_MS: f64 = 500.0;
const CHARGE_MS: f64 = 3000.0;
const CHARGE_STEP_MS: f64 = 50.0;
const RESULT_DELAY_MS: f64 = 800.0;
const BLESSED_COUNT: usize = 5;
const BLESSED_MAX: u32 = 90;

const STAGES: [(f64, &str); 5] = [
    (0.0, "Connecting with the universe..."),
    (20.0, "Bribing Lady Luck..."),
    (40.0, "Inflating the team's karma..."),
    (60.0, "Tuning the bingo vibration..."),
    (80.0, "Charging luck to the max..."),
];

const RESULT_MESSAGES: [&str; 3] = [
    "🎉 {name} has MAXIMUM LUCK. If you don't call a line today, the universe has other plans.",
    "✨ {name} is loaded with good energy. Today is your lucky day!",
    "🌟 {name} has reached the highest level of fortune. May the numbers be with you!",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aura {
    pub name: &'static str,
    pub emoji: &'static str,
    /// CSS colour.
    pub color: &'static str,
}

pub const AURAS: [Aura; 3] = [
    Aura { name: "Bingo green", emoji: "🍀", color: "#4CAF50" },
    Aura { name: "Resignation yellow", emoji: "💛", color: "#FFC107" },
    Aura { name: "Epic purple", emoji: "💜", color: "#9C27B0" },
];

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Placing,
    Arming { elapsed_ms: f64 },
    Charging { carry_ms: f64 },
    Completing { elapsed_ms: f64 },
    Done,
}

/// Render snapshot of the ritual.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RitualView {
    /// Filled state per slot.
    pub filled: [bool; 6],
    /// Per tray item: already sitting on its slot.
    pub placed: [bool; 6],
    pub charging: bool,
    /// Charge progress in percent.
    pub progress: f64,
    /// Set once the result is on screen.
    pub luck_level: Option<u32>,
    pub aura: Option<Aura>,
    /// Sorted, set after a reveal.
    pub blessed: Vec<u32>,
}

pub struct RitualMode {
    layout: SlotLayout,
    phase: Phase,
    filled: [bool; 6],
    progress: f64,
    luck_level: u32,
    aura: Aura,
    revealed: bool,
    blessed: Vec<u32>,
    ticks: TickLoop,
    confetti: ConfettiEmitter,
}

impl Default for RitualMode {
    fn default() -> Self {
        Self::new(SlotLayout::default())
    }
}

/// Five distinct numbers in 1..=90, ascending.
pub(crate) fn draw_blessed(rng: &mut Rng) -> Vec<u32> {
    let mut numbers = Vec::with_capacity(BLESSED_COUNT);
    while numbers.len() < BLESSED_COUNT {
        let n = rng.index(BLESSED_MAX as usize) as u32 + 1;
        if !numbers.contains(&n) {
            numbers.push(n);
        }
    }
    numbers.sort_unstable();
    numbers
}

impl RitualMode {
    pub fn new(layout: SlotLayout) -> Self {
        Self {
            layout,
            phase: Phase::Placing,
            filled: [false; 6],
            progress: 0.0,
            luck_level: 0,
            aura: AURAS[0],
            revealed: false,
            blessed: Vec::new(),
            ticks: TickLoop::new(),
            confetti: ConfettiEmitter::new(CANVAS),
        }
    }

    pub fn placed(&self) -> usize {
        self.filled.iter().filter(|f| **f).count()
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn blessed(&self) -> &[u32] {
        &self.blessed
    }

    pub fn ritual_view(&self) -> RitualView {
        let done = self.is_done();
        let mut placed = [false; 6];
        for (slot, filled) in self.filled.iter().enumerate() {
            if let (true, Some(item)) = (*filled, self.layout.item_for(slot)) {
                placed[item] = true;
            }
        }
        RitualView {
            filled: self.filled,
            placed,
            charging: matches!(self.phase, Phase::Charging { .. }),
            progress: self.progress,
            luck_level: done.then_some(self.luck_level),
            aura: done.then_some(self.aura),
            blessed: if self.revealed { self.blessed.clone() } else { Vec::new() },
        }
    }

    fn reset(&mut self, fx: &mut Feedback) {
        self.phase = Phase::Placing;
        self.filled = [false; 6];
        self.progress = 0.0;
        self.revealed = false;
        self.blessed.clear();
        fx.stat(PROGRESS_TEXT, "0%");
        fx.clear_message(PROGRESS_MESSAGE);
        fx.clear_message(STATUS);
        fx.clear_message(BLESSED);
        fx.stat(INSTRUCTION, "Place the items on the pentagram to complete the ritual");
    }

    fn place(&mut self, ctx: &mut ModeContext<'_>, item: usize, slot: usize) {
        if self.phase != Phase::Placing {
            return;
        }
        let Some(wanted) = self.layout.item_for(slot) else {
            log::warn!("ritual drop on unknown slot {slot}");
            return;
        };
        if item >= RITUAL_ITEMS.len() {
            log::warn!("ritual drop of unknown item {item}");
            return;
        }
        if self.filled[slot] {
            return;
        }

        if wanted != item {
            log::debug!("ritual item {item} rejected by slot {slot}");
            ctx.fx.fail();
            return;
        }

        self.filled[slot] = true;
        self.confetti.launch(30, ctx.rng);
        ctx.fx.success();

        let remaining = RITUAL_ITEMS.len() - self.placed();
        if remaining == 0 {
            self.phase = Phase::Arming { elapsed_ms: 0.0 };
        } else {
            let plural = if remaining > 1 { "s" } else { "" };
            ctx.fx
                .message(STATUS, &format!("Place {remaining} more item{plural}..."), false);
        }
    }

    fn start_charging(&mut self, fx: &mut Feedback) {
        log::debug!("ritual charging");
        self.phase = Phase::Charging { carry_ms: 0.0 };
        self.progress = 0.0;
        fx.clear_message(STATUS);
        fx.stat(PROGRESS_TEXT, "0%");
        fx.stat(PROGRESS_MESSAGE, STAGES[0].1);
    }

    fn charge(&mut self, ctx: &mut ModeContext<'_>, carry_ms: f64) {
        let mut carry_ms = carry_ms;
        while carry_ms >= CHARGE_STEP_MS {
            carry_ms -= CHARGE_STEP_MS;
            self.progress += 100.0 / CHARGE_MS * CHARGE_STEP_MS;
            if self.progress >= 100.0 {
                self.complete(ctx);
                return;
            }
            ctx.fx.stat(PROGRESS_TEXT, format!("{}%", self.progress.round()));
            if let Some((_, text)) = STAGES.iter().rev().find(|(min, _)| self.progress >= *min) {
                ctx.fx.stat(PROGRESS_MESSAGE, text);
            }
        }
        self.phase = Phase::Charging { carry_ms };
    }

    fn complete(&mut self, ctx: &mut ModeContext<'_>) {
        self.progress = 100.0;
        ctx.fx.stat(PROGRESS_TEXT, "100%");
        ctx.fx.stat(PROGRESS_MESSAGE, "Luck fully charged! ✨");
        self.luck_level = (ctx.rng.index(3) as u32 + 4).min(5);
        self.aura = ctx.rng.pick(&AURAS).copied().unwrap_or(AURAS[0]);
        log::info!("ritual complete: level {}, {}", self.luck_level, self.aura.name);
        self.confetti.launch(300, ctx.rng);
        ctx.fx.success();
        self.phase = Phase::Completing { elapsed_ms: 0.0 };
    }

    fn show_result(&mut self, ctx: &mut ModeContext<'_>) {
        self.phase = Phase::Done;
        let template = ctx.rng.pick(&RESULT_MESSAGES).copied().unwrap_or(RESULT_MESSAGES[0]);
        ctx.fx.stat(RESULT_NAME, PLAYER_NAME);
        ctx.fx.stat(RESULT_MESSAGE, template.replace("{name}", PLAYER_NAME));
        ctx.fx.stat(LUCK_LEVEL, format!("Luck level: {}", "⭐".repeat(self.luck_level as usize)));
        ctx.fx.stat(AURA_COLOR, format!("Aura colour: {} {}", self.aura.emoji, self.aura.name));
        ctx.fx.message(STATUS, "Ritual completed successfully! ✨", true);
    }

    fn reveal(&mut self, ctx: &mut ModeContext<'_>) {
        if !self.is_done() {
            return;
        }
        self.blessed = draw_blessed(ctx.rng);
        self.revealed = true;
        let joined = self
            .blessed
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" · ");
        ctx.fx.stat(BLESSED, format!("Your good-vibe numbers: {joined}"));
    }
}

impl EscalationHost for RitualMode {
    fn on_continue(&mut self, _owner: Lane, _fx: &mut Feedback) {}

    fn on_quit(&mut self, _owner: Lane, _fx: &mut Feedback) {}

    fn on_acknowledge(&mut self, _owner: Lane, _fx: &mut Feedback) {}
}

impl Mode for RitualMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Ritual
    }

    fn start(&mut self, fx: &mut Feedback) {
        self.reset(fx);
        self.ticks.start();
    }

    fn frame(&mut self, ctx: &mut ModeContext<'_>, dt_ms: f64) {
        if self.ticks.take_frame() {
            match self.phase {
                Phase::Placing | Phase::Done => {}
                Phase::Arming { elapsed_ms } => {
                    let elapsed_ms = elapsed_ms + dt_ms;
                    if elapsed_ms >= ARM_DELAY_MS {
                        self.start_charging(ctx.fx);
                    } else {
                        self.phase = Phase::Arming { elapsed_ms };
                    }
                }
                Phase::Charging { carry_ms } => self.charge(ctx, carry_ms + dt_ms),
                Phase::Completing { elapsed_ms } => {
                    let elapsed_ms = elapsed_ms + dt_ms;
                    if elapsed_ms >= RESULT_DELAY_MS {
                        self.show_result(ctx);
                    } else {
                        self.phase = Phase::Completing { elapsed_ms };
                    }
                }
            }
        }
        self.confetti.step();
    }

    fn act(&mut self, ctx: &mut ModeContext<'_>, action: Action) {
        if self.ticks.is_stopped() {
            return;
        }
        match action {
            Action::Place { item, slot } => self.place(ctx, item, slot),
            Action::Reveal => self.reveal(ctx),
            Action::Restart => {
                log::debug!("ritual restarted");
                self.reset(ctx.fx);
            }
            Action::Press(_) | Action::Release(_) => {}
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
        self.phase = Phase::Placing;
        self.progress = 0.0;
        self.confetti.clear();
    }

    fn view(&self) -> ModeView {
        ModeView::Ritual(self.ritual_view())
    }

    fn confetti(&self) -> &ConfettiEmitter {
        &self.confetti
    }

    fn confetti_mut(&mut self) -> &mut ConfettiEmitter {
        &mut self.confetti
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escalation::JackpotOverlay;

    struct Rig {
        fx: Feedback,
        overlay: JackpotOverlay,
        rng: Rng,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                fx: Feedback::headless(),
                overlay: JackpotOverlay::new(),
                rng: Rng::new(17),
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

    fn place_all(m: &mut RitualMode, rig: &mut Rig) {
        for (slot, item) in m.layout.items().iter().enumerate() {
            m.act(&mut rig.ctx(), Action::Place { item: *item, slot });
        }
    }

    fn run(m: &mut RitualMode, rig: &mut Rig, ms: f64) {
        let mut t = 0.0;
        while t < ms {
            m.frame(&mut rig.ctx(), 10.0);
            t += 10.0;
        }
    }

    #[test]
    fn slots_accept_only_their_item() {
        let mut rig = Rig::new();
        let mut m = RitualMode::default();
        m.start(&mut rig.fx);
        m.act(&mut rig.ctx(), Action::Place { item: 0, slot: 0 });
        assert_eq!(m.placed(), 0);
        m.act(&mut rig.ctx(), Action::Place { item: SLOT_ITEMS[0], slot: 0 });
        m.act(&mut rig.ctx(), Action::Place { item: SLOT_ITEMS[0], slot: 0 });
        m.act(&mut rig.ctx(), Action::Place { item: 1, slot: 9 });
        assert_eq!(m.placed(), 1);
        assert!(!m.confetti().is_empty());
    }

    #[test]
    fn full_ritual_charges_then_reveals_result() {
        let mut rig = Rig::new();
        let mut m = RitualMode::default();
        m.start(&mut rig.fx);
        place_all(&mut m, &mut rig);
        assert_eq!(m.placed(), 6);

        run(&mut m, &mut rig, 500.0);
        assert!(m.ritual_view().charging);
        run(&mut m, &mut rig, 1500.0);
        let midway = m.progress();
        assert!(midway > 40.0 && midway < 60.0, "progress {midway}");

        run(&mut m, &mut rig, 1600.0);
        assert_eq!(m.progress(), 100.0);
        assert!(!m.is_done());
        run(&mut m, &mut rig, 800.0);
        assert!(m.is_done());

        let view = m.ritual_view();
        let level = view.luck_level.unwrap_or(0);
        assert!((4..=5).contains(&level));
        assert!(view.aura.is_some());
        assert!(view.blessed.is_empty());

        m.act(&mut rig.ctx(), Action::Reveal);
        let numbers = m.blessed().to_vec();
        assert_eq!(numbers.len(), 5);
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        assert!(numbers.iter().all(|n| (1..=90).contains(n)));

        m.act(&mut rig.ctx(), Action::Restart);
        assert_eq!(m.placed(), 0);
        assert_eq!(m.progress(), 0.0);
        assert!(m.blessed().is_empty());
    }

    #[test]
    fn reveal_before_completion_does_nothing() {
        let mut rig = Rig::new();
        let mut m = RitualMode::default();
        m.start(&mut rig.fx);
        m.act(&mut rig.ctx(), Action::Reveal);
        assert!(m.blessed().is_empty());
    }

    #[test]
    fn blessed_numbers_are_distinct() {
        let mut rng = Rng::new(5);
        for _ in 0..200 {
            let mut n = draw_blessed(&mut rng);
            n.dedup();
            assert_eq!(n.len(), 5);
        }
    }

    #[test]
    fn page_layout_decides_which_item_fits() {
        let items = RITUAL_ITEMS;
        let slots = ["🍀", "🎲", "🔮", "⭐", "💰", "🎰"];
        let layout = SlotLayout::from_emojis(&slots, &items).expect("layout");
        assert_eq!(layout.items(), [0, 1, 2, 3, 4, 5]);

        let mut rig = Rig::new();
        let mut m = RitualMode::new(layout);
        m.start(&mut rig.fx);
        m.act(&mut rig.ctx(), Action::Place { item: 2, slot: 0 });
        assert_eq!(m.placed(), 0);
        m.act(&mut rig.ctx(), Action::Place { item: 0, slot: 0 });
        assert_eq!(m.placed(), 1);
        place_all(&mut m, &mut rig);
        assert_eq!(m.placed(), 6);
    }

    #[test]
    fn inconsistent_markup_yields_no_layout() {
        let items = RITUAL_ITEMS;
        assert!(SlotLayout::from_emojis(&["🍀"; 6], &items).is_none());
        assert!(SlotLayout::from_emojis(&["🍀", "🎲", "🔮", "⭐", "💰", "🐸"], &items).is_none());
        assert!(SlotLayout::from_emojis(&items, &items[..5]).is_none());
    }
}
