//! Exclusive screen switching.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    Welcome,
    Main,
    Difficulty,
    Individual,
    Precision,
    Chaos,
    Competitive,
    Race,
    Coop,
    Wheel,
    Ritual,
}

impl Screen {
    pub const ALL: [Screen; 11] = [
        Screen::Welcome,
        Screen::Main,
        Screen::Difficulty,
        Screen::Individual,
        Screen::Precision,
        Screen::Chaos,
        Screen::Competitive,
        Screen::Race,
        Screen::Coop,
        Screen::Wheel,
        Screen::Ritual,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Screen::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Screen::Welcome => "welcome",
            Screen::Main => "main",
            Screen::Difficulty => "difficulty",
            Screen::Individual => "individual",
            Screen::Precision => "precision",
            Screen::Chaos => "chaos",
            Screen::Competitive => "competitive",
            Screen::Race => "race",
            Screen::Coop => "coop",
            Screen::Wheel => "wheel",
            Screen::Ritual => "ritual",
        }
    }

    /// DOM id of the screen container.
    pub fn element_id(self) -> &'static str {
        match self {
            Screen::Welcome => "welcomeScreen",
            Screen::Main => "mainMenu",
            Screen::Difficulty => "difficultyScreen",
            Screen::Individual => "individualScreen",
            Screen::Precision => "precisionScreen",
            Screen::Chaos => "chaosScreen",
            Screen::Competitive => "competitiveScreen",
            Screen::Race => "raceScreen",
            Screen::Coop => "coopScreen",
            Screen::Wheel => "fortuneWheelScreen",
            Screen::Ritual => "ritualScreen",
        }
    }
}

/// Where screen visibility ends up (DOM classes, or nothing in tests).
pub trait ScreenSurface {
    fn set_visible(&mut self, screen: Screen, visible: bool);
}

impl ScreenSurface for () {
    fn set_visible(&mut self, _screen: Screen, _visible: bool) {}
}

pub struct ScreenRouter {
    surface: Box<dyn ScreenSurface>,
    active: Option<Screen>,
}

impl ScreenRouter {
    pub fn new(surface: Box<dyn ScreenSurface>) -> Self {
        Self { surface, active: None }
    }

    pub fn active(&self) -> Option<Screen> {
        self.active
    }

    pub fn show(&mut self, screen: Screen) {
        for s in Screen::ALL {
            self.surface.set_visible(s, false);
        }
        self.surface.set_visible(screen, true);
        self.active = Some(screen);
    }

    /// Show a screen by name. Unknown names are ignored; returns whether
    /// anything changed.
    pub fn show_named(&mut self, name: &str) -> bool {
        match Screen::from_name(name) {
            Some(screen) => {
                self.show(screen);
                true
            }
            None => {
                log::debug!("ignoring unknown screen '{name}'");
                false
            }
        }
    }
}
