//! The oscillating-marker reflex primitive shared by every timing-bar mode.
//!
//! Positions live on a 0–100 track and are written to the page as percentage
//! offsets. The marker advances once per delivered frame (frame-driven, not
//! wall-clock-driven); `dt_ms` only feeds the interval target policy.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::difficulty::{Difficulty, SpeedTable};
use crate::rng::Rng;

pub const TRACK_LENGTH: f64 = 100.0;

/// 1-D interval overlap of the marker `[position, position + marker_width]`
/// against the target `[target_start, target_start + target_width]`.
/// Touching edges do not count.
pub fn overlaps(position: f64, marker_width: f64, target_start: f64, target_width: f64) -> bool {
    position + marker_width > target_start && position < target_start + target_width
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Where a re-randomised target may start: `min + unit * span`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TargetRange {
    pub min: f64,
    pub span: f64,
}

impl TargetRange {
    pub const fn new(min: f64, span: f64) -> Self {
        Self { min, span }
    }

    /// Draw a start that keeps the whole target on the track.
    pub fn draw(&self, rng: &mut Rng, target_width: f64) -> f64 {
        let hi = (TRACK_LENGTH - target_width).max(0.0);
        rng.span(self.min, self.span).clamp(0.0, hi)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum TargetMotion {
    /// The target never moves.
    Static,
    /// Jump every `period_ms` of elapsed frame time.
    Interval { period_ms: f64, range: TargetRange },
    /// Jump with probability `per_tick` on every tick.
    Chance { per_tick: f64, range: TargetRange },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingBarConfig {
    pub speeds: SpeedTable,
    /// Full width of the per-tick speed jitter; 0 disables it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub jitter_band: f64,
    pub marker_width: f64,
    pub target_width: f64,
    pub max_travel: f64,
    pub initial_target: f64,
    pub target_motion: TargetMotion,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimingBarState {
    pub position: f64,
    pub direction: Direction,
    pub speed: f64,
    pub target_start: f64,
    pub target_width: f64,
    pub marker_width: f64,
}

/// Offsets the presentation layer writes as `left: N%`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarView {
    pub marker_left: f64,
    pub target_left: f64,
}

#[derive(Clone, Debug)]
pub struct TimingBar {
    config: TimingBarConfig,
    base_speed: f64,
    since_move_ms: f64,
    state: TimingBarState,
}

impl TimingBar {
    pub fn new(config: TimingBarConfig, difficulty: Difficulty) -> Self {
        let base_speed = config.speeds.get(difficulty);
        let state = TimingBarState {
            position: 0.0,
            direction: Direction::Forward,
            speed: base_speed,
            target_start: config.initial_target,
            target_width: config.target_width,
            marker_width: config.marker_width,
        };
        Self {
            config,
            base_speed,
            since_move_ms: 0.0,
            state,
        }
    }

    /// Advance one frame. Returns true when the target jumped.
    pub fn tick(&mut self, rng: &mut Rng, dt_ms: f64) -> bool {
        let st = &mut self.state;
        if self.config.jitter_band > 0.0 {
            st.speed = self.base_speed + (rng.unit() - 0.5) * self.config.jitter_band;
        }

        st.position += st.speed * st.direction.sign();

        // clamp then flip; a jittered negative speed can push either way
        let max = self.config.max_travel;
        if st.position <= 0.0 {
            st.position = 0.0;
            st.direction = Direction::Forward;
        } else if st.position >= max {
            st.position = max;
            st.direction = Direction::Backward;
        }

        match self.config.target_motion {
            TargetMotion::Static => false,
            TargetMotion::Chance { per_tick, range } => {
                if rng.chance(per_tick) {
                    st.target_start = range.draw(rng, st.target_width);
                    true
                } else {
                    false
                }
            }
            TargetMotion::Interval { period_ms, range } => {
                self.since_move_ms += dt_ms.max(0.0);
                if period_ms > 0.0 && self.since_move_ms >= period_ms {
                    self.since_move_ms -= period_ms;
                    st.target_start = range.draw(rng, st.target_width);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Adjudicate a player action against whatever the state holds right now.
    pub fn hit_test(&self) -> bool {
        let st = &self.state;
        overlaps(st.position, st.marker_width, st.target_start, st.target_width)
    }

    pub fn state(&self) -> &TimingBarState {
        &self.state
    }

    pub fn config(&self) -> &TimingBarConfig {
        &self.config
    }

    pub fn base_speed(&self) -> f64 {
        self.base_speed
    }

    pub fn view(&self) -> BarView {
        BarView {
            marker_left: self.state.position,
            target_left: self.state.target_start,
        }
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, position: f64, target_start: f64) {
        self.state.position = position;
        self.state.target_start = target_start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(motion: TargetMotion, jitter: f64) -> TimingBarConfig {
        TimingBarConfig {
            speeds: SpeedTable::new(0.4, 0.7, 1.1, 1.6),
            jitter_band: jitter,
            marker_width: 15.0,
            target_width: 20.0,
            max_travel: 85.0,
            initial_target: 40.0,
            target_motion: motion,
        }
    }

    #[test]
    fn overlap_examples() {
        assert!(overlaps(50.0, 15.0, 40.0, 20.0));
        assert!(!overlaps(70.0, 15.0, 10.0, 20.0));
        // touching edges
        assert!(!overlaps(25.0, 15.0, 40.0, 20.0));
        assert!(!overlaps(60.0, 15.0, 40.0, 20.0));
    }

    #[test]
    fn position_stays_on_track_and_reflects() {
        let mut rng = Rng::new(11);
        let range = TargetRange::new(20.0, 50.0);
        let mut bar = TimingBar::new(
            cfg(TargetMotion::Chance { per_tick: 0.015, range }, 0.4),
            Difficulty::Insane,
        );
        let mut flips = 0;
        let mut last = bar.state().direction;
        for _ in 0..20_000 {
            bar.tick(&mut rng, 16.0);
            let st = bar.state();
            assert!((0.0..=85.0).contains(&st.position), "out of bounds: {}", st.position);
            if st.direction != last {
                flips += 1;
                assert!(st.position == 0.0 || st.position == 85.0);
                last = st.direction;
            }
        }
        assert!(flips > 10);
    }

    #[test]
    fn flips_exactly_at_the_bound() {
        let mut rng = Rng::new(1);
        let mut bar = TimingBar::new(cfg(TargetMotion::Static, 0.0), Difficulty::Normal);
        bar.place(84.8, 40.0);
        bar.tick(&mut rng, 16.0);
        assert_eq!(bar.state().position, 85.0);
        assert_eq!(bar.state().direction, Direction::Backward);
        bar.tick(&mut rng, 16.0);
        assert!((bar.state().position - 84.3).abs() < 1e-9);
    }

    #[test]
    fn static_target_never_moves() {
        let mut rng = Rng::new(5);
        let mut bar = TimingBar::new(cfg(TargetMotion::Static, 0.0), Difficulty::Hard);
        for _ in 0..5_000 {
            assert!(!bar.tick(&mut rng, 16.0));
        }
        assert_eq!(bar.state().target_start, 40.0);
    }

    #[test]
    fn interval_target_moves_on_schedule() {
        let mut rng = Rng::new(5);
        let range = TargetRange::new(10.0, 60.0);
        let mut bar = TimingBar::new(
            cfg(TargetMotion::Interval { period_ms: 100.0, range }, 0.0),
            Difficulty::Normal,
        );
        let moves = (0..10).filter(|_| bar.tick(&mut rng, 25.0)).count();
        assert_eq!(moves, 2);
    }

    #[test]
    fn redrawn_target_stays_on_track() {
        let mut rng = Rng::new(9);
        let range = TargetRange::new(0.0, 150.0);
        for _ in 0..1_000 {
            let start = range.draw(&mut rng, 25.0);
            assert!((0.0..=75.0).contains(&start));
        }
    }

    #[test]
    fn jitter_stays_within_band() {
        let mut rng = Rng::new(3);
        let mut bar = TimingBar::new(cfg(TargetMotion::Static, 0.4), Difficulty::Normal);
        for _ in 0..1_000 {
            bar.tick(&mut rng, 16.0);
            let s = bar.state().speed;
            assert!(s >= 0.5 - 1e-9 && s < 0.9 + 1e-9, "speed {s}");
        }
    }
}
