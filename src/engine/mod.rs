//! Timing-bar engine: one parameterised oscillator, its frame loop state and
//! the per-mode presets.

pub mod presets;
mod tick_loop;
mod timing_bar;

pub use presets::Presets;
pub use tick_loop::TickLoop;
pub use timing_bar::{
    BarView, Direction, TRACK_LENGTH, TargetMotion, TargetRange, TimingBar, TimingBarConfig,
    TimingBarState, overlaps,
};
