//! Browser glue. Everything above this module is DOM-free and unit-tested
//! natively; this layer only resolves elements and forwards events.

pub mod dom;
mod render;
mod runner;

#[cfg(feature = "serde_json")]
pub use runner::load_presets;
pub use runner::{start, toggle_music};
