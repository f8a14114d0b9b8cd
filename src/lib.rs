//! Mr. Lucky: party mini-games in the browser.
//!
//! Eight modes share one timing-bar engine, one streak ladder and one jackpot
//! overlay. The game logic lives in plain Rust modules that run headless under
//! `cargo test`; `web` binds it to the page.

use wasm_bindgen::prelude::*;

pub mod background;
pub mod confetti;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod escalation;
pub mod feedback;
pub mod modes;
pub mod rng;
pub mod router;
pub mod session;
pub mod web;

pub use error::GameError;
pub use session::Session;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // A second init (hot reload) is harmless.
    let _ = console_log::init_with_level(level);
}

/// Bind the page and show the welcome screen.
#[wasm_bindgen]
pub fn start_app() -> Result<(), JsValue> {
    web::start().map_err(JsValue::from)
}

/// Flip background music; returns whether it is now on.
#[wasm_bindgen]
pub fn toggle_music() -> bool {
    web::toggle_music()
}

/// Replace the timing-bar presets from a JSON document. Applies from the next
/// mode start.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn load_presets(json: &str) -> Result<(), JsValue> {
    web::load_presets(json).map_err(JsValue::from)
}
