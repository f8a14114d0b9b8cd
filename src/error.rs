//! Error types shared by the game logic and the DOM bindings.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures that abort an operation (mode construction, app start, preset loading).
#[derive(Error, Debug)]
pub enum GameError {
    /// A DOM node the caller cannot run without is absent.
    #[error("missing element #{0}")]
    MissingElement(String),

    /// A DOM call threw.
    #[error("js error: {0}")]
    Js(String),

    /// Preset JSON did not parse.
    #[cfg(feature = "serde_json")]
    #[error("invalid presets: {0}")]
    Config(#[from] serde_json::Error),
}

impl GameError {
    pub fn missing(id: &str) -> Self {
        GameError::MissingElement(id.to_string())
    }
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Outcome of a best-effort audio cue. Callers are free to ignore it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No audio element is bound for the cue.
    #[error("audio cue unavailable")]
    Unavailable,

    /// The host refused playback (autoplay policy, decode error, ...).
    #[error("playback rejected: {0}")]
    Rejected(String),
}
