//! Auto-advance for flashcard review sessions
//!
//! This module provides:
//! - Settings resolution (deck review options over general preferences)
//! - A timer that reveals the answer and moves to the next question on its own
//! - The collaborator traits the review screen and stores implement

pub mod config;
pub mod models;
pub mod timer;

pub use config::{
    deck_settings, general_settings, resolve_settings, DeckConfigSource, DeckOptions,
    PreferenceStore,
};
pub use models::*;
pub use timer::{AutoAdvanceTarget, AutoAdvanceTimer, TimerError};
