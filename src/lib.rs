//! Auto-advance timer for flashcard review sessions.
//!
//! The review screen owns an [`AutoAdvanceTimer`] built for the deck under
//! review; the deck's own review options decide its delays unless the deck is
//! dynamic or defers to the general preferences.

pub mod auto_advance;
pub mod storage;

pub use auto_advance::{
    resolve_settings, AutoAdvanceSettings, AutoAdvanceTarget, AutoAdvanceTimer, SettingsSource,
};
