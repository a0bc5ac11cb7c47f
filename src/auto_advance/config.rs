//! Resolution of auto-advance settings
//!
//! Deck review options win over the general preferences unless the deck is
//! dynamic (filtered decks have no options of their own) or the options ask
//! for the general settings explicitly. Every read is a defaulted lookup: a
//! missing key or a value of the wrong type yields the default.

use serde_json::{Map, Value};
use uuid::Uuid;

use super::models::*;

/// Per-deck review options, a JSON object as stored with the deck
pub type DeckOptions = Map<String, Value>;

/// Read access to the deck collection
pub trait DeckConfigSource {
    /// Dynamic (filtered) decks always use the general preferences
    fn is_dynamic(&self, deck_id: Uuid) -> bool;

    /// Review options for a deck, `None` if the deck is unknown
    fn review_options(&self, deck_id: Uuid) -> Option<DeckOptions>;
}

/// Read access to the general preference store
pub trait PreferenceStore {
    fn get_bool(&self, key: &str, default: bool) -> bool;

    fn get_int(&self, key: &str, default: i64) -> i64;
}

/// Defaulted boolean lookup in a deck options object
pub fn opt_bool(options: &DeckOptions, key: &str, default: bool) -> bool {
    options.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Defaulted integer lookup in a deck options object.
///
/// Whole-valued floats are accepted since some writers store numbers as doubles.
pub fn opt_int(options: &DeckOptions, key: &str, default: i64) -> i64 {
    match options.get(key) {
        Some(value) => value
            .as_i64()
            .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .unwrap_or(default),
        None => default,
    }
}

/// Settings taken from the deck's own options, or `None` when the general
/// preferences apply.
pub fn deck_settings<D>(deck_id: Uuid, decks: &D) -> Option<AutoAdvanceSettings>
where
    D: DeckConfigSource + ?Sized,
{
    if decks.is_dynamic(deck_id) {
        log::debug!("Deck {} is dynamic, using general timeout settings", deck_id);
        return None;
    }

    let Some(options) = decks.review_options(deck_id) else {
        log::warn!(
            "No review options for deck {}, using general timeout settings",
            deck_id
        );
        return None;
    };

    if opt_bool(
        &options,
        KEY_USE_GENERAL_TIMEOUT_SETTINGS,
        DEFAULT_USE_GENERAL_TIMEOUT_SETTINGS,
    ) {
        return None;
    }

    Some(AutoAdvanceSettings::new(
        opt_bool(&options, KEY_TIMEOUT_ANSWER, DEFAULT_USE_TIMER),
        opt_int(&options, KEY_TIMEOUT_QUESTION_SECONDS, DEFAULT_QUESTION_DELAY_SECS),
        opt_int(&options, KEY_TIMEOUT_ANSWER_SECONDS, DEFAULT_ANSWER_DELAY_SECS),
    ))
}

/// Settings from the general preference store
pub fn general_settings<P>(prefs: &P) -> AutoAdvanceSettings
where
    P: PreferenceStore + ?Sized,
{
    AutoAdvanceSettings::new(
        prefs.get_bool(KEY_TIMEOUT_ANSWER, DEFAULT_USE_TIMER),
        prefs.get_int(KEY_TIMEOUT_QUESTION_SECONDS, DEFAULT_QUESTION_DELAY_SECS),
        prefs.get_int(KEY_TIMEOUT_ANSWER_SECONDS, DEFAULT_ANSWER_DELAY_SECS),
    )
}

/// Effective settings for a review session on `deck_id`
pub fn resolve_settings<D, P>(
    deck_id: Uuid,
    decks: &D,
    prefs: &P,
) -> (AutoAdvanceSettings, SettingsSource)
where
    D: DeckConfigSource + ?Sized,
    P: PreferenceStore + ?Sized,
{
    let resolved = match deck_settings(deck_id, decks) {
        Some(settings) => (settings, SettingsSource::Deck),
        None => (general_settings(prefs), SettingsSource::General),
    };
    log::debug!(
        "Auto-advance for deck {}: {} ({} settings)",
        deck_id,
        resolved.0,
        resolved.1
    );
    resolved
}
