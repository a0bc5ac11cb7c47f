use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::auto_advance::config::{opt_bool, opt_int};
use crate::auto_advance::{
    DeckConfigSource, DeckOptions, PreferenceStore, DEFAULT_USE_GENERAL_TIMEOUT_SETTINGS,
    KEY_TIMEOUT_ANSWER, KEY_TIMEOUT_ANSWER_SECONDS, KEY_TIMEOUT_QUESTION_SECONDS,
    KEY_USE_GENERAL_TIMEOUT_SETTINGS,
};

/// A deck with its review options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    /// Filtered decks borrow cards from other decks and have no options of their own
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default)]
    pub options: DeckOptions,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            dynamic: false,
            options: DeckOptions::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn new_dynamic(name: String) -> Self {
        Self {
            dynamic: true,
            ..Self::new(name)
        }
    }

    pub fn uses_general_timeout_settings(&self) -> bool {
        self.dynamic
            || opt_bool(
                &self.options,
                KEY_USE_GENERAL_TIMEOUT_SETTINGS,
                DEFAULT_USE_GENERAL_TIMEOUT_SETTINGS,
            )
    }
}

/// Partial update of the timeout keys in a deck's options
#[derive(Debug, Clone, Default)]
pub struct TimeoutOptionsUpdate {
    pub use_general: Option<bool>,
    pub use_timer: Option<bool>,
    pub question_secs: Option<i64>,
    pub answer_secs: Option<i64>,
}

impl TimeoutOptionsUpdate {
    pub fn is_empty(&self) -> bool {
        self.use_general.is_none()
            && self.use_timer.is_none()
            && self.question_secs.is_none()
            && self.answer_secs.is_none()
    }

    /// Write the set fields into `options`, leaving other keys alone
    pub fn apply(&self, options: &mut DeckOptions) {
        if let Some(use_general) = self.use_general {
            options.insert(KEY_USE_GENERAL_TIMEOUT_SETTINGS.into(), Value::Bool(use_general));
        }
        if let Some(use_timer) = self.use_timer {
            options.insert(KEY_TIMEOUT_ANSWER.into(), Value::Bool(use_timer));
        }
        if let Some(secs) = self.question_secs {
            options.insert(KEY_TIMEOUT_QUESTION_SECONDS.into(), Value::from(secs));
        }
        if let Some(secs) = self.answer_secs {
            options.insert(KEY_TIMEOUT_ANSWER_SECONDS.into(), Value::from(secs));
        }
    }
}

/// All decks as loaded from decks.json
#[derive(Debug, Clone, Default)]
pub struct DeckCollection {
    decks: Vec<Deck>,
}

impl DeckCollection {
    pub fn new(decks: Vec<Deck>) -> Self {
        Self { decks }
    }

    pub fn get(&self, deck_id: Uuid) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == deck_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deck> {
        self.decks.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }
}

impl DeckConfigSource for DeckCollection {
    fn is_dynamic(&self, deck_id: Uuid) -> bool {
        self.get(deck_id).is_some_and(|d| d.dynamic)
    }

    fn review_options(&self, deck_id: Uuid) -> Option<DeckOptions> {
        self.get(deck_id).map(|d| d.options.clone())
    }
}

/// General preferences, a flat key/value map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences {
    values: serde_json::Map<String, Value>,
}

impl Preferences {
    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), Value::Bool(value));
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), Value::from(value));
    }
}

impl PreferenceStore for Preferences {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        opt_bool(&self.values, key, default)
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        opt_int(&self.values, key, default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auto_advance::{resolve_settings, AutoAdvanceSettings, SettingsSource};

    #[test]
    fn test_deck_uses_general_settings_by_default() {
        let deck = Deck::new("Spanish".to_string());
        assert!(deck.uses_general_timeout_settings());
    }

    #[test]
    fn test_timeout_update_writes_only_set_keys() {
        let mut deck = Deck::new("Spanish".to_string());
        deck.options.insert("newPerDay".to_string(), Value::from(20));

        let update = TimeoutOptionsUpdate {
            use_general: Some(false),
            question_secs: Some(15),
            ..Default::default()
        };
        update.apply(&mut deck.options);

        assert_eq!(deck.options["newPerDay"], 20);
        assert_eq!(deck.options[KEY_USE_GENERAL_TIMEOUT_SETTINGS], false);
        assert_eq!(deck.options[KEY_TIMEOUT_QUESTION_SECONDS], 15);
        assert!(!deck.options.contains_key(KEY_TIMEOUT_ANSWER));
        assert!(!deck.uses_general_timeout_settings());
    }

    #[test]
    fn test_collection_resolves_against_preferences() {
        let mut own = Deck::new("Own timer".to_string());
        TimeoutOptionsUpdate {
            use_general: Some(false),
            use_timer: Some(true),
            question_secs: Some(4),
            answer_secs: Some(2),
        }
        .apply(&mut own.options);

        let mut filtered = Deck::new_dynamic("Filtered".to_string());
        filtered.options = own.options.clone();

        let decks = DeckCollection::new(vec![own.clone(), filtered.clone()]);
        let mut prefs = Preferences::default();
        prefs.set_bool(KEY_TIMEOUT_ANSWER, true);

        let (settings, source) = resolve_settings(own.id, &decks, &prefs);
        assert_eq!(source, SettingsSource::Deck);
        assert_eq!(settings, AutoAdvanceSettings::new(true, 4, 2));

        let (settings, source) = resolve_settings(filtered.id, &decks, &prefs);
        assert_eq!(source, SettingsSource::General);
        assert_eq!(settings, AutoAdvanceSettings::new(true, 60, 20));
    }

    #[test]
    fn test_preferences_roundtrip_as_flat_map() {
        let mut prefs = Preferences::default();
        prefs.set_int(KEY_TIMEOUT_ANSWER_SECONDS, 7);

        let json = serde_json::to_string(&prefs).unwrap();
        assert_eq!(json, r#"{"timeoutAnswerSeconds":7}"#);

        let loaded: Preferences = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.get_int(KEY_TIMEOUT_ANSWER_SECONDS, 20), 7);
        assert!(!loaded.get_bool(KEY_TIMEOUT_ANSWER, false));
    }
}
