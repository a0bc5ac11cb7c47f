//! File-backed deck and preference storage
//!
//! Directory structure:
//! ```text
//! {data_dir}/
//! ├── decks.json         # Array of all decks with their review options
//! └── preferences.json   # Flat map of general preferences
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Deck, DeckCollection, Preferences, TimeoutOptionsUpdate};

#[derive(Error, Debug)]
pub enum ConfigStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigStorageError>;

pub struct ConfigStorage {
    base_path: PathBuf,
}

impl ConfigStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("autoadvance"))
            .ok_or(ConfigStorageError::DataDirNotFound)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn decks_path(&self) -> PathBuf {
        self.base_path.join("decks.json")
    }

    fn preferences_path(&self) -> PathBuf {
        self.base_path.join("preferences.json")
    }

    /// Create the data directory and empty stores if missing
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;

        let decks_path = self.decks_path();
        if !decks_path.exists() {
            let empty_decks: Vec<Deck> = Vec::new();
            fs::write(&decks_path, serde_json::to_string_pretty(&empty_decks)?)?;
        }

        let preferences_path = self.preferences_path();
        if !preferences_path.exists() {
            fs::write(
                &preferences_path,
                serde_json::to_string_pretty(&Preferences::default())?,
            )?;
        }

        Ok(())
    }

    // ==================== Deck Operations ====================

    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        let decks_path = self.decks_path();
        if !decks_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&decks_path)?;
        let decks: Vec<Deck> = serde_json::from_str(&content)?;
        Ok(decks)
    }

    /// All decks, ready for settings resolution
    pub fn load_decks(&self) -> Result<DeckCollection> {
        Ok(DeckCollection::new(self.list_decks()?))
    }

    pub fn get_deck(&self, deck_id: Uuid) -> Result<Deck> {
        self.list_decks()?
            .into_iter()
            .find(|d| d.id == deck_id)
            .ok_or(ConfigStorageError::DeckNotFound(deck_id))
    }

    pub fn create_deck(&self, name: String, dynamic: bool) -> Result<Deck> {
        self.init()?;

        let deck = if dynamic {
            Deck::new_dynamic(name)
        } else {
            Deck::new(name)
        };

        let mut decks = self.list_decks()?;
        decks.push(deck.clone());
        self.write_decks(&decks)?;

        log::info!("Created deck '{}' ({})", deck.name, deck.id);
        Ok(deck)
    }

    /// Merge the timeout keys in `update` into a deck's options
    pub fn update_deck_options(&self, deck_id: Uuid, update: &TimeoutOptionsUpdate) -> Result<Deck> {
        let mut decks = self.list_decks()?;
        let deck = decks
            .iter_mut()
            .find(|d| d.id == deck_id)
            .ok_or(ConfigStorageError::DeckNotFound(deck_id))?;

        update.apply(&mut deck.options);
        deck.updated_at = Utc::now();
        let updated = deck.clone();

        self.write_decks(&decks)?;
        Ok(updated)
    }

    pub fn delete_deck(&self, deck_id: Uuid) -> Result<()> {
        let mut decks = self.list_decks()?;
        let before = decks.len();
        decks.retain(|d| d.id != deck_id);
        if decks.len() == before {
            return Err(ConfigStorageError::DeckNotFound(deck_id));
        }
        self.write_decks(&decks)
    }

    fn write_decks(&self, decks: &[Deck]) -> Result<()> {
        fs::write(self.decks_path(), serde_json::to_string_pretty(decks)?)?;
        Ok(())
    }

    // ==================== Preference Operations ====================

    /// Load the general preferences; a missing file means all defaults
    pub fn load_preferences(&self) -> Result<Preferences> {
        let preferences_path = self.preferences_path();
        if !preferences_path.exists() {
            return Ok(Preferences::default());
        }

        let content = fs::read_to_string(&preferences_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        fs::write(
            self.preferences_path(),
            serde_json::to_string_pretty(preferences)?,
        )?;
        Ok(())
    }
}
