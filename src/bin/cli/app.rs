use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use autoadvance_lib::storage::{ConfigStorage, Deck, DeckCollection, Preferences};

/// Shared application state for CLI commands
pub struct App {
    pub storage: ConfigStorage,
}

impl App {
    /// Initialize from `data_dir`, or the default data directory
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => ConfigStorage::default_data_dir().context("Failed to get data directory")?,
        };

        let storage = ConfigStorage::new(data_dir);
        storage.init().context("Failed to initialize storage")?;

        Ok(Self { storage })
    }

    /// Find a deck by ID or name (case-insensitive prefix match)
    pub fn find_deck(&self, query: &str) -> Result<Deck> {
        let decks = self.list_decks()?;

        if let Ok(id) = Uuid::parse_str(query) {
            return decks
                .into_iter()
                .find(|d| d.id == id)
                .context(format!("No deck with ID {}", id));
        }

        let query_lower = query.to_lowercase();

        // Exact match first
        if let Some(deck) = decks.iter().find(|d| d.name.to_lowercase() == query_lower) {
            return Ok(deck.clone());
        }

        // Prefix match
        let matches: Vec<&Deck> = decks
            .iter()
            .filter(|d| d.name.to_lowercase().starts_with(&query_lower))
            .collect();

        match matches.len() {
            0 => bail!(
                "No deck matching '{}'. Available decks:\n{}",
                query,
                decks
                    .iter()
                    .map(|d| format!("  - {}", d.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous deck name '{}'. Matches:\n{}",
                query,
                matches
                    .iter()
                    .map(|d| format!("  - {}", d.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        self.storage.list_decks().context("Failed to list decks")
    }

    pub fn load_decks(&self) -> Result<DeckCollection> {
        self.storage.load_decks().context("Failed to load decks")
    }

    pub fn load_preferences(&self) -> Result<Preferences> {
        self.storage
            .load_preferences()
            .context("Failed to load preferences")
    }
}
