pub mod configure;
pub mod decks;
pub mod settings;
pub mod simulate;
