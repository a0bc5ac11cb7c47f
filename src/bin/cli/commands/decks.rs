use anyhow::{Context, Result};

use autoadvance_lib::resolve_settings;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let decks = app.load_decks()?;
    let prefs = app.load_preferences()?;

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = decks
                .iter()
                .map(|deck| {
                    let (settings, source) = resolve_settings(deck.id, &decks, &prefs);
                    serde_json::json!({
                        "id": deck.id.to_string(),
                        "name": deck.name,
                        "dynamic": deck.dynamic,
                        "timer": terminal::settings_json(&settings, source),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if decks.is_empty() {
                println!("(no decks)");
                return Ok(());
            }
            for deck in decks.iter() {
                let (settings, source) = resolve_settings(deck.id, &decks, &prefs);
                let dynamic = if deck.dynamic { " [dynamic]" } else { "" };
                println!(
                    "{}{}  {}",
                    terminal::paint(&deck.name, Color::BOLD, use_color),
                    dynamic,
                    terminal::paint(&deck.id.to_string(), Color::DIM, use_color),
                );
                println!("    {}", terminal::render_settings(&settings, source, use_color));
            }
        }
    }

    Ok(())
}

pub fn run_new(app: &App, name: &str, dynamic: bool, format: &OutputFormat) -> Result<()> {
    let deck = app
        .storage
        .create_deck(name.to_string(), dynamic)
        .context("Failed to create deck")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deck)?),
        OutputFormat::Plain => println!("Created deck '{}' ({})", deck.name, deck.id),
    }

    Ok(())
}

pub fn run_delete(app: &App, deck_query: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    app.storage
        .delete_deck(deck.id)
        .with_context(|| format!("Failed to delete deck '{}'", deck.name))?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "deleted": deck.id.to_string(), "name": deck.name })
        ),
        OutputFormat::Plain => println!("Deleted deck '{}' ({})", deck.name, deck.id),
    }

    Ok(())
}
