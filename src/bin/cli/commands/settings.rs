use anyhow::Result;

use autoadvance_lib::resolve_settings;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, deck_query: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let decks = app.load_decks()?;
    let prefs = app.load_preferences()?;
    let (settings, source) = resolve_settings(deck.id, &decks, &prefs);

    match format {
        OutputFormat::Json => {
            let mut output = terminal::settings_json(&settings, source);
            output["deck"] = serde_json::json!({
                "id": deck.id.to_string(),
                "name": deck.name,
                "dynamic": deck.dynamic,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", terminal::paint(&deck.name, Color::BOLD, use_color));
            println!("  {}", terminal::render_settings(&settings, source, use_color));
            if deck.dynamic {
                println!("  dynamic deck, general preferences always apply");
            }
            println!("  use timer:           {}", settings.use_timer());
            println!("  answer after:        {}s", settings.answer_delay_secs());
            println!("  next question after: {}s", settings.question_delay_secs());
        }
    }

    Ok(())
}
