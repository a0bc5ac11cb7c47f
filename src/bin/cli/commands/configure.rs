use anyhow::{bail, Context, Result};

use autoadvance_lib::auto_advance::{
    KEY_TIMEOUT_ANSWER, KEY_TIMEOUT_ANSWER_SECONDS, KEY_TIMEOUT_QUESTION_SECONDS,
};
use autoadvance_lib::storage::TimeoutOptionsUpdate;

use crate::app::App;
use crate::OutputFormat;

pub fn run_set_deck(
    app: &App,
    deck_query: &str,
    update: TimeoutOptionsUpdate,
    format: &OutputFormat,
) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to change. Pass at least one of --use-general, --timer, --question, --answer");
    }

    let deck = app.find_deck(deck_query)?;
    if deck.dynamic {
        log::warn!(
            "Deck '{}' is dynamic; its timeout options are ignored in favour of the general preferences",
            deck.name
        );
    }

    let deck = app
        .storage
        .update_deck_options(deck.id, &update)
        .context("Failed to update deck options")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deck.options)?),
        OutputFormat::Plain => println!("Updated timeout options of '{}'", deck.name),
    }

    Ok(())
}

pub fn run_set_prefs(
    app: &App,
    timer: Option<bool>,
    question: Option<i64>,
    answer: Option<i64>,
    format: &OutputFormat,
) -> Result<()> {
    if timer.is_none() && question.is_none() && answer.is_none() {
        bail!("Nothing to change. Pass at least one of --timer, --question, --answer");
    }

    let mut prefs = app.load_preferences()?;
    if let Some(timer) = timer {
        prefs.set_bool(KEY_TIMEOUT_ANSWER, timer);
    }
    if let Some(secs) = question {
        prefs.set_int(KEY_TIMEOUT_QUESTION_SECONDS, secs);
    }
    if let Some(secs) = answer {
        prefs.set_int(KEY_TIMEOUT_ANSWER_SECONDS, secs);
    }

    app.storage
        .save_preferences(&prefs)
        .context("Failed to save preferences")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&prefs)?),
        OutputFormat::Plain => println!("Updated general preferences"),
    }

    Ok(())
}
