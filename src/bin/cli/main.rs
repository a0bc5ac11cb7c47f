mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use autoadvance_lib::storage::TimeoutOptionsUpdate;

#[derive(Parser)]
#[command(
    name = "autoadvance-cli",
    about = "Inspect and try out review auto-advance settings",
    version
)]
struct Cli {
    /// Data directory holding decks.json and preferences.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List decks and where their timer settings come from
    Decks,

    /// Create a deck
    NewDeck {
        /// Deck name
        name: String,
        /// Create a dynamic (filtered) deck
        #[arg(long)]
        dynamic: bool,
    },

    /// Delete a deck
    DeleteDeck {
        /// Deck ID or name (case-insensitive prefix match)
        deck: String,
    },

    /// Show the effective auto-advance settings for a deck
    Settings {
        /// Deck ID or name (case-insensitive prefix match)
        deck: String,
    },

    /// Change a deck's timeout options
    SetDeck {
        /// Deck ID or name (case-insensitive prefix match)
        deck: String,
        /// Defer to the general preferences
        #[arg(long)]
        use_general: Option<bool>,
        /// Turn the timer on or off
        #[arg(long)]
        timer: Option<bool>,
        /// Seconds the answer is shown before the next question (0 = never)
        #[arg(long)]
        question: Option<i64>,
        /// Seconds the question is shown before the answer (0 = never)
        #[arg(long)]
        answer: Option<i64>,
    },

    /// Change the general preferences
    SetPrefs {
        /// Turn the timer on or off
        #[arg(long)]
        timer: Option<bool>,
        /// Seconds the answer is shown before the next question (0 = never)
        #[arg(long)]
        question: Option<i64>,
        /// Seconds the question is shown before the answer (0 = never)
        #[arg(long)]
        answer: Option<i64>,
    },

    /// Run a review session that advances on the timer alone
    Simulate {
        /// Deck ID or name (case-insensitive prefix match)
        deck: String,
        /// Number of cards to go through
        #[arg(long, default_value = "3")]
        cards: usize,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::Decks => {
            commands::decks::run_list(&app, &cli.format, use_color)?;
        }
        Command::NewDeck { name, dynamic } => {
            commands::decks::run_new(&app, &name, dynamic, &cli.format)?;
        }
        Command::DeleteDeck { deck } => {
            commands::decks::run_delete(&app, &deck, &cli.format)?;
        }
        Command::Settings { deck } => {
            commands::settings::run(&app, &deck, &cli.format, use_color)?;
        }
        Command::SetDeck { deck, use_general, timer, question, answer } => {
            let update = TimeoutOptionsUpdate {
                use_general,
                use_timer: timer,
                question_secs: question,
                answer_secs: answer,
            };
            commands::configure::run_set_deck(&app, &deck, update, &cli.format)?;
        }
        Command::SetPrefs { timer, question, answer } => {
            commands::configure::run_set_prefs(&app, timer, question, answer, &cli.format)?;
        }
        Command::Simulate { deck, cards } => {
            commands::simulate::run(&app, &deck, cards, use_color)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
