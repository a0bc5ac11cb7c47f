//! Run a review session driven only by the auto-advance timer.
//!
//! The console "screen" forwards timer callbacks over a channel to the session
//! loop, which owns the timer and plays the part of the review screen. Sides
//! with auto-advance off are advanced manually right away so the session keeps
//! moving.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::Instant;

use autoadvance_lib::{resolve_settings, AutoAdvanceSettings, AutoAdvanceTarget, AutoAdvanceTimer};

use crate::app::App;
use crate::render::terminal::{self, Color};

#[derive(Debug)]
enum ScreenEvent {
    ShowAnswer { manual: bool },
    ShowQuestion { manual: bool },
}

struct ConsoleScreen {
    sender: mpsc::UnboundedSender<ScreenEvent>,
}

impl AutoAdvanceTarget for ConsoleScreen {
    fn auto_show_question(&self) {
        let _ = self.sender.send(ScreenEvent::ShowQuestion { manual: false });
    }

    fn auto_show_answer(&self) {
        let _ = self.sender.send(ScreenEvent::ShowAnswer { manual: false });
    }
}

pub fn run(app: &App, deck_query: &str, cards: usize, use_color: bool) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let decks = app.load_decks()?;
    let prefs = app.load_preferences()?;
    let (settings, source) = resolve_settings(deck.id, &decks, &prefs);

    println!(
        "{}: {}",
        terminal::paint(&deck.name, Color::BOLD, use_color),
        terminal::render_settings(&settings, source, use_color)
    );

    if !settings.auto_advance_answer() && !settings.auto_advance_question() {
        println!("Nothing advances automatically for this deck");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start runtime")?;

    runtime.block_on(review_session(settings, cards.max(1), use_color))
}

async fn review_session(settings: AutoAdvanceSettings, cards: usize, use_color: bool) -> Result<()> {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let screen = Arc::new(ConsoleScreen { sender });
    let mut timer = AutoAdvanceTimer::new(settings, &screen)?;
    let started = Instant::now();

    let mut card = 1;
    show_question(&mut timer, &screen, card, started, false, use_color);

    while let Some(event) = receiver.recv().await {
        match event {
            ScreenEvent::ShowAnswer { manual } => {
                if manual {
                    timer.on_show_answer();
                }
                print_step(started, &format!("card {}: answer", card), manual, use_color);
                timer.on_display_answer();

                if settings.auto_advance_question() {
                    timer.schedule_display_question(Duration::ZERO);
                } else {
                    timer.on_select_ease();
                    let _ = screen.sender.send(ScreenEvent::ShowQuestion { manual: true });
                }
            }
            ScreenEvent::ShowQuestion { manual } => {
                if card == cards {
                    break;
                }
                card += 1;
                show_question(&mut timer, &screen, card, started, manual, use_color);
            }
        }
    }

    timer.stop_all();
    print_step(started, "session finished", false, use_color);
    Ok(())
}

fn show_question(
    timer: &mut AutoAdvanceTimer,
    screen: &ConsoleScreen,
    card: usize,
    started: Instant,
    manual: bool,
    use_color: bool,
) {
    print_step(started, &format!("card {}: question", card), manual, use_color);
    timer.on_display_question();

    if timer.settings().auto_advance_answer() {
        timer.schedule_display_answer(Duration::ZERO);
    } else {
        let _ = screen.sender.send(ScreenEvent::ShowAnswer { manual: true });
    }
}

fn print_step(started: Instant, what: &str, manual: bool, use_color: bool) {
    let elapsed = format!("{:>6.1}s", started.elapsed().as_secs_f64());
    let how = if manual { " (manual)" } else { "" };
    println!(
        "{} {}{}",
        terminal::paint(&elapsed, Color::GRAY, use_color),
        what,
        terminal::paint(how, Color::YELLOW, use_color)
    );
}
