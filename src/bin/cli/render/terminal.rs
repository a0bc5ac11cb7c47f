use autoadvance_lib::{AutoAdvanceSettings, SettingsSource};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// One-line summary of resolved settings, e.g. "answer after 10s, next question after 5s [deck]"
pub fn render_settings(
    settings: &AutoAdvanceSettings,
    source: SettingsSource,
    use_color: bool,
) -> String {
    let summary = if settings.use_timer() {
        paint(&settings.to_string(), Color::GREEN, use_color)
    } else {
        paint(&settings.to_string(), Color::GRAY, use_color)
    };
    let source = paint(&format!("[{}]", source), Color::DIM, use_color);
    format!("{} {}", summary, source)
}

/// JSON shape used by `--format json`
pub fn settings_json(settings: &AutoAdvanceSettings, source: SettingsSource) -> serde_json::Value {
    serde_json::json!({
        "source": source,
        "useTimer": settings.use_timer(),
        "questionDelaySecs": settings.question_delay_secs(),
        "answerDelaySecs": settings.answer_delay_secs(),
        "autoAdvanceAnswer": settings.auto_advance_answer(),
        "autoAdvanceQuestion": settings.auto_advance_question(),
    })
}
