//! Data models for the auto-advance timer

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Deck option: defer to the general preferences instead of the deck's own values
pub const KEY_USE_GENERAL_TIMEOUT_SETTINGS: &str = "useGeneralTimeoutSettings";
/// Deck option / preference: whether the auto-advance timer is on
pub const KEY_TIMEOUT_ANSWER: &str = "timeoutAnswer";
/// Deck option / preference: seconds the answer stays up before the next question is shown
pub const KEY_TIMEOUT_QUESTION_SECONDS: &str = "timeoutQuestionSeconds";
/// Deck option / preference: seconds the question stays up before the answer is revealed
pub const KEY_TIMEOUT_ANSWER_SECONDS: &str = "timeoutAnswerSeconds";

pub const DEFAULT_USE_GENERAL_TIMEOUT_SETTINGS: bool = true;
pub const DEFAULT_USE_TIMER: bool = false;
pub const DEFAULT_QUESTION_DELAY_SECS: i64 = 60;
pub const DEFAULT_ANSWER_DELAY_SECS: i64 = 20;

/// Resolved auto-advance configuration for one review session.
///
/// The enabled flags and millisecond delays are derived once in [`AutoAdvanceSettings::new`]
/// and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoAdvanceSettings {
    use_timer: bool,
    question_delay_secs: u32,
    answer_delay_secs: u32,
    auto_advance_answer: bool,
    auto_advance_question: bool,
    show_question_delay: Duration,
    show_answer_delay: Duration,
}

impl AutoAdvanceSettings {
    /// `question_delay_secs` is the wait before the next question and
    /// `answer_delay_secs` the wait before the answer is revealed. Negative
    /// delays are treated as 0, which disables that side.
    pub fn new(use_timer: bool, question_delay_secs: i64, answer_delay_secs: i64) -> Self {
        let question_delay_secs = clamp_secs(question_delay_secs);
        let answer_delay_secs = clamp_secs(answer_delay_secs);
        Self {
            use_timer,
            question_delay_secs,
            answer_delay_secs,
            auto_advance_answer: use_timer && answer_delay_secs > 0,
            auto_advance_question: use_timer && question_delay_secs > 0,
            show_question_delay: Duration::from_millis(u64::from(question_delay_secs) * 1000),
            show_answer_delay: Duration::from_millis(u64::from(answer_delay_secs) * 1000),
        }
    }

    pub fn use_timer(&self) -> bool {
        self.use_timer
    }

    pub fn question_delay_secs(&self) -> u32 {
        self.question_delay_secs
    }

    pub fn answer_delay_secs(&self) -> u32 {
        self.answer_delay_secs
    }

    /// Whether the answer should be revealed automatically once the question has been up
    pub fn auto_advance_answer(&self) -> bool {
        self.auto_advance_answer
    }

    /// Whether the next question should follow automatically once the answer has been up
    pub fn auto_advance_question(&self) -> bool {
        self.auto_advance_question
    }

    /// How long the question is shown before the answer is revealed
    pub fn show_answer_delay(&self) -> Duration {
        self.show_answer_delay
    }

    /// How long the answer is shown before the next question appears
    pub fn show_question_delay(&self) -> Duration {
        self.show_question_delay
    }
}

impl Default for AutoAdvanceSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_USE_TIMER,
            DEFAULT_QUESTION_DELAY_SECS,
            DEFAULT_ANSWER_DELAY_SECS,
        )
    }
}

impl fmt::Display for AutoAdvanceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.use_timer {
            return write!(f, "timer off");
        }
        let side = |enabled: bool, secs: u32| {
            if enabled {
                format!("{}s", secs)
            } else {
                "never".to_string()
            }
        };
        write!(
            f,
            "answer after {}, next question after {}",
            side(self.auto_advance_answer, self.answer_delay_secs),
            side(self.auto_advance_question, self.question_delay_secs),
        )
    }
}

fn clamp_secs(secs: i64) -> u32 {
    secs.clamp(0, i64::from(u32::MAX)) as u32
}

/// Where a session's settings were taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingsSource {
    /// The deck's own review options
    Deck,
    /// The general preferences
    General,
}

impl fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deck => write!(f, "deck"),
            Self::General => write!(f, "general"),
        }
    }
}
