//! Auto-advance timer
//!
//! Posts one-shot delayed callbacks on a tokio runtime and cancels them when the
//! review screen moves on by itself. At most one show-answer and one
//! show-question callback are pending at any time.
//!
//! All scheduling and cancelling is expected to happen from the thread that
//! drives the review screen, with the runtime being that screen's
//! (current-thread) event loop. Cancelling is best effort: a callback that has
//! already started running is not interrupted.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::config::{resolve_settings, DeckConfigSource, PreferenceStore};
use super::models::AutoAdvanceSettings;

#[derive(Error, Debug)]
pub enum TimerError {
    #[error("No tokio runtime to post auto-advance callbacks on")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, TimerError>;

/// Receiver of the automatic transitions, normally the review screen
pub trait AutoAdvanceTarget: Send + Sync {
    /// The answer has been up long enough, move on to the next question
    fn auto_show_question(&self);

    /// The question has been up long enough, reveal the answer
    fn auto_show_answer(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    ShowAnswer,
    ShowQuestion,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShowAnswer => write!(f, "show answer"),
            Self::ShowQuestion => write!(f, "show question"),
        }
    }
}

pub struct AutoAdvanceTimer {
    settings: AutoAdvanceSettings,
    /// Not owned: the screen usually owns the timer
    target: Weak<dyn AutoAdvanceTarget>,
    runtime: Handle,
    show_answer_task: Option<JoinHandle<()>>,
    show_question_task: Option<JoinHandle<()>>,
}

impl AutoAdvanceTimer {
    /// Create a timer posting to the runtime of the calling context
    pub fn new<T>(settings: AutoAdvanceSettings, target: &Arc<T>) -> Result<Self>
    where
        T: AutoAdvanceTarget + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| TimerError::NoRuntime)?;
        Ok(Self::with_runtime(settings, target, runtime))
    }

    /// Create a timer posting to an explicit runtime
    pub fn with_runtime<T>(settings: AutoAdvanceSettings, target: &Arc<T>, runtime: Handle) -> Self
    where
        T: AutoAdvanceTarget + 'static,
    {
        let target: Weak<T> = Arc::downgrade(target);
        let target: Weak<dyn AutoAdvanceTarget> = target;
        Self {
            settings,
            target,
            runtime,
            show_answer_task: None,
            show_question_task: None,
        }
    }

    /// Create a timer for a review session on `deck_id`, using the deck's own
    /// options when it has them and the general preferences otherwise
    pub fn for_deck<D, P, T>(deck_id: Uuid, decks: &D, prefs: &P, target: &Arc<T>) -> Result<Self>
    where
        D: DeckConfigSource + ?Sized,
        P: PreferenceStore + ?Sized,
        T: AutoAdvanceTarget + 'static,
    {
        let (settings, _) = resolve_settings(deck_id, decks, prefs);
        Self::new(settings, target)
    }

    pub fn settings(&self) -> &AutoAdvanceSettings {
        &self.settings
    }

    /// Reveal the answer automatically after the answer delay plus `extra_delay`.
    ///
    /// `extra_delay` is typically the length of audio still playing on the card.
    pub fn schedule_display_answer(&mut self, extra_delay: Duration) {
        if !self.settings.auto_advance_answer() {
            return;
        }
        let delay = self.settings.show_answer_delay().saturating_add(extra_delay);
        cancel(&mut self.show_answer_task);
        self.show_answer_task = Some(self.post(Transition::ShowAnswer, delay));
    }

    /// Show the next question automatically after the question delay plus `extra_delay`
    pub fn schedule_display_question(&mut self, extra_delay: Duration) {
        if !self.settings.auto_advance_question() {
            return;
        }
        let delay = self.settings.show_question_delay().saturating_add(extra_delay);
        cancel(&mut self.show_question_task);
        self.show_question_task = Some(self.post(Transition::ShowQuestion, delay));
    }

    /// A question is on screen: drop any show-answer left over from the previous card
    pub fn on_display_question(&mut self) {
        if cancel(&mut self.show_answer_task) {
            log::debug!("Cancelled pending automatic show answer");
        }
    }

    /// An answer is on screen: drop any pending show-question
    pub fn on_display_answer(&mut self) {
        if cancel(&mut self.show_question_task) {
            log::debug!("Cancelled pending automatic show question");
        }
    }

    // The two manual hooks below narrow the window in which the automatic
    // transition can fire after the user acted, but do not close it: a
    // callback that is already running still goes through.

    /// The user picked an ease manually
    pub fn on_select_ease(&mut self) {
        cancel(&mut self.show_question_task);
    }

    /// The user revealed the answer manually
    pub fn on_show_answer(&mut self) {
        cancel(&mut self.show_question_task);
    }

    /// Cancel both callbacks. Must run when the review session ends; dropping
    /// the timer does it as well.
    pub fn stop_all(&mut self) {
        let answer = cancel(&mut self.show_answer_task);
        let question = cancel(&mut self.show_question_task);
        if answer || question {
            log::debug!("Stopped pending auto-advance callbacks");
        }
    }

    pub fn has_pending_answer(&self) -> bool {
        is_pending(&self.show_answer_task)
    }

    pub fn has_pending_question(&self) -> bool {
        is_pending(&self.show_question_task)
    }

    fn post(&self, transition: Transition, delay: Duration) -> JoinHandle<()> {
        log::debug!("Scheduling automatic {} in {:?}", transition, delay);

        let target = Weak::clone(&self.target);
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(target) = target.upgrade() else {
                log::debug!("Review screen gone, skipping automatic {}", transition);
                return;
            };
            match transition {
                Transition::ShowAnswer => target.auto_show_answer(),
                Transition::ShowQuestion => target.auto_show_question(),
            }
        })
    }
}

impl Drop for AutoAdvanceTimer {
    fn drop(&mut self) {
        self.stop_all();
    }
}

impl fmt::Debug for AutoAdvanceTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoAdvanceTimer")
            .field("settings", &self.settings)
            .field("pending_answer", &self.has_pending_answer())
            .field("pending_question", &self.has_pending_question())
            .finish()
    }
}

/// Abort the task if any; returns whether it had not fired yet
fn cancel(task: &mut Option<JoinHandle<()>>) -> bool {
    match task.take() {
        Some(handle) => {
            let pending = !handle.is_finished();
            handle.abort();
            pending
        }
        None => false,
    }
}

fn is_pending(task: &Option<JoinHandle<()>>) -> bool {
    task.as_ref().is_some_and(|handle| !handle.is_finished())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTarget {
        events: Mutex<Vec<Transition>>,
    }

    impl RecordingTarget {
        fn events(&self) -> Vec<Transition> {
            self.events.lock().unwrap().clone()
        }
    }

    impl AutoAdvanceTarget for RecordingTarget {
        fn auto_show_question(&self) {
            self.events.lock().unwrap().push(Transition::ShowQuestion);
        }

        fn auto_show_answer(&self) {
            self.events.lock().unwrap().push(Transition::ShowAnswer);
        }
    }

    fn timer(settings: AutoAdvanceSettings) -> (AutoAdvanceTimer, Arc<RecordingTarget>) {
        let target = Arc::new(RecordingTarget::default());
        let timer = AutoAdvanceTimer::new(settings, &target).unwrap();
        (timer, target)
    }

    async fn advance(secs: u64) {
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_answer_fires_after_answer_delay() {
        let (mut timer, target) = timer(AutoAdvanceSettings::new(true, 3, 5));

        timer.schedule_display_answer(Duration::ZERO);
        assert!(timer.has_pending_answer());

        advance(4).await;
        assert!(target.events().is_empty());

        advance(2).await;
        assert_eq!(target.events(), vec![Transition::ShowAnswer]);
        assert!(!timer.has_pending_answer());
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_question_fires_after_question_delay_plus_extra() {
        let (mut timer, target) = timer(AutoAdvanceSettings::new(true, 3, 5));

        timer.schedule_display_question(Duration::from_secs(2));

        advance(4).await;
        assert!(target.events().is_empty());

        advance(2).await;
        assert_eq!(target.events(), vec![Transition::ShowQuestion]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_off_never_schedules() {
        let (mut timer, target) = timer(AutoAdvanceSettings::new(false, 1, 1));

        timer.schedule_display_answer(Duration::ZERO);
        timer.schedule_display_question(Duration::ZERO);
        assert!(!timer.has_pending_answer());
        assert!(!timer.has_pending_question());

        advance(10).await;
        assert!(target.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_disables_that_side() {
        let (mut timer, target) = timer(AutoAdvanceSettings::new(true, 2, 0));

        timer.schedule_display_answer(Duration::ZERO);
        assert!(!timer.has_pending_answer());

        timer.schedule_display_question(Duration::ZERO);
        advance(3).await;
        assert_eq!(target.events(), vec![Transition::ShowQuestion]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_question_cancels_pending_answer() {
        let (mut timer, target) = timer(AutoAdvanceSettings::new(true, 5, 5));

        timer.schedule_display_answer(Duration::ZERO);
        timer.schedule_display_question(Duration::ZERO);
        timer.on_display_question();
        assert!(!timer.has_pending_answer());
        assert!(timer.has_pending_question());

        advance(6).await;
        assert_eq!(target.events(), vec![Transition::ShowQuestion]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_answer_cancels_pending_question() {
        let (mut timer, target) = timer(AutoAdvanceSettings::new(true, 5, 5));

        timer.schedule_display_question(Duration::ZERO);
        timer.schedule_display_answer(Duration::ZERO);
        timer.on_display_answer();
        assert!(!timer.has_pending_question());

        advance(6).await;
        assert_eq!(target.events(), vec![Transition::ShowAnswer]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_actions_cancel_pending_question() {
        let (mut timer, target) = timer(AutoAdvanceSettings::new(true, 5, 5));

        timer.schedule_display_question(Duration::ZERO);
        timer.on_select_ease();
        assert!(!timer.has_pending_question());

        timer.schedule_display_question(Duration::ZERO);
        timer.on_show_answer();
        assert!(!timer.has_pending_question());

        advance(6).await;
        assert!(target.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_leaves_nothing_pending() {
        let (mut timer, target) = timer(AutoAdvanceSettings::new(true, 1, 1));

        timer.schedule_display_answer(Duration::ZERO);
        timer.schedule_display_question(Duration::ZERO);
        timer.stop_all();
        assert!(!timer.has_pending_answer());
        assert!(!timer.has_pending_question());

        advance(5).await;
        assert!(target.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rescheduling_replaces_pending_callback() {
        let (mut timer, target) = timer(AutoAdvanceSettings::new(true, 5, 5));

        timer.schedule_display_answer(Duration::ZERO);
        advance(3).await;
        timer.schedule_display_answer(Duration::ZERO);

        advance(3).await;
        assert!(target.events().is_empty());

        advance(3).await;
        assert_eq!(target.events(), vec![Transition::ShowAnswer]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_callbacks() {
        let (mut timer, target) = timer(AutoAdvanceSettings::new(true, 1, 1));

        timer.schedule_display_answer(Duration::ZERO);
        drop(timer);

        advance(5).await;
        assert!(target.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_target_is_skipped() {
        let (mut timer, target) = timer(AutoAdvanceSettings::new(true, 1, 1));

        timer.schedule_display_answer(Duration::ZERO);
        drop(target);

        advance(5).await;
        assert!(!timer.has_pending_answer());
    }

    #[tokio::test(start_paused = true)]
    async fn test_for_deck_uses_deck_options() {
        use crate::storage::{Deck, DeckCollection, Preferences, TimeoutOptionsUpdate};

        let mut deck = Deck::new("Verbs".to_string());
        TimeoutOptionsUpdate {
            use_general: Some(false),
            use_timer: Some(true),
            question_secs: Some(0),
            answer_secs: Some(2),
        }
        .apply(&mut deck.options);
        let decks = DeckCollection::new(vec![deck.clone()]);

        let target = Arc::new(RecordingTarget::default());
        let mut timer =
            AutoAdvanceTimer::for_deck(deck.id, &decks, &Preferences::default(), &target).unwrap();
        assert_eq!(*timer.settings(), AutoAdvanceSettings::new(true, 0, 2));

        timer.schedule_display_answer(Duration::ZERO);
        timer.schedule_display_question(Duration::ZERO);
        assert!(timer.has_pending_answer());
        assert!(!timer.has_pending_question());

        advance(3).await;
        assert_eq!(target.events(), vec![Transition::ShowAnswer]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_extra_delay_saturates() {
        let (mut timer, target) = timer(AutoAdvanceSettings::new(true, 5, 5));

        timer.schedule_display_answer(Duration::MAX);
        timer.schedule_display_question(Duration::MAX);
        assert!(timer.has_pending_answer());
        assert!(timer.has_pending_question());

        advance(60).await;
        assert!(target.events().is_empty());

        timer.stop_all();
        assert!(!timer.has_pending_answer());
        assert!(!timer.has_pending_question());
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let target = Arc::new(RecordingTarget::default());
        let result = AutoAdvanceTimer::new(AutoAdvanceSettings::default(), &target);
        assert!(matches!(result, Err(TimerError::NoRuntime)));
    }
}
