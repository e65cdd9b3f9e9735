//! The question dialog
//!
//! Transient state for the question currently shown to the room. The
//! dialog gates scoring: it refuses to open an already played
//! question, remembers whether the multiple-choice list was revealed
//! (which halves the award), and forwards award/deduct clicks to the
//! scoring engine with the recorded target. Closing or replacing the
//! dialog cancels any reveal still in flight.

use web_time::Duration;

use crate::{
    board::question::Target,
    presenter::Presenter,
    reveal::{OptionsReveal, OptionsStep, RevealAlarm, Typewriter, TypewriterStep},
    scoring::{AwardReceipt, Scorekeeper, ScoringError},
    state::{BoardOptions, GameState},
    storage::RecordStore,
};

/// Placeholder prompt for a question authored without text
const EMPTY_PROMPT: &str = "(Sin texto)";

/// A visible update produced by a fired reveal alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From)]
pub enum DialogUpdate {
    /// Append to the question prompt
    Prompt(TypewriterStep),
    /// Advance the multiple-choice list
    Options(OptionsStep),
}

#[derive(Debug, Clone)]
struct OpenQuestion {
    target: Target,
    points: u64,
    title: String,
    answer: String,
    used_options: bool,
}

/// The question dialog state machine
#[derive(Debug)]
pub struct QuestionDialog {
    typewriter: Typewriter,
    options: OptionsReveal,
    current: Option<OpenQuestion>,
}

impl QuestionDialog {
    /// Creates a dialog with the session's reveal timings
    pub fn new(options: &BoardOptions) -> Self {
        Self {
            typewriter: Typewriter::new(options.typing_interval_ms),
            options: OptionsReveal::new(options.typing_interval_ms, options.option_pause_ms),
            current: None,
        }
    }

    /// Opens the dialog on a question of the active round
    ///
    /// Refuses (returns `false`) when the target does not exist or the
    /// question was already played. Any reveal still in flight is
    /// canceled before the new prompt starts typing.
    pub fn open<S: FnMut(RevealAlarm, Duration)>(
        &mut self,
        state: &GameState,
        target: Target,
        mut schedule: S,
    ) -> bool {
        let round = state.current_round();
        let Some(question) = round.question_at(target) else {
            return false;
        };
        if question.used {
            return false;
        }

        let title = match target {
            Target::Cell { category, .. } => round
                .categories
                .get(category)
                .cloned()
                .unwrap_or_default(),
            Target::Final => format!("{} - FINAL", round.name),
        };

        self.options.cancel();
        self.current = Some(OpenQuestion {
            target,
            points: question.value,
            title,
            answer: question.answer.clone(),
            used_options: false,
        });

        let prompt = if question.text.is_empty() {
            EMPTY_PROMPT
        } else {
            &question.text
        };
        self.typewriter
            .begin(prompt, |alarm, delay| schedule(alarm.into(), delay));
        true
    }

    /// Whether a question is currently open
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// The target of the open question
    pub fn target(&self) -> Option<Target> {
        self.current.as_ref().map(|open| open.target)
    }

    /// The point value of the open question
    pub fn points(&self) -> Option<u64> {
        self.current.as_ref().map(|open| open.points)
    }

    /// The dialog title (category name, or round name for the final)
    pub fn title(&self) -> Option<&str> {
        self.current.as_ref().map(|open| open.title.as_str())
    }

    /// The answer text revealed by the facilitator
    pub fn answer(&self) -> Option<&str> {
        self.current.as_ref().map(|open| open.answer.as_str())
    }

    /// Whether the option list has been revealed for this opening
    pub fn used_options(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|open| open.used_options)
    }

    /// Reveals the multiple-choice list, once per opening
    ///
    /// Flips the options flag that halves a subsequent award and starts
    /// the sequential option reveal. Returns `false` when no question
    /// is open, the question has no options, or they were already
    /// revealed.
    pub fn show_options<S: FnMut(RevealAlarm, Duration)>(
        &mut self,
        state: &GameState,
        mut schedule: S,
    ) -> bool {
        let Some(open) = &self.current else {
            return false;
        };
        if open.used_options {
            return false;
        }
        let Some(question) = state.current_round().question_at(open.target) else {
            return false;
        };
        if !question.has_options() {
            return false;
        }

        let entries = question.options();
        if let Some(open) = &mut self.current {
            open.used_options = true;
        }
        self.options
            .begin(&entries, |alarm, delay| schedule(alarm.into(), delay));
        true
    }

    /// Awards the open question's points to a player or team
    ///
    /// Forwards the recorded target, value, and options flag to the
    /// scoring engine; on success the dialog closes and its reveals
    /// stop.
    ///
    /// # Errors
    ///
    /// [`ScoringError::MissingQuestion`] when no question is open, plus
    /// anything [`Scorekeeper::award`] reports.
    pub fn award_current<S: RecordStore, P: Presenter>(
        &mut self,
        keeper: &Scorekeeper,
        state: &mut GameState,
        store: &S,
        presenter: &P,
        scorable_index: usize,
    ) -> Result<AwardReceipt, ScoringError> {
        let open = self
            .current
            .as_ref()
            .ok_or(ScoringError::MissingQuestion)?;
        let (target, points, used_options) = (open.target, open.points, open.used_options);

        let receipt = keeper.award(
            state,
            store,
            presenter,
            scorable_index,
            points,
            target,
            used_options,
        )?;
        self.close();
        Ok(receipt)
    }

    /// Deducts the open question's points from a player or team
    ///
    /// Deduction leaves the dialog open; the facilitator may still
    /// award the question to someone else.
    ///
    /// # Errors
    ///
    /// [`ScoringError::MissingQuestion`] when no question is open, plus
    /// anything [`Scorekeeper::deduct`] reports.
    pub fn deduct_current<S: RecordStore, P: Presenter>(
        &mut self,
        keeper: &Scorekeeper,
        state: &mut GameState,
        store: &S,
        presenter: &P,
        scorable_index: usize,
    ) -> Result<bool, ScoringError> {
        let points = self
            .current
            .as_ref()
            .map(|open| open.points)
            .ok_or(ScoringError::MissingQuestion)?;
        keeper.deduct(state, store, presenter, scorable_index, points)
    }

    /// Advances whichever reveal a fired alarm belongs to
    ///
    /// Stale alarms from closed or replaced dialogs are ignored.
    pub fn receive_alarm<S: FnMut(RevealAlarm, Duration)>(
        &mut self,
        alarm: RevealAlarm,
        mut schedule: S,
    ) -> Option<DialogUpdate> {
        match alarm {
            RevealAlarm::Typewriter(alarm) => self
                .typewriter
                .receive_alarm(alarm, |alarm, delay| schedule(alarm.into(), delay))
                .map(DialogUpdate::from),
            RevealAlarm::Options(alarm) => self
                .options
                .receive_alarm(alarm, |alarm, delay| schedule(alarm.into(), delay))
                .map(DialogUpdate::from),
        }
    }

    /// Closes the dialog and cancels any reveal in flight
    pub fn close(&mut self) {
        self.typewriter.cancel();
        self.options.cancel();
        self.current = None;
    }
}
