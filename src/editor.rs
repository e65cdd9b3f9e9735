//! Round content editing
//!
//! All editing happens on the draft opened by
//! [`GameState::start_editing`]; the live round is untouched until the
//! draft is saved, and a cancel throws the draft away. The only hard
//! validation is the no-blank-category-names rule at save time and the
//! one-category/one-question floors enforced during edits; numeric
//! input silently coerces to a default instead of rejecting.

use thiserror::Error;

use crate::{
    board::{
        media::{Media, MediaSlot},
        question::{Question, Target},
        round::Round,
    },
    constants,
    presenter::{ConfirmPrompt, Notice, Presenter},
    state::GameState,
    storage::{RecordStore, SaveOutcome},
};

/// Errors that can occur while editing a round
///
/// All of these abort the offending operation and leave the draft (and
/// the live round) unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No editing session is open
    #[error("nothing is being edited")]
    NoDraft,
    /// The draft has no content to save
    #[error("there is nothing to save")]
    EmptyDraft,
    /// A category name is blank; the save is aborted with no partial
    /// commit
    #[error("every category needs a name")]
    BlankCategory,
    /// The draft must keep at least one category
    #[error("at least one category must remain")]
    LastCategory,
    /// A category must keep at least one question
    #[error("at least one question must remain")]
    LastQuestion,
    /// No category at the given index
    #[error("no category at index {0}")]
    MissingCategory(usize),
    /// No question at the given board position
    #[error("no question at the requested position")]
    MissingQuestion,
}

/// An editable field of a draft question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionField {
    /// Point value; raw input is parsed as an integer, defaulting to 0
    Value,
    /// Prompt text
    Text,
    /// Answer text
    Answer,
    /// Slash-separated multiple-choice list; blank clears it
    MultipleChoice,
}

/// The final-question form as filled in by the facilitator
///
/// Raw field values are coerced the same way grid fields are: the
/// value parses as an integer defaulting to 0, text fields are stored
/// as given. Existing media attachments on the final question are kept.
#[derive(Debug, Clone, Default)]
pub struct FinalQuestionForm {
    /// Raw point value input
    pub value: String,
    /// Prompt text
    pub text: String,
    /// Answer text
    pub answer: String,
    /// Slash-separated multiple-choice list
    pub multiple_choice: String,
}

/// Mutating operations over the open editing draft
///
/// Borrows the draft exclusively for the duration of an editor
/// interaction; obtain one with [`DraftEditor::open`].
#[derive(Debug)]
pub struct DraftEditor<'a> {
    draft: &'a mut Round,
}

impl<'a> DraftEditor<'a> {
    /// Opens the editor over the state's editing draft
    ///
    /// Returns `None` when no editing session is open.
    pub fn open(state: &'a mut GameState) -> Option<Self> {
        state.draft.as_mut().map(|draft| Self { draft })
    }

    /// The draft being edited
    pub fn draft(&self) -> &Round {
        self.draft
    }

    /// Appends a placeholder category with one placeholder question
    pub fn add_category(&mut self) {
        self.draft
            .categories
            .push(constants::question::NEW_CATEGORY_NAME.to_owned());
        self.draft.questions.push(vec![Question::placeholder(
            constants::question::DEFAULT_VALUE,
        )]);
    }

    /// Removes a category and its whole question column
    ///
    /// Returns `false` when the facilitator declined the confirmation.
    ///
    /// # Errors
    ///
    /// [`Error::LastCategory`] when only one category remains,
    /// [`Error::MissingCategory`] for an out-of-range index.
    pub fn remove_category<P: Presenter>(
        &mut self,
        presenter: &P,
        index: usize,
    ) -> Result<bool, Error> {
        if self.draft.categories.len() <= 1 {
            return Err(Error::LastCategory);
        }
        let name = self
            .draft
            .categories
            .get(index)
            .ok_or(Error::MissingCategory(index))?
            .clone();

        if !presenter.confirm(ConfirmPrompt::RemoveCategory { name: &name }) {
            return Ok(false);
        }

        self.draft.categories.remove(index);
        self.draft.questions.remove(index);
        Ok(true)
    }

    /// Appends a question to a category column
    ///
    /// The new question's value continues the column: the last value
    /// plus the step, or the default for an empty column, so
    /// bulk-authored rounds get ascending point values automatically.
    ///
    /// # Errors
    ///
    /// [`Error::MissingCategory`] for an out-of-range index.
    pub fn add_question(&mut self, category: usize) -> Result<(), Error> {
        let column = self
            .draft
            .questions
            .get_mut(category)
            .ok_or(Error::MissingCategory(category))?;

        let value = column.last().map_or(constants::question::DEFAULT_VALUE, |last| {
            last.value + constants::question::VALUE_STEP
        });
        column.push(Question::placeholder(value));
        Ok(())
    }

    /// Removes a question from a category column
    ///
    /// Returns `false` when the facilitator declined the confirmation.
    ///
    /// # Errors
    ///
    /// [`Error::LastQuestion`] when the column would become empty,
    /// [`Error::MissingCategory`]/[`Error::MissingQuestion`] for
    /// out-of-range indices.
    pub fn remove_question<P: Presenter>(
        &mut self,
        presenter: &P,
        category: usize,
        index: usize,
    ) -> Result<bool, Error> {
        let column = self
            .draft
            .questions
            .get_mut(category)
            .ok_or(Error::MissingCategory(category))?;
        if column.len() <= 1 {
            return Err(Error::LastQuestion);
        }
        if index >= column.len() {
            return Err(Error::MissingQuestion);
        }

        if !presenter.confirm(ConfirmPrompt::RemoveQuestion) {
            return Ok(false);
        }

        column.remove(index);
        Ok(true)
    }

    /// Renames a category
    ///
    /// Blank names are stored as given; they are rejected at save time.
    ///
    /// # Errors
    ///
    /// [`Error::MissingCategory`] for an out-of-range index.
    pub fn update_category(&mut self, index: usize, name: &str) -> Result<(), Error> {
        let category = self
            .draft
            .categories
            .get_mut(index)
            .ok_or(Error::MissingCategory(index))?;
        *category = name.to_owned();
        Ok(())
    }

    /// Writes one field of a draft question from raw form input
    ///
    /// # Errors
    ///
    /// [`Error::MissingCategory`]/[`Error::MissingQuestion`] for
    /// out-of-range indices.
    pub fn update_question(
        &mut self,
        category: usize,
        index: usize,
        field: QuestionField,
        raw: &str,
    ) -> Result<(), Error> {
        if category >= self.draft.categories.len() {
            return Err(Error::MissingCategory(category));
        }
        let question = self
            .draft
            .question_at_mut(Target::Cell {
                category,
                row: index,
            })
            .ok_or(Error::MissingQuestion)?;

        match field {
            QuestionField::Value => question.value = raw.trim().parse().unwrap_or(0),
            QuestionField::Text => question.text = raw.to_owned(),
            QuestionField::Answer => question.answer = raw.to_owned(),
            QuestionField::MultipleChoice => {
                question.multiple_choice = if raw.trim().is_empty() {
                    None
                } else {
                    Some(raw.to_owned())
                };
            }
        }
        Ok(())
    }

    /// Attaches an encoded media payload to a question slot
    ///
    /// Attaching to [`Target::Final`] lazily creates a default final
    /// question to hang the media on.
    ///
    /// # Errors
    ///
    /// [`Error::MissingQuestion`] when a grid target is out of range.
    pub fn attach_media(
        &mut self,
        target: Target,
        slot: MediaSlot,
        media: Media,
    ) -> Result<(), Error> {
        let question = match target {
            Target::Final => self.draft.final_question_mut_or_default(),
            cell => self
                .draft
                .question_at_mut(cell)
                .ok_or(Error::MissingQuestion)?,
        };
        question.set_media(slot, Some(media));
        Ok(())
    }

    /// Detaches the media payload in a question slot
    ///
    /// Removing from a round without a final question is a no-op.
    ///
    /// # Errors
    ///
    /// [`Error::MissingQuestion`] when a grid target is out of range.
    pub fn remove_media(&mut self, target: Target, slot: MediaSlot) -> Result<(), Error> {
        let question = match target {
            Target::Final => match self.draft.final_question.as_mut() {
                Some(final_question) => final_question,
                None => return Ok(()),
            },
            cell => self
                .draft
                .question_at_mut(cell)
                .ok_or(Error::MissingQuestion)?,
        };
        question.set_media(slot, None);
        Ok(())
    }

    /// Creates or replaces the draft's final question from the form
    ///
    /// Media already attached to the final question is preserved; the
    /// used flags start cleared so a re-authored final question is
    /// playable again.
    pub fn set_final_question(&mut self, form: &FinalQuestionForm) {
        let (media1, media2) = match self.draft.final_question.take() {
            Some(previous) => (previous.media1, previous.media2),
            None => (None, None),
        };

        self.draft.final_question = Some(Question {
            value: form.value.trim().parse().unwrap_or(0),
            text: form.text.clone(),
            answer: form.answer.clone(),
            multiple_choice: if form.multiple_choice.trim().is_empty() {
                None
            } else {
                Some(form.multiple_choice.clone())
            },
            media1,
            media2,
            used: false,
            used_with_options: false,
        });
    }

    /// Removes the final question from the draft
    pub fn clear_final_question<P: Presenter>(&mut self, presenter: &P) {
        self.draft.final_question = None;
        presenter.notify(&Notice::FinalQuestionCleared);
    }
}

/// Validates the draft and commits it into the live round
///
/// Aborts with no partial commit when the draft is empty or any
/// category name is blank. On success the live round is replaced, the
/// editing session ends, and the round record is flushed; the returned
/// [`SaveOutcome`] reports whether the flush degraded.
///
/// # Errors
///
/// [`Error::NoDraft`], [`Error::EmptyDraft`], or
/// [`Error::BlankCategory`]; the draft stays open on failure so the
/// facilitator can fix it.
pub fn save_draft<S: RecordStore, P: Presenter>(
    state: &mut GameState,
    store: &S,
    presenter: &P,
) -> Result<SaveOutcome, Error> {
    let draft = state.draft().ok_or(Error::NoDraft)?;
    if draft.categories.is_empty() {
        return Err(Error::EmptyDraft);
    }
    if draft.categories.iter().any(|name| name.trim().is_empty()) {
        return Err(Error::BlankCategory);
    }
    let round_name = draft.name.clone();

    state.commit_editing();

    let outcome = store.save_rounds(&state.rounds);
    if let Some(notice) = outcome.notice() {
        presenter.notify(&notice);
    }
    presenter.notify(&Notice::RoundSaved { round_name });
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{presenter::test_support::RecordingPresenter, storage::MemoryStore};

    fn editing_state() -> GameState {
        let mut state = GameState::new();
        {
            let round = state.current_round_mut();
            round.categories.push("Historia".to_string());
            round.questions.push(vec![Question::placeholder(100)]);
        }
        state.start_editing();
        state
    }

    #[test]
    fn test_add_category_with_placeholder_question() {
        let mut state = editing_state();
        let mut editor = DraftEditor::open(&mut state).expect("draft should be open");

        editor.add_category();

        let draft = editor.draft();
        assert_eq!(draft.categories.len(), 2);
        assert_eq!(draft.categories[1], "Nueva Categoría");
        assert_eq!(draft.questions[1].len(), 1);
        assert_eq!(draft.questions[1][0].value, 100);
    }

    #[test]
    fn test_remove_last_category_is_rejected() {
        let mut state = editing_state();
        let presenter = RecordingPresenter::confirming();
        let mut editor = DraftEditor::open(&mut state).expect("draft should be open");

        assert_eq!(
            editor.remove_category(&presenter, 0),
            Err(Error::LastCategory)
        );
        assert_eq!(editor.draft().categories.len(), 1);
    }

    #[test]
    fn test_remove_category_takes_its_column() {
        let mut state = editing_state();
        let presenter = RecordingPresenter::confirming();
        let mut editor = DraftEditor::open(&mut state).expect("draft should be open");
        editor.add_category();

        let removed = editor
            .remove_category(&presenter, 0)
            .expect("remove should resolve");
        assert!(removed);
        assert_eq!(editor.draft().categories, vec!["Nueva Categoría"]);
        assert_eq!(editor.draft().questions.len(), 1);
    }

    #[test]
    fn test_add_question_auto_increments_value() {
        let mut state = editing_state();
        let mut editor = DraftEditor::open(&mut state).expect("draft should be open");
        editor.draft.questions[0][0].value = 300;

        editor.add_question(0).expect("add should succeed");
        assert_eq!(editor.draft().questions[0][1].value, 400);
    }

    #[test]
    fn test_add_question_to_empty_column_uses_default() {
        let mut state = editing_state();
        let mut editor = DraftEditor::open(&mut state).expect("draft should be open");
        editor.draft.questions[0].clear();

        editor.add_question(0).expect("add should succeed");
        assert_eq!(editor.draft().questions[0][0].value, 100);
    }

    #[test]
    fn test_remove_last_question_is_rejected() {
        let mut state = editing_state();
        let presenter = RecordingPresenter::confirming();
        let mut editor = DraftEditor::open(&mut state).expect("draft should be open");

        assert_eq!(
            editor.remove_question(&presenter, 0, 0),
            Err(Error::LastQuestion)
        );
        assert_eq!(editor.draft().questions[0].len(), 1);
    }

    #[test]
    fn test_update_question_value_coerces_bad_input() {
        let mut state = editing_state();
        let mut editor = DraftEditor::open(&mut state).expect("draft should be open");

        editor
            .update_question(0, 0, QuestionField::Value, " 250 ")
            .expect("update should succeed");
        assert_eq!(editor.draft().questions[0][0].value, 250);

        editor
            .update_question(0, 0, QuestionField::Value, "doscientos")
            .expect("update should succeed");
        assert_eq!(editor.draft().questions[0][0].value, 0);
    }

    #[test]
    fn test_update_question_blank_options_clear_the_list() {
        let mut state = editing_state();
        let mut editor = DraftEditor::open(&mut state).expect("draft should be open");

        editor
            .update_question(0, 0, QuestionField::MultipleChoice, "a / b / c")
            .expect("update should succeed");
        assert!(editor.draft().questions[0][0].has_options());

        editor
            .update_question(0, 0, QuestionField::MultipleChoice, "   ")
            .expect("update should succeed");
        assert!(!editor.draft().questions[0][0].has_options());
    }

    #[test]
    fn test_attach_media_to_final_creates_it() {
        let mut state = editing_state();
        let mut editor = DraftEditor::open(&mut state).expect("draft should be open");
        let media = Media::from_mime("audio/mpeg", "data:audio/mpeg;base64,AAAA");

        editor
            .attach_media(Target::Final, MediaSlot::First, media)
            .expect("attach should succeed");

        let final_question = editor
            .draft()
            .final_question
            .as_ref()
            .expect("final question should have been created");
        assert_eq!(final_question.value, 500);
        assert!(final_question.media1.is_some());
    }

    #[test]
    fn test_remove_media_without_final_is_noop() {
        let mut state = editing_state();
        let mut editor = DraftEditor::open(&mut state).expect("draft should be open");

        editor
            .remove_media(Target::Final, MediaSlot::Second)
            .expect("remove should be a no-op");
        assert!(editor.draft().final_question.is_none());
    }

    #[test]
    fn test_set_final_question_keeps_media() {
        let mut state = editing_state();
        let mut editor = DraftEditor::open(&mut state).expect("draft should be open");
        let media = Media::from_mime("image/png", "data:image/png;base64,AAAA");
        editor
            .attach_media(Target::Final, MediaSlot::First, media.clone())
            .expect("attach should succeed");

        editor.set_final_question(&FinalQuestionForm {
            value: "750".to_string(),
            text: "¿Quién fue?".to_string(),
            answer: "Napoleón".to_string(),
            multiple_choice: String::new(),
        });

        let final_question = editor
            .draft()
            .final_question
            .as_ref()
            .expect("final question should exist");
        assert_eq!(final_question.value, 750);
        assert_eq!(final_question.media1, Some(media));
        assert!(final_question.multiple_choice.is_none());
        assert!(!final_question.used);
    }

    #[test]
    fn test_save_rejects_blank_category_names() {
        let mut state = editing_state();
        let live_before = state.current_round().clone();
        let store = MemoryStore::new();
        let presenter = RecordingPresenter::confirming();
        {
            let mut editor = DraftEditor::open(&mut state).expect("draft should be open");
            editor.add_category();
            editor
                .update_category(1, "   ")
                .expect("update should succeed");
        }

        assert_eq!(
            save_draft(&mut state, &store, &presenter).err(),
            Some(Error::BlankCategory)
        );
        // No partial commit: the live round is untouched and the draft
        // stays open for a fix.
        assert_eq!(state.current_round(), &live_before);
        assert!(state.draft().is_some());
    }

    #[test]
    fn test_save_commits_draft_and_persists() {
        let mut state = editing_state();
        let store = MemoryStore::new();
        let presenter = RecordingPresenter::confirming();
        {
            let mut editor = DraftEditor::open(&mut state).expect("draft should be open");
            editor
                .update_category(0, "Cine")
                .expect("update should succeed");
            editor.add_question(0).expect("add should succeed");
        }

        let outcome = save_draft(&mut state, &store, &presenter).expect("save should succeed");
        assert!(outcome.is_saved());
        assert!(state.draft().is_none());
        assert_eq!(state.current_round().categories, vec!["Cine"]);
        assert_eq!(state.current_round().questions[0].len(), 2);

        let persisted = store.load_rounds().expect("record should exist");
        assert_eq!(
            persisted
                .get(crate::board::round::RoundKey::Individual)
                .map(|round| round.categories.clone()),
            Some(vec!["Cine".to_string()])
        );
    }

    #[test]
    fn test_save_without_draft_is_rejected() {
        let mut state = GameState::new();
        let store = MemoryStore::new();
        let presenter = RecordingPresenter::confirming();

        assert_eq!(
            save_draft(&mut state, &store, &presenter).err(),
            Some(Error::NoDraft)
        );
    }

    #[test]
    fn test_declined_confirmations_leave_draft_unchanged() {
        let mut state = editing_state();
        let presenter = RecordingPresenter::scripted(&[false, false]);
        let mut editor = DraftEditor::open(&mut state).expect("draft should be open");
        editor.add_category();
        editor.add_question(0).expect("add should succeed");

        let removed_category = editor
            .remove_category(&presenter, 0)
            .expect("remove should resolve");
        let removed_question = editor
            .remove_question(&presenter, 0, 0)
            .expect("remove should resolve");

        assert!(!removed_category);
        assert!(!removed_question);
        assert_eq!(editor.draft().categories.len(), 2);
        assert_eq!(editor.draft().questions[0].len(), 2);
    }
}
