//! Presentation collaborator seam
//!
//! The core never renders anything itself. Confirmation dialogs,
//! non-blocking notifications, celebratory effects, and dismissing the
//! question dialog are all delegated to an embedder-supplied
//! [`Presenter`]. The trait abstracts the actual UI toolkit the same
//! way the communication layer is abstracted behind a trait in the
//! session layer of comparable game engines.

/// A confirmation request shown before a destructive action
///
/// The core proceeds only when the presenter reports the facilitator
/// confirmed; a declined prompt leaves all state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPrompt<'a> {
    /// Subtract points from a player or team
    DeductPoints {
        /// Name of the affected player or team
        name: &'a str,
        /// Points about to be subtracted
        points: u64,
    },
    /// Zero every player's score
    ResetScores,
    /// Make every question of the active round available again
    ResetQuestions,
    /// Remove a category and its whole question column from the draft
    RemoveCategory {
        /// Name of the category about to be removed
        name: &'a str,
    },
    /// Remove a single question from the draft
    RemoveQuestion,
    /// Remove a player from the roster
    RemovePlayer {
        /// Name of the player about to be removed
        name: &'a str,
    },
    /// Dissolve a team (member players remain)
    RemoveTeam {
        /// Name of the team about to be dissolved
        name: &'a str,
    },
}

/// A non-blocking notification for the facilitator
///
/// Notices never interrupt play; the presenter decides how (and
/// whether) to surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Points were subtracted from a player or team
    PointsDeducted {
        /// Name of the affected player or team
        name: String,
        /// Points subtracted
        points: u64,
    },
    /// Every player score was reset to zero
    ScoresReset,
    /// Every question of the active round is available again
    QuestionsReset,
    /// The edited round was committed and persisted
    RoundSaved {
        /// Display name of the saved round
        round_name: String,
    },
    /// The final question was removed from the draft
    FinalQuestionCleared,
    /// A player joined the roster
    PlayerAdded {
        /// Name of the new player
        name: String,
    },
    /// A team was created for the group round
    TeamCreated {
        /// Name of the new team
        name: String,
    },
    /// A save succeeded only after dropping heavy media attachments
    SaveDegraded {
        /// Human-readable description of what was dropped
        detail: String,
    },
    /// A save failed entirely; in-memory state is still intact
    SaveFailed {
        /// Human-readable description of the failure
        detail: String,
    },
}

/// A fire-and-forget audiovisual effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Celebration played when points are awarded
    Win,
    /// Commiseration played when points are deducted
    Deduction,
}

/// The presentation collaborator consumed by the core
///
/// Implementations wrap whatever dialog/effect machinery the embedder
/// uses; the core only relies on the confirmed/declined outcome of
/// [`Presenter::confirm`] and treats everything else as one-way.
pub trait Presenter {
    /// Asks the facilitator to confirm a destructive action
    fn confirm(&self, prompt: ConfirmPrompt<'_>) -> bool;

    /// Surfaces a non-blocking notification
    fn notify(&self, notice: &Notice);

    /// Plays a fire-and-forget effect
    fn effect(&self, effect: Effect);

    /// Dismisses the question dialog after an award
    fn close_question(&self);
}

/// A presenter that confirms everything and renders nothing
///
/// Useful for tests and headless embedding.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPresenter;

impl Presenter for SilentPresenter {
    fn confirm(&self, _prompt: ConfirmPrompt<'_>) -> bool {
        true
    }

    fn notify(&self, _notice: &Notice) {}

    fn effect(&self, _effect: Effect) {}

    fn close_question(&self) {}
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_presenter_confirms() {
        let presenter = SilentPresenter;
        assert!(presenter.confirm(ConfirmPrompt::ResetScores));
        assert!(presenter.confirm(ConfirmPrompt::RemoveQuestion));
    }
}
