//! Point awarding and deduction
//!
//! The [`Scorekeeper`] is the only component that mutates scores and
//! question used flags. Awards run through a single pipeline for grid
//! cells and the final question, compute the multiple-choice half-value
//! penalty, and flush both affected records after the in-memory
//! mutation is complete, so a slow or failed save can never make the
//! rendered board stale relative to the model.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    board::question::Target,
    presenter::{ConfirmPrompt, Effect, Notice, Presenter},
    state::GameState,
    storage::{RecordStore, SaveOutcome},
};

/// What happens to a score that a deduction would push below zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeductionPolicy {
    /// Scores may go negative without bound
    #[default]
    Unbounded,
    /// Scores are clamped at zero after each deduction
    FloorAtZero,
}

/// Errors produced by the scoring engine
///
/// All of these are recoverable: the state is untouched when one is
/// returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringError {
    /// The target question was already played; awarding again would
    /// double-count
    #[error("question has already been played")]
    QuestionUsed,
    /// The target does not address a question on the board
    #[error("no question at the requested board position")]
    MissingQuestion,
    /// No player or team exists at the given roster index
    #[error("no scorable at roster index {0}")]
    MissingScorable(usize),
}

/// A record of a completed award
///
/// Carries the points actually applied (after any penalty) and the
/// outcome of both persistence flushes so the caller can surface
/// degradation.
#[derive(Debug)]
pub struct AwardReceipt {
    /// Points added to the target's score
    pub points_awarded: u64,
    /// The target's score after the award
    pub new_score: i64,
    /// Outcome of flushing the affected roster record
    pub roster_save: SaveOutcome,
    /// Outcome of flushing the round content record
    pub round_save: SaveOutcome,
}

/// The scoring engine
#[derive(Debug, Default, Clone, Copy)]
pub struct Scorekeeper {
    policy: DeductionPolicy,
}

impl Scorekeeper {
    /// Creates a scorekeeper with the given deduction policy
    pub fn new(policy: DeductionPolicy) -> Self {
        Self { policy }
    }

    /// Awards a question's points to a player or team
    ///
    /// The awarded amount is `base_value`, halved and rounded up when
    /// the multiple-choice options had been revealed. The target
    /// question is marked used with the options flag recorded. Both the
    /// affected roster record and the round record are flushed after
    /// the mutation; a win effect plays and the question dialog closes.
    ///
    /// # Errors
    ///
    /// [`ScoringError::QuestionUsed`] when the target was already
    /// played (nothing is mutated), [`ScoringError::MissingQuestion`]
    /// or [`ScoringError::MissingScorable`] when the target or roster
    /// index does not exist.
    pub fn award<S: RecordStore, P: Presenter>(
        &self,
        state: &mut GameState,
        store: &S,
        presenter: &P,
        scorable_index: usize,
        base_value: u64,
        target: Target,
        used_options: bool,
    ) -> Result<AwardReceipt, ScoringError> {
        if state.scorable(scorable_index).is_none() {
            return Err(ScoringError::MissingScorable(scorable_index));
        }
        match (target, state.current_round().question_at(target)) {
            // The final question slot may be blank; marking it used
            // materializes it, matching the historical behavior.
            (Target::Final, None) => {}
            (_, None) => return Err(ScoringError::MissingQuestion),
            (_, Some(question)) if question.used => return Err(ScoringError::QuestionUsed),
            _ => {}
        }

        let points = if used_options {
            base_value.div_ceil(2)
        } else {
            base_value
        };

        let mut scorable = state
            .scorable_mut(scorable_index)
            .ok_or(ScoringError::MissingScorable(scorable_index))?;
        scorable.add_points(points as i64);
        let new_score = scorable.score();
        debug!(
            "awarded {points} points to {} (score now {new_score})",
            scorable.name()
        );

        let round = state.current_round_mut();
        let question = match target {
            Target::Final => round.final_question_mut_or_default(),
            cell => round
                .question_at_mut(cell)
                .ok_or(ScoringError::MissingQuestion)?,
        };
        question.used = true;
        question.used_with_options = used_options;

        let roster_save = self.flush_roster(state, store);
        let round_save = store.save_rounds(&state.rounds);
        for outcome in [&roster_save, &round_save] {
            if let Some(notice) = outcome.notice() {
                presenter.notify(&notice);
            }
        }

        presenter.effect(Effect::Win);
        presenter.close_question();

        Ok(AwardReceipt {
            points_awarded: points,
            new_score,
            roster_save,
            round_save,
        })
    }

    /// Subtracts points from a player or team after confirmation
    ///
    /// Deduction is independent of question state: no used flag is
    /// touched and only the affected roster record is flushed. Returns
    /// `false` when the facilitator declined the confirmation.
    ///
    /// # Errors
    ///
    /// [`ScoringError::MissingScorable`] when the roster index does not
    /// exist.
    pub fn deduct<S: RecordStore, P: Presenter>(
        &self,
        state: &mut GameState,
        store: &S,
        presenter: &P,
        scorable_index: usize,
        points: u64,
    ) -> Result<bool, ScoringError> {
        let name = state
            .scorable(scorable_index)
            .ok_or(ScoringError::MissingScorable(scorable_index))?
            .name()
            .to_owned();

        if !presenter.confirm(ConfirmPrompt::DeductPoints {
            name: &name,
            points,
        }) {
            return Ok(false);
        }

        let mut scorable = state
            .scorable_mut(scorable_index)
            .ok_or(ScoringError::MissingScorable(scorable_index))?;
        scorable.add_points(-(points as i64));
        if self.policy == DeductionPolicy::FloorAtZero && scorable.score() < 0 {
            scorable.set_score(0);
        }

        let roster_save = self.flush_roster(state, store);
        if let Some(notice) = roster_save.notice() {
            presenter.notify(&notice);
        }

        presenter.effect(Effect::Deduction);
        presenter.notify(&Notice::PointsDeducted { name, points });
        Ok(true)
    }

    /// Resets every player's score to zero after confirmation
    ///
    /// Scope is individual players only; team scores are untouched.
    /// Returns `false` when the facilitator declined.
    pub fn reset_scores<S: RecordStore, P: Presenter>(
        &self,
        state: &mut GameState,
        store: &S,
        presenter: &P,
    ) -> bool {
        if !presenter.confirm(ConfirmPrompt::ResetScores) {
            return false;
        }

        for player in &mut state.players {
            player.score = 0;
        }

        if let Some(notice) = store.save_players(&state.players).notice() {
            presenter.notify(&notice);
        }
        presenter.notify(&Notice::ScoresReset);
        true
    }

    /// Makes every question of the active round available again
    ///
    /// Clears the used flag on all cells and the final question of the
    /// active round only; scores and the other round are untouched.
    /// Returns `false` when the facilitator declined.
    pub fn reset_questions<S: RecordStore, P: Presenter>(
        &self,
        state: &mut GameState,
        store: &S,
        presenter: &P,
    ) -> bool {
        if !presenter.confirm(ConfirmPrompt::ResetQuestions) {
            return false;
        }

        state.current_round_mut().reset_questions();

        if let Some(notice) = store.save_rounds(&state.rounds).notice() {
            presenter.notify(&notice);
        }
        presenter.notify(&Notice::QuestionsReset);
        true
    }

    fn flush_roster<S: RecordStore>(&self, state: &GameState, store: &S) -> SaveOutcome {
        if state.is_team_mode() {
            store.save_teams(&state.teams)
        } else {
            store.save_players(&state.players)
        }
    }
}
