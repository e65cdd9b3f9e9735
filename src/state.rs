//! Central game state
//!
//! A single owned [`GameState`] instance is the source of truth for
//! round content, the player and team rosters, the active round, and
//! the transient editing draft. Presentation reads it; the scoring
//! engine, roster, and editor mutate it through `&mut` access. There is
//! exactly one logical writer: a multi-threaded embedder must wrap the
//! state in its own mutex or single-writer actor.

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    board::round::{Round, RoundKey, RoundsCollection},
    constants, roster,
    scorable::{Player, Scorable, ScorableMut, Team},
    scoring::DeductionPolicy,
    storage::RecordStore,
};

/// Which of the two mutually exclusive views is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// The playable board and scoreboard
    #[default]
    Game,
    /// The round content editor
    Edit,
}

/// Tunable policy for a board session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct BoardOptions {
    /// What happens to a score that a deduction would push below zero
    #[garde(skip)]
    pub deduction_policy: DeductionPolicy,
    /// Interval between revealed characters in milliseconds
    #[garde(range(min = 1, max = 1000))]
    pub typing_interval_ms: u64,
    /// Pause between fully revealed options in milliseconds
    #[garde(range(max = 10_000))]
    pub option_pause_ms: u64,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            deduction_policy: DeductionPolicy::default(),
            typing_interval_ms: constants::reveal::TYPING_INTERVAL_MS,
            option_pause_ms: constants::reveal::OPTION_PAUSE_MS,
        }
    }
}

/// The authoritative in-memory model of a board session
///
/// Constructed once at startup with two empty default rounds, populated
/// by [`GameState::hydrate`], and mutated for the rest of the session.
/// The active round slot is always populated; switching to an absent
/// slot recreates it with default content first.
#[derive(Debug)]
pub struct GameState {
    pub(crate) rounds: RoundsCollection,
    active_round: RoundKey,
    mode: Mode,
    pub(crate) players: Vec<Player>,
    pub(crate) teams: Vec<Team>,
    pub(crate) draft: Option<Round>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a fresh state with two empty default rounds
    pub fn new() -> Self {
        Self {
            rounds: RoundsCollection::default(),
            active_round: RoundKey::Individual,
            mode: Mode::Game,
            players: Vec::new(),
            teams: Vec::new(),
            draft: None,
        }
    }

    /// Populates the state from the persisted records
    ///
    /// Absent or malformed records are replaced by well-defined
    /// defaults and never surfaced as errors. Players that lost their
    /// color to an older record get one assigned from the palette.
    pub fn hydrate(&mut self, store: &impl RecordStore) {
        if let Some(rounds) = store.load_rounds() {
            self.rounds = rounds;
        } else {
            self.rounds = RoundsCollection::default();
        }
        self.rounds.ensure(RoundKey::Individual);
        self.rounds.ensure(RoundKey::Grupal);

        self.players = store.load_players();
        for player in &mut self.players {
            if player.color.trim().is_empty() {
                player.color = roster::random_color().to_owned();
            }
        }

        self.teams = store.load_teams();
    }

    /// The key of the currently active round
    pub fn active_round(&self) -> RoundKey {
        self.active_round
    }

    /// The content of the currently active round
    pub fn current_round(&self) -> &Round {
        self.rounds
            .get(self.active_round)
            .expect("active round slot is always populated")
    }

    pub(crate) fn current_round_mut(&mut self) -> &mut Round {
        self.rounds.ensure(self.active_round)
    }

    /// Switches the active round
    ///
    /// A no-op when the key already is the active one. Switching to a
    /// slot left absent by a missing record recreates it as an empty
    /// round with the canonical default name.
    pub fn set_active_round(&mut self, key: RoundKey) {
        if key == self.active_round {
            return;
        }
        self.active_round = key;
        self.rounds.ensure(key);
    }

    /// The currently active view
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches between the game and editor views
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Whether scoring currently targets teams instead of players
    pub fn is_team_mode(&self) -> bool {
        self.active_round == RoundKey::Grupal
    }

    /// The player roster
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The team roster
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// The scorables of the active round, players or teams
    pub fn scorables(&self) -> Vec<Scorable<'_>> {
        if self.is_team_mode() {
            self.teams.iter().map(Scorable::Team).collect()
        } else {
            self.players.iter().map(Scorable::Player).collect()
        }
    }

    /// A single scorable of the active round by roster index
    pub fn scorable(&self, index: usize) -> Option<Scorable<'_>> {
        if self.is_team_mode() {
            self.teams.get(index).map(Scorable::Team)
        } else {
            self.players.get(index).map(Scorable::Player)
        }
    }

    pub(crate) fn scorable_mut(&mut self, index: usize) -> Option<ScorableMut<'_>> {
        if self.is_team_mode() {
            self.teams.get_mut(index).map(ScorableMut::Team)
        } else {
            self.players.get_mut(index).map(ScorableMut::Player)
        }
    }

    /// Opens an editing session on a deep copy of the active round
    ///
    /// Starting a new session while one is open silently discards the
    /// previous unsaved draft (last start wins).
    pub fn start_editing(&mut self) {
        self.draft = Some(self.current_round().clone());
    }

    /// Discards the editing draft, leaving the live round untouched
    pub fn cancel_editing(&mut self) {
        self.draft = None;
    }

    /// The open editing draft, if any
    pub fn draft(&self) -> Option<&Round> {
        self.draft.as_ref()
    }

    /// Replaces the live round with the draft and clears it
    ///
    /// Returns `false` when no editing session was open. Validation and
    /// persistence are the editor's responsibility; this is only the
    /// copy-back step.
    pub(crate) fn commit_editing(&mut self) -> bool {
        match self.draft.take() {
            Some(draft) => {
                self.rounds.set(self.active_round, draft);
                true
            }
            None => false,
        }
    }
}
