//! Player and team roster management
//!
//! Players compete in the individual round; teams, built out of the
//! existing players, compete in the group round. Roster changes are
//! validated, applied to the in-memory state, and flushed to the
//! roster records. Team membership is checked at creation time only: a
//! player can be drafted into at most one team, but later renames or
//! removals leave the authored member lists untouched.

use itertools::Itertools;
use rustrict::CensorStr;
use thiserror::Error;

use crate::{
    board::media::Media,
    constants,
    presenter::{ConfirmPrompt, Notice, Presenter},
    scorable::{Player, Team},
    state::GameState,
    storage::RecordStore,
};

/// Errors that can occur while mutating the roster
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The name is empty after trimming whitespace
    #[error("name cannot be empty")]
    Empty,
    /// The name exceeds the maximum allowed length
    #[error("name is too long")]
    TooLong,
    /// The name contains inappropriate content
    #[error("name is inappropriate")]
    Sinful,
    /// No player exists at the given roster index
    #[error("no player at roster index {0}")]
    MissingPlayer(usize),
    /// No team exists at the given roster index
    #[error("no team at roster index {0}")]
    MissingTeam(usize),
    /// The roster must keep at least one player
    #[error("at least one player must remain")]
    LastPlayer,
    /// Teams cannot be formed before any players exist
    #[error("no players to form a team from")]
    NoPlayers,
    /// Every player already belongs to a team
    #[error("all players are already assigned to a team")]
    AllPlayersAssigned,
    /// A team needs at least one member
    #[error("select at least one member")]
    NoMembers,
    /// A selected member is already on another team
    #[error("player {0:?} is already on a team")]
    MemberTaken(String),
}

/// Picks a random color from the scoreboard palette
pub fn random_color() -> &'static str {
    let palette = constants::roster::COLOR_PALETTE;
    palette[fastrand::usize(..palette.len())]
}

/// Validates and normalizes a roster name
///
/// # Errors
///
/// * [`Error::TooLong`] - name exceeds the length cap
/// * [`Error::Empty`] - name is empty after trimming whitespace
/// * [`Error::Sinful`] - name contains inappropriate content
fn clean_name(name: &str) -> Result<String, Error> {
    if name.len() > constants::roster::MAX_NAME_LENGTH {
        return Err(Error::TooLong);
    }
    let name = rustrict::trim_whitespace(name);
    if name.is_empty() {
        return Err(Error::Empty);
    }
    if name.is_inappropriate() {
        return Err(Error::Sinful);
    }
    Ok(name.to_owned())
}

/// Replacement values for an existing player
///
/// The facilitator's correction path: every field is written as given,
/// including a directly edited score.
#[derive(Debug, Clone)]
pub struct PlayerEdit {
    /// New display name
    pub name: String,
    /// New accent color
    pub color: String,
    /// New score, replacing the current one
    pub score: i64,
    /// New avatar, or `None` to drop the current one
    pub avatar: Option<Media>,
}

/// Adds a player with a zero score and flushes the roster
///
/// A missing color is filled from the palette.
///
/// # Errors
///
/// Name validation errors; nothing is mutated on failure.
pub fn add_player<S: RecordStore, P: Presenter>(
    state: &mut GameState,
    store: &S,
    presenter: &P,
    name: &str,
    color: Option<&str>,
    avatar: Option<Media>,
) -> Result<(), Error> {
    let name = clean_name(name)?;
    let color = match color {
        Some(c) => c.to_owned(),
        None => random_color().to_owned(),
    };

    state.players.push(Player::new(name.clone(), color, avatar));

    if let Some(notice) = store.save_players(&state.players).notice() {
        presenter.notify(&notice);
    }
    presenter.notify(&Notice::PlayerAdded { name });
    Ok(())
}

/// Overwrites a player's fields and flushes the roster
///
/// # Errors
///
/// Name validation errors or [`Error::MissingPlayer`]; nothing is
/// mutated on failure.
pub fn edit_player<S: RecordStore, P: Presenter>(
    state: &mut GameState,
    store: &S,
    presenter: &P,
    index: usize,
    edit: PlayerEdit,
) -> Result<(), Error> {
    let name = clean_name(&edit.name)?;
    let player = state
        .players
        .get_mut(index)
        .ok_or(Error::MissingPlayer(index))?;

    player.name = name;
    player.color = edit.color;
    player.score = edit.score;
    player.avatar = edit.avatar;

    if let Some(notice) = store.save_players(&state.players).notice() {
        presenter.notify(&notice);
    }
    Ok(())
}

/// Removes a player after confirmation and flushes the roster
///
/// Returns `false` when the facilitator declined.
///
/// # Errors
///
/// [`Error::LastPlayer`] when the roster would become empty,
/// [`Error::MissingPlayer`] for an out-of-range index.
pub fn remove_player<S: RecordStore, P: Presenter>(
    state: &mut GameState,
    store: &S,
    presenter: &P,
    index: usize,
) -> Result<bool, Error> {
    if state.players.len() == 1 {
        return Err(Error::LastPlayer);
    }
    let name = state
        .players
        .get(index)
        .ok_or(Error::MissingPlayer(index))?
        .name
        .clone();

    if !presenter.confirm(ConfirmPrompt::RemovePlayer { name: &name }) {
        return Ok(false);
    }

    state.players.remove(index);
    if let Some(notice) = store.save_players(&state.players).notice() {
        presenter.notify(&notice);
    }
    Ok(true)
}

/// Players that are not yet on any team
pub fn available_players(state: &GameState) -> Vec<&Player> {
    state
        .players
        .iter()
        .filter(|player| {
            !state
                .teams
                .iter()
                .any(|team| team.members.contains(&player.name))
        })
        .collect_vec()
}

/// Creates a team from unassigned players and flushes the roster
///
/// Every member must be drawn from [`available_players`]; this is the
/// only point where the one-team-per-player rule is enforced.
///
/// # Errors
///
/// Name validation errors, [`Error::NoPlayers`],
/// [`Error::AllPlayersAssigned`], [`Error::NoMembers`], or
/// [`Error::MemberTaken`]; nothing is mutated on failure.
pub fn create_team<S: RecordStore, P: Presenter>(
    state: &mut GameState,
    store: &S,
    presenter: &P,
    name: &str,
    color: Option<&str>,
    members: Vec<String>,
) -> Result<(), Error> {
    if state.players.is_empty() {
        return Err(Error::NoPlayers);
    }
    let available = available_players(state)
        .iter()
        .map(|player| player.name.clone())
        .collect_vec();
    if available.is_empty() {
        return Err(Error::AllPlayersAssigned);
    }

    let name = clean_name(name)?;
    if members.is_empty() {
        return Err(Error::NoMembers);
    }
    if let Some(taken) = members.iter().find(|member| !available.contains(member)) {
        return Err(Error::MemberTaken(taken.clone()));
    }

    let color = match color {
        Some(c) => c.to_owned(),
        None => random_color().to_owned(),
    };
    state.teams.push(Team::new(name.clone(), color, members));

    if let Some(notice) = store.save_teams(&state.teams).notice() {
        presenter.notify(&notice);
    }
    presenter.notify(&Notice::TeamCreated { name });
    Ok(())
}

/// Dissolves a team after confirmation and flushes the roster
///
/// Member players remain on the player roster and become available for
/// a new team. Returns `false` when the facilitator declined.
///
/// # Errors
///
/// [`Error::MissingTeam`] for an out-of-range index.
pub fn remove_team<S: RecordStore, P: Presenter>(
    state: &mut GameState,
    store: &S,
    presenter: &P,
    index: usize,
) -> Result<bool, Error> {
    let name = state
        .teams
        .get(index)
        .ok_or(Error::MissingTeam(index))?
        .name
        .clone();

    if !presenter.confirm(ConfirmPrompt::RemoveTeam { name: &name }) {
        return Ok(false);
    }

    state.teams.remove(index);
    if let Some(notice) = store.save_teams(&state.teams).notice() {
        presenter.notify(&notice);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{presenter::test_support::RecordingPresenter, storage::MemoryStore};

    fn state_with_players(names: &[&str]) -> GameState {
        let mut state = GameState::new();
        for name in names {
            state.players.push(Player::new(*name, "#3498db", None));
        }
        state
    }

    #[test]
    fn test_add_player_persists_roster() {
        let mut state = GameState::new();
        let store = MemoryStore::new();
        let presenter = RecordingPresenter::confirming();

        add_player(&mut state, &store, &presenter, "  Ana ", None, None)
            .expect("add should succeed");

        assert_eq!(state.players()[0].name, "Ana");
        assert_eq!(state.players()[0].score, 0);
        assert!(!state.players()[0].color.is_empty());
        assert_eq!(store.load_players().len(), 1);
    }

    #[test]
    fn test_add_player_rejects_bad_names() {
        let mut state = GameState::new();
        let store = MemoryStore::new();
        let presenter = RecordingPresenter::confirming();

        assert_eq!(
            add_player(&mut state, &store, &presenter, "   ", None, None),
            Err(Error::Empty)
        );
        assert_eq!(
            add_player(
                &mut state,
                &store,
                &presenter,
                &"a".repeat(31),
                None,
                None
            ),
            Err(Error::TooLong)
        );
        assert!(state.players().is_empty());
    }

    #[test]
    fn test_edit_player_overwrites_fields() {
        let mut state = state_with_players(&["Ana"]);
        let store = MemoryStore::new();
        let presenter = RecordingPresenter::confirming();

        edit_player(
            &mut state,
            &store,
            &presenter,
            0,
            PlayerEdit {
                name: "Anita".to_string(),
                color: "#ff7675".to_string(),
                score: 350,
                avatar: None,
            },
        )
        .expect("edit should succeed");

        let player = &state.players()[0];
        assert_eq!(player.name, "Anita");
        assert_eq!(player.color, "#ff7675");
        assert_eq!(player.score, 350);
    }

    #[test]
    fn test_remove_last_player_is_rejected() {
        let mut state = state_with_players(&["Ana"]);
        let store = MemoryStore::new();
        let presenter = RecordingPresenter::confirming();

        assert_eq!(
            remove_player(&mut state, &store, &presenter, 0),
            Err(Error::LastPlayer)
        );
        assert_eq!(state.players().len(), 1);
    }

    #[test]
    fn test_remove_player_declined_keeps_roster() {
        let mut state = state_with_players(&["Ana", "Luis"]);
        let store = MemoryStore::new();
        let presenter = RecordingPresenter::scripted(&[false]);

        let removed =
            remove_player(&mut state, &store, &presenter, 0).expect("remove should resolve");
        assert!(!removed);
        assert_eq!(state.players().len(), 2);
    }

    #[test]
    fn test_available_players_excludes_assigned() {
        let mut state = state_with_players(&["Ana", "Luis", "Eva"]);
        state.teams.push(Team::new(
            "Equipo Azul",
            "#5865f2",
            vec!["Luis".to_string()],
        ));

        let available = available_players(&state)
            .iter()
            .map(|player| player.name.as_str())
            .collect_vec();
        assert_eq!(available, vec!["Ana", "Eva"]);
    }

    #[test]
    fn test_create_team_takes_only_available_players() {
        let mut state = state_with_players(&["Ana", "Luis"]);
        let store = MemoryStore::new();
        let presenter = RecordingPresenter::confirming();

        create_team(
            &mut state,
            &store,
            &presenter,
            "Equipo Azul",
            Some("#5865f2"),
            vec!["Ana".to_string()],
        )
        .expect("first team should succeed");

        let second = create_team(
            &mut state,
            &store,
            &presenter,
            "Equipo Rojo",
            None,
            vec!["Ana".to_string()],
        );
        assert_eq!(second, Err(Error::MemberTaken("Ana".to_string())));
        assert_eq!(state.teams().len(), 1);
    }

    #[test]
    fn test_create_team_requires_players_and_members() {
        let mut empty = GameState::new();
        let store = MemoryStore::new();
        let presenter = RecordingPresenter::confirming();

        assert_eq!(
            create_team(&mut empty, &store, &presenter, "Equipo", None, vec![]),
            Err(Error::NoPlayers)
        );

        let mut state = state_with_players(&["Ana"]);
        assert_eq!(
            create_team(&mut state, &store, &presenter, "Equipo", None, vec![]),
            Err(Error::NoMembers)
        );

        state.teams.push(Team::new(
            "Equipo Azul",
            "#5865f2",
            vec!["Ana".to_string()],
        ));
        assert_eq!(
            create_team(
                &mut state,
                &store,
                &presenter,
                "Equipo Rojo",
                None,
                vec!["Ana".to_string()]
            ),
            Err(Error::AllPlayersAssigned)
        );
    }

    #[test]
    fn test_remove_team_frees_members() {
        let mut state = state_with_players(&["Ana"]);
        state.teams.push(Team::new(
            "Equipo Azul",
            "#5865f2",
            vec!["Ana".to_string()],
        ));
        let store = MemoryStore::new();
        let presenter = RecordingPresenter::confirming();

        let removed = remove_team(&mut state, &store, &presenter, 0).expect("remove should resolve");
        assert!(removed);
        assert!(state.teams().is_empty());
        assert_eq!(available_players(&state).len(), 1);
    }
}
