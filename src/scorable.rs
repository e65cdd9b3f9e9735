//! Players, teams, and the shared scorable view
//!
//! Points are awarded either to individual players or to teams
//! depending on the active round. Both entity types share name, score,
//! and color; only teams carry a member list. Downstream code works
//! against the tagged [`Scorable`] view instead of duck-typing on the
//! presence of a member list.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::board::media::Media;

/// An individual player on the scoreboard
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Player {
    /// Display name, unique in practice but not enforced
    pub name: String,
    /// Current score; deductions may drive it negative
    #[serde(default)]
    pub score: i64,
    /// Scoreboard accent color, assigned from the palette when absent
    #[serde(default)]
    pub color: String,
    /// Optional avatar image
    #[serde(default)]
    pub avatar: Option<Media>,
}

impl Player {
    /// Creates a player with a zero score
    pub fn new(name: impl Into<String>, color: impl Into<String>, avatar: Option<Media>) -> Self {
        Self {
            name: name.into(),
            score: 0,
            color: color.into(),
            avatar,
        }
    }
}

/// A team competing in the group round
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Team {
    /// Display name of the team
    pub name: String,
    /// Current score; deductions may drive it negative
    #[serde(default)]
    pub score: i64,
    /// Scoreboard accent color
    #[serde(default)]
    pub color: String,
    /// Names of the member players
    ///
    /// A player belongs to at most one team; this is enforced when the
    /// team is created and not re-validated afterwards, so renaming or
    /// removing a player leaves the member list as authored.
    #[serde(default)]
    pub members: Vec<String>,
}

impl Team {
    /// Creates a team with a zero score
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        members: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            score: 0,
            color: color.into(),
            members,
        }
    }
}

/// A read-only view over either a player or a team
#[derive(Debug, Clone, Copy)]
pub enum Scorable<'a> {
    /// An individual player
    Player(&'a Player),
    /// A team
    Team(&'a Team),
}

impl Scorable<'_> {
    /// Display name of the underlying entity
    pub fn name(&self) -> &str {
        match self {
            Self::Player(player) => &player.name,
            Self::Team(team) => &team.name,
        }
    }

    /// Current score of the underlying entity
    pub fn score(&self) -> i64 {
        match self {
            Self::Player(player) => player.score,
            Self::Team(team) => team.score,
        }
    }

    /// Scoreboard accent color of the underlying entity
    pub fn color(&self) -> &str {
        match self {
            Self::Player(player) => &player.color,
            Self::Team(team) => &team.color,
        }
    }

    /// Member names, present only for teams
    pub fn members(&self) -> Option<&[String]> {
        match self {
            Self::Player(_) => None,
            Self::Team(team) => Some(&team.members),
        }
    }
}

/// A mutable view over either a player or a team
///
/// The scoring engine is the only caller; it funnels every score
/// mutation through [`ScorableMut::add_points`] and
/// [`ScorableMut::set_score`] so both entity types stay consistent.
#[derive(Debug)]
pub enum ScorableMut<'a> {
    /// An individual player
    Player(&'a mut Player),
    /// A team
    Team(&'a mut Team),
}

impl ScorableMut<'_> {
    /// Display name of the underlying entity
    pub fn name(&self) -> &str {
        match self {
            Self::Player(player) => &player.name,
            Self::Team(team) => &team.name,
        }
    }

    /// Current score of the underlying entity
    pub fn score(&self) -> i64 {
        match self {
            Self::Player(player) => player.score,
            Self::Team(team) => team.score,
        }
    }

    /// Adds a signed point delta to the score
    pub fn add_points(&mut self, delta: i64) {
        match self {
            Self::Player(player) => player.score += delta,
            Self::Team(team) => team.score += delta,
        }
    }

    /// Overwrites the score
    pub fn set_score(&mut self, score: i64) {
        match self {
            Self::Player(player) => player.score = score,
            Self::Team(team) => team.score = score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scorable_accessors_dispatch() {
        let player = Player::new("Ana", "#3498db", None);
        let team = Team::new("Los Vengadores", "#5865f2", vec!["Ana".to_string()]);

        let player_view = Scorable::Player(&player);
        let team_view = Scorable::Team(&team);

        assert_eq!(player_view.name(), "Ana");
        assert_eq!(player_view.score(), 0);
        assert!(player_view.members().is_none());

        assert_eq!(team_view.name(), "Los Vengadores");
        assert_eq!(team_view.members(), Some(&["Ana".to_string()][..]));
    }

    #[test]
    fn test_scorable_mut_add_points() {
        let mut player = Player::new("Ana", "#3498db", None);
        let mut view = ScorableMut::Player(&mut player);
        view.add_points(200);
        view.add_points(-50);
        assert_eq!(player.score, 150);
    }

    #[test]
    fn test_player_deserializes_without_color() {
        let player: Player = serde_json::from_str(r#"{"name": "Ana", "score": 100}"#)
            .expect("player without color should deserialize");
        assert!(player.color.is_empty());
        assert!(player.avatar.is_none());
    }
}
