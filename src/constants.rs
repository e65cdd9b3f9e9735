//! Configuration constants for the trivia board system
//!
//! This module contains all the configuration limits and defaults
//! used throughout the board, editor, scoring, and storage components
//! to ensure data integrity and provide consistent boundaries.

/// Round configuration constants
pub mod round {
    /// Canonical display name for the individual round
    pub const INDIVIDUAL_NAME: &str = "Ronda Individual";
    /// Canonical display name for the team round
    pub const GRUPAL_NAME: &str = "Ronda Grupal";
    /// Maximum length of a round name in characters
    pub const MAX_NAME_LENGTH: usize = 100;
}

/// Question configuration constants
pub mod question {
    /// Default point value for a freshly created question
    pub const DEFAULT_VALUE: u64 = 100;
    /// Point increment applied when appending a question after existing ones
    pub const VALUE_STEP: u64 = 100;
    /// Default point value for a freshly created final question
    pub const FINAL_DEFAULT_VALUE: u64 = 500;
    /// Placeholder name for a freshly created category
    pub const NEW_CATEGORY_NAME: &str = "Nueva Categoría";
    /// Separator between entries of a multiple-choice option list
    pub const OPTION_SEPARATOR: char = '/';
}

/// Roster configuration constants
pub mod roster {
    /// Maximum length of a player or team name in characters
    pub const MAX_NAME_LENGTH: usize = 30;
    /// Default color assigned to a new player when none is picked
    pub const DEFAULT_PLAYER_COLOR: &str = "#3498db";
    /// Palette used when assigning a random color to a colorless entry
    pub const COLOR_PALETTE: [&str; 8] = [
        "#ff7675", "#74b9ff", "#55efc4", "#ffeaa7", "#a29bfe", "#fab1a0", "#81ecec", "#fd79a8",
    ];
}

/// Reveal timing constants
pub mod reveal {
    /// Interval between revealed characters in milliseconds
    pub const TYPING_INTERVAL_MS: u64 = 30;
    /// Pause between fully revealed options in milliseconds
    pub const OPTION_PAUSE_MS: u64 = 2000;
}

/// Storage record identifiers
pub mod storage {
    /// Fixed identifier of the round content record
    pub const ROUNDS_RECORD_ID: &str = "currentRoundsData";
    /// Fixed identifier of the player roster record
    pub const PLAYERS_RECORD_ID: &str = "jeopardyPlayers";
    /// Fixed identifier of the team roster record
    pub const TEAMS_RECORD_ID: &str = "jeopardyTeams";
}
