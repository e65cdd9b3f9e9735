//! # Tablero Game Library
//!
//! This library provides the core game logic for a facilitator-run
//! trivia board: a grid of categories and point-valued questions over
//! two fixed rounds (individual players and teams), the point
//! award/deduction protocol with its multiple-choice penalty, a
//! draft-based round content editor, scheduled text reveals for the
//! question dialog, and best-effort persistence of game content and
//! rosters across sessions.
//!
//! Rendering, dialogs, and audiovisual effects are out of scope; they
//! are reached through the [`presenter::Presenter`] seam, and the
//! embedder drives reveal timing through scheduled alarms.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod constants;

pub mod board;
pub mod dialog;
pub mod editor;
pub mod presenter;
pub mod reveal;
pub mod roster;
pub mod scorable;
pub mod scoring;
pub mod state;
pub mod storage;

pub use board::{
    media::{Media, MediaKind, MediaSlot},
    question::{Question, Target},
    round::{Round, RoundKey, RoundsCollection},
};
pub use dialog::QuestionDialog;
pub use presenter::{Presenter, SilentPresenter};
pub use scorable::{Player, Scorable, Team};
pub use scoring::{DeductionPolicy, Scorekeeper};
pub use state::{BoardOptions, GameState, Mode};
pub use storage::{FileStore, MemoryStore, RecordStore, SaveOutcome};
