//! Point-valued questions and their board addressing
//!
//! A question carries its point value, prompt and answer text, an
//! optional slash-separated multiple-choice list, two optional media
//! attachments, and the used flags maintained by the scoring engine.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::constants;

use super::media::{Media, MediaSlot};

/// A single cell of the board, or the final question of a round
///
/// `used` is monotonic: once a question has been played it stays used
/// until a round-wide reset. `used_with_options` records whether the
/// multiple-choice list had been revealed when the question was scored.
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Question {
    /// Point value awarded for answering this question
    pub value: u64,
    /// The prompt shown to players
    #[serde(default)]
    pub text: String,
    /// The answer revealed by the facilitator
    #[serde(default)]
    pub answer: String,
    /// Slash-separated multiple-choice option list, if any
    #[serde(default)]
    pub multiple_choice: Option<String>,
    /// First media attachment slot
    #[serde(default)]
    pub media1: Option<Media>,
    /// Second media attachment slot
    #[serde(default)]
    pub media2: Option<Media>,
    /// Whether this question has already been played
    #[serde(default)]
    pub used: bool,
    /// Whether the option list had been revealed when it was scored
    #[serde(default)]
    pub used_with_options: bool,
}

impl Question {
    /// Creates an empty question with the given point value
    pub fn placeholder(value: u64) -> Self {
        Self {
            value,
            text: String::new(),
            answer: String::new(),
            multiple_choice: None,
            media1: None,
            media2: None,
            used: false,
            used_with_options: false,
        }
    }

    /// Creates an empty final question with the default final value
    pub fn final_placeholder() -> Self {
        Self::placeholder(constants::question::FINAL_DEFAULT_VALUE)
    }

    /// Whether this question carries a non-blank multiple-choice list
    pub fn has_options(&self) -> bool {
        self.multiple_choice
            .as_deref()
            .is_some_and(|options| !options.trim().is_empty())
    }

    /// Splits the multiple-choice list into trimmed options
    ///
    /// Returns an empty vector when no list is present. Blank entries
    /// produced by stray separators are kept trimmed but not removed,
    /// so authored numbering stays aligned with what is shown.
    pub fn options(&self) -> Vec<String> {
        match self.multiple_choice.as_deref() {
            Some(options) if !options.trim().is_empty() => options
                .split(constants::question::OPTION_SEPARATOR)
                .map(|option| option.trim().to_owned())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the media attachment in the given slot, if any
    pub fn media(&self, slot: MediaSlot) -> Option<&Media> {
        match slot {
            MediaSlot::First => self.media1.as_ref(),
            MediaSlot::Second => self.media2.as_ref(),
        }
    }

    /// Replaces the media attachment in the given slot
    pub fn set_media(&mut self, slot: MediaSlot, media: Option<Media>) {
        match slot {
            MediaSlot::First => self.media1 = media,
            MediaSlot::Second => self.media2 = media,
        }
    }
}

/// Addresses a question on the board
///
/// The board grid is addressed by category column and row; the final
/// question of a round is a separate tagged target so both share one
/// scoring pipeline. The legacy presentation layer encodes the final
/// question as column `-1`, which [`Target::from_board_coords`] maps
/// onto [`Target::Final`].
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A cell of the board grid
    Cell {
        /// Index of the category column
        category: usize,
        /// Row within the column
        row: usize,
    },
    /// The round's final question
    Final,
}

impl Target {
    /// Builds a target from legacy board coordinates
    ///
    /// A negative column is the sentinel for the final question; any
    /// other column addresses the grid.
    pub fn from_board_coords(column: isize, row: usize) -> Self {
        if column < 0 {
            Self::Final
        } else {
            Self::Cell {
                category: column as usize,
                row,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_unused() {
        let question = Question::placeholder(100);
        assert_eq!(question.value, 100);
        assert!(!question.used);
        assert!(!question.used_with_options);
        assert!(question.multiple_choice.is_none());
    }

    #[test]
    fn test_has_options_blank_list() {
        let mut question = Question::placeholder(100);
        assert!(!question.has_options());

        question.multiple_choice = Some("   ".to_string());
        assert!(!question.has_options());

        question.multiple_choice = Some("a) uno / b) dos".to_string());
        assert!(question.has_options());
    }

    #[test]
    fn test_options_split_and_trim() {
        let mut question = Question::placeholder(100);
        question.multiple_choice = Some(" a) Uno / b) Dos /c) Tres ".to_string());
        assert_eq!(question.options(), vec!["a) Uno", "b) Dos", "c) Tres"]);
    }

    #[test]
    fn test_options_empty_when_absent() {
        let question = Question::placeholder(100);
        assert!(question.options().is_empty());
    }

    #[test]
    fn test_target_from_board_coords() {
        assert_eq!(Target::from_board_coords(-1, 0), Target::Final);
        assert_eq!(
            Target::from_board_coords(2, 3),
            Target::Cell {
                category: 2,
                row: 3
            }
        );
    }

    #[test]
    fn test_media_slots_independent() {
        let mut question = Question::placeholder(100);
        let media = Media::from_mime("image/png", "data:image/png;base64,AAAA");
        question.set_media(MediaSlot::First, Some(media.clone()));

        assert_eq!(question.media(MediaSlot::First), Some(&media));
        assert!(question.media(MediaSlot::Second).is_none());

        question.set_media(MediaSlot::First, None);
        assert!(question.media(MediaSlot::First).is_none());
    }

    #[test]
    fn test_question_deserializes_without_flags() {
        let question: Question =
            serde_json::from_str(r#"{"value": 200, "text": "q", "answer": "a"}"#)
                .expect("question without flags should deserialize");
        assert!(!question.used);
        assert!(!question.used_with_options);
    }
}
