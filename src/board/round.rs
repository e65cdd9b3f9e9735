//! Rounds and the fixed two-round collection
//!
//! A round is a set of category columns with their question cells plus
//! an optional final question. The board always plays over exactly two
//! rounds, one scored per player and one per team, held in a closed
//! collection keyed by [`RoundKey`].

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::constants;

use super::question::{Question, Target};

/// Identifies one of the two fixed rounds of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum RoundKey {
    /// The round scored against individual players
    Individual,
    /// The round scored against teams
    Grupal,
}

impl RoundKey {
    /// The canonical display name of a freshly created round for this key
    pub fn default_round_name(self) -> &'static str {
        match self {
            Self::Individual => constants::round::INDIVIDUAL_NAME,
            Self::Grupal => constants::round::GRUPAL_NAME,
        }
    }
}

/// One round of the board
///
/// `questions[i]` is the column of cells under `categories[i]`; the
/// editor keeps both sequences the same length. The editor also
/// enforces that a committed round has at least one category and at
/// least one question per category; the type itself allows emptiness
/// so fresh and loaded rounds can start blank.
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Round {
    /// Display name of the round
    #[serde(default)]
    pub name: String,
    /// Category headers, one per column
    #[serde(default)]
    pub categories: Vec<String>,
    /// Question columns, parallel to `categories`
    #[serde(default)]
    pub questions: Vec<Vec<Question>>,
    /// The round's final question, if one has been authored
    #[serde(default)]
    pub final_question: Option<Question>,
}

impl Round {
    /// Creates an empty round with the given display name
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            categories: Vec::new(),
            questions: Vec::new(),
            final_question: None,
        }
    }

    /// Creates the empty default round for a round key
    pub fn default_for(key: RoundKey) -> Self {
        Self::empty(key.default_round_name())
    }

    /// Whether the round has no authored content at all
    pub fn is_blank(&self) -> bool {
        self.categories.is_empty() && self.questions.is_empty() && self.final_question.is_none()
    }

    /// Looks up the question addressed by a target
    pub fn question_at(&self, target: Target) -> Option<&Question> {
        match target {
            Target::Cell { category, row } => self.questions.get(category)?.get(row),
            Target::Final => self.final_question.as_ref(),
        }
    }

    /// Looks up the question addressed by a target for mutation
    pub fn question_at_mut(&mut self, target: Target) -> Option<&mut Question> {
        match target {
            Target::Cell { category, row } => self.questions.get_mut(category)?.get_mut(row),
            Target::Final => self.final_question.as_mut(),
        }
    }

    /// Returns the final question, creating a blank one if absent
    pub fn final_question_mut_or_default(&mut self) -> &mut Question {
        self.final_question
            .get_or_insert_with(Question::final_placeholder)
    }

    /// Makes every question of this round available again
    ///
    /// Clears the `used` flag on all cells and on the final question.
    /// Scores are not touched.
    pub fn reset_questions(&mut self) {
        for column in &mut self.questions {
            for question in column {
                question.used = false;
            }
        }
        if let Some(final_question) = &mut self.final_question {
            final_question.used = false;
        }
    }

    /// Drops every media attachment in the round
    ///
    /// Used by the storage degradation path when a record does not fit
    /// the backing tier. Returns the number of attachments removed.
    pub fn strip_media(&mut self) -> usize {
        let mut stripped = 0;

        let mut strip = |question: &mut Question| {
            stripped += usize::from(question.media1.take().is_some());
            stripped += usize::from(question.media2.take().is_some());
        };

        for column in &mut self.questions {
            for question in column {
                strip(question);
            }
        }
        if let Some(final_question) = &mut self.final_question {
            strip(final_question);
        }

        stripped
    }
}

/// Serialization helper matching the persisted round content record
#[skip_serializing_none]
#[derive(Serialize, Deserialize)]
struct RoundsRecord {
    /// Round content under the `individual` key, if present
    individual: Option<Round>,
    /// Round content under the `grupal` key, if present
    grupal: Option<Round>,
}

/// The closed two-round collection of a game
///
/// Keys are fixed to exactly [`RoundKey::Individual`] and
/// [`RoundKey::Grupal`]; a slot left absent by a missing or malformed
/// record is lazily recreated with empty default content on first
/// activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RoundsRecord", into = "RoundsRecord")]
pub struct RoundsCollection {
    rounds: EnumMap<RoundKey, Option<Round>>,
}

impl Default for RoundsCollection {
    /// Creates a collection with both default empty rounds present
    fn default() -> Self {
        Self {
            rounds: EnumMap::from_fn(|key| Some(Round::default_for(key))),
        }
    }
}

impl From<RoundsRecord> for RoundsCollection {
    /// Reconstructs the collection from a persisted record
    ///
    /// Rounds that lost their name to a malformed record get the
    /// canonical default name for their slot back.
    fn from(record: RoundsRecord) -> Self {
        let mut rounds = EnumMap::from_fn(|_| None);
        rounds[RoundKey::Individual] = record.individual;
        rounds[RoundKey::Grupal] = record.grupal;

        for (key, slot) in &mut rounds {
            if let Some(round) = slot
                && round.name.trim().is_empty()
            {
                round.name = key.default_round_name().to_owned();
            }
        }

        Self { rounds }
    }
}

impl From<RoundsCollection> for RoundsRecord {
    fn from(collection: RoundsCollection) -> Self {
        Self {
            individual: collection.rounds[RoundKey::Individual].clone(),
            grupal: collection.rounds[RoundKey::Grupal].clone(),
        }
    }
}

impl RoundsCollection {
    /// Returns the round in the given slot, if present
    pub fn get(&self, key: RoundKey) -> Option<&Round> {
        self.rounds[key].as_ref()
    }

    /// Returns the round in the given slot for mutation, if present
    pub fn get_mut(&mut self, key: RoundKey) -> Option<&mut Round> {
        self.rounds[key].as_mut()
    }

    /// Returns the round in the given slot, recreating it when absent
    ///
    /// An absent slot is filled with the empty default round carrying
    /// the canonical name for the key.
    pub fn ensure(&mut self, key: RoundKey) -> &mut Round {
        self.rounds[key].get_or_insert_with(|| Round::default_for(key))
    }

    /// Replaces the round in the given slot
    pub fn set(&mut self, key: RoundKey, round: Round) {
        self.rounds[key] = Some(round);
    }

    /// Removes the round from the given slot
    ///
    /// Only useful for modeling a missing persisted record; activation
    /// recreates the slot on demand.
    pub(crate) fn clear(&mut self, key: RoundKey) {
        self.rounds[key] = None;
    }

    /// Drops every media attachment across both rounds
    ///
    /// Returns the number of attachments removed.
    pub fn strip_media(&mut self) -> usize {
        self.rounds
            .values_mut()
            .flatten()
            .map(Round::strip_media)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::media::Media;

    fn round_with_one_cell() -> Round {
        let mut round = Round::default_for(RoundKey::Individual);
        round.categories.push("Historia".to_string());
        round.questions.push(vec![Question::placeholder(100)]);
        round
    }

    #[test]
    fn test_default_round_names() {
        assert_eq!(
            Round::default_for(RoundKey::Individual).name,
            "Ronda Individual"
        );
        assert_eq!(Round::default_for(RoundKey::Grupal).name, "Ronda Grupal");
    }

    #[test]
    fn test_question_at_targets() {
        let mut round = round_with_one_cell();
        round.final_question = Some(Question::final_placeholder());

        assert!(
            round
                .question_at(Target::Cell {
                    category: 0,
                    row: 0
                })
                .is_some()
        );
        assert!(
            round
                .question_at(Target::Cell {
                    category: 1,
                    row: 0
                })
                .is_none()
        );
        assert_eq!(
            round.question_at(Target::Final).map(|q| q.value),
            Some(500)
        );
    }

    #[test]
    fn test_reset_questions_clears_used_only() {
        let mut round = round_with_one_cell();
        round.questions[0][0].used = true;
        round.questions[0][0].used_with_options = true;
        round.final_question = Some(Question {
            used: true,
            ..Question::final_placeholder()
        });

        round.reset_questions();

        assert!(!round.questions[0][0].used);
        assert!(!round.final_question.as_ref().is_some_and(|q| q.used));
    }

    #[test]
    fn test_strip_media_counts_attachments() {
        let mut round = round_with_one_cell();
        let media = Media::from_mime("image/png", "data:image/png;base64,AAAA");
        round.questions[0][0].media1 = Some(media.clone());
        round.questions[0][0].media2 = Some(media.clone());
        let mut final_question = Question::final_placeholder();
        final_question.media1 = Some(media);
        round.final_question = Some(final_question);

        assert_eq!(round.strip_media(), 3);
        assert!(round.questions[0][0].media1.is_none());
        assert!(round.questions[0][0].media2.is_none());
        assert!(
            round
                .final_question
                .as_ref()
                .is_some_and(|q| q.media1.is_none())
        );
    }

    #[test]
    fn test_collection_default_has_both_rounds() {
        let collection = RoundsCollection::default();
        assert!(collection.get(RoundKey::Individual).is_some());
        assert!(collection.get(RoundKey::Grupal).is_some());
    }

    #[test]
    fn test_collection_ensure_recreates_missing_slot() {
        let mut collection = RoundsCollection::default();
        collection.clear(RoundKey::Grupal);
        assert!(collection.get(RoundKey::Grupal).is_none());

        let round = collection.ensure(RoundKey::Grupal);
        assert_eq!(round.name, "Ronda Grupal");
        assert!(round.categories.is_empty());
        assert!(round.questions.is_empty());
    }

    #[test]
    fn test_record_with_missing_key_deserializes() {
        let collection: RoundsCollection = serde_json::from_str(
            r#"{"individual": {"name": "Ronda Individual", "categories": [], "questions": []}}"#,
        )
        .expect("record with a missing key should deserialize");

        assert!(collection.get(RoundKey::Individual).is_some());
        assert!(collection.get(RoundKey::Grupal).is_none());
    }

    #[test]
    fn test_record_restores_blank_round_name() {
        let collection: RoundsCollection =
            serde_json::from_str(r#"{"grupal": {"categories": [], "questions": []}}"#)
                .expect("record with a nameless round should deserialize");

        assert_eq!(
            collection.get(RoundKey::Grupal).map(|round| round.name.as_str()),
            Some("Ronda Grupal")
        );
    }

    #[test]
    fn test_record_round_trip() {
        let mut collection = RoundsCollection::default();
        collection.ensure(RoundKey::Individual).categories =
            vec!["Cine".to_string(), "Ciencia".to_string()];

        let encoded = serde_json::to_string(&collection).expect("collection should serialize");
        let decoded: RoundsCollection =
            serde_json::from_str(&encoded).expect("collection should deserialize");
        assert_eq!(decoded, collection);
    }
}
