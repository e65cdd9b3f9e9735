//! Durable storage for the three game records
//!
//! Round content, the player roster, and the team roster are persisted
//! as three independent records behind the [`RecordStore`] seam. Saves
//! are best-effort write-behind: the caller has always finished its
//! in-memory mutation before flushing, failures are logged and reported
//! through an explicit [`SaveOutcome`] instead of being thrown, and a
//! later save for the same record simply supersedes an earlier one.
//!
//! Round content can carry large embedded media payloads. A store
//! backed by a size-constrained tier reproduces the historical
//! degradation path: when the encoded record exceeds the ceiling, all
//! media is stripped and the save retried once, surfacing
//! [`SaveOutcome::Degraded`] so the facilitator can be warned.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use log::{debug, error, warn};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    board::round::RoundsCollection,
    constants,
    presenter::Notice,
    scorable::{Player, Team},
};

/// Errors produced by a storage tier
#[derive(Error, Debug)]
pub enum StorageError {
    /// The storage tier cannot be reached at all
    #[error("storage tier is unavailable")]
    Unavailable,
    /// The encoded record does not fit the tier's size ceiling
    #[error("record of {size} bytes exceeds the {limit} byte ceiling")]
    QuotaExceeded {
        /// Encoded size of the rejected record
        size: usize,
        /// Ceiling of the storage tier
        limit: usize,
    },
    /// The underlying filesystem rejected the operation
    #[error("storage io failure: {0}")]
    Io(#[from] io::Error),
    /// The record could not be encoded
    #[error("record encoding failure: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why a save succeeded only partially
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradeReason {
    /// Media attachments were dropped so the record would fit
    #[error("dropped {stripped} media attachment(s) to fit the storage ceiling")]
    MediaStripped {
        /// Number of attachments removed before the retry
        stripped: usize,
    },
}

/// The outcome of a best-effort save
///
/// Callers must not assume durability on anything but [`Self::Saved`];
/// in-memory state is authoritative either way.
#[derive(Debug)]
pub enum SaveOutcome {
    /// The record was persisted in full
    Saved,
    /// The record was persisted after shedding content
    Degraded(DegradeReason),
    /// The record was not persisted; play continues on memory alone
    Failed(StorageError),
}

impl SaveOutcome {
    /// Whether the record was persisted in full
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }

    /// The facilitator-facing notice for a partial or failed save
    ///
    /// Returns `None` for a fully successful save.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Saved => None,
            Self::Degraded(reason) => Some(Notice::SaveDegraded {
                detail: reason.to_string(),
            }),
            Self::Failed(error) => Some(Notice::SaveFailed {
                detail: error.to_string(),
            }),
        }
    }
}

/// Durable key-value storage for the three game records
///
/// Implementations may be backed by an asynchronous tier; the contract
/// only requires that loads observe the latest completed save
/// (last-write-wins) and that no method panics on storage failure.
pub trait RecordStore {
    /// Persists the round content record, degrading if it must
    fn save_rounds(&self, rounds: &RoundsCollection) -> SaveOutcome;

    /// Loads the round content record
    ///
    /// Returns `None` when no record exists or the tier is unavailable;
    /// the caller substitutes fresh default rounds.
    fn load_rounds(&self) -> Option<RoundsCollection>;

    /// Persists the player roster record
    fn save_players(&self, players: &[Player]) -> SaveOutcome;

    /// Loads the player roster record, empty when absent
    fn load_players(&self) -> Vec<Player>;

    /// Persists the team roster record
    fn save_teams(&self, teams: &[Team]) -> SaveOutcome;

    /// Loads the team roster record, empty when absent
    fn load_teams(&self) -> Vec<Team>;
}

/// Encodes a record, stripping media on ceiling overflow
///
/// Shared by the store implementations: returns the encoded payload
/// and the degradation that was needed to make it fit, or the error
/// that makes the save impossible.
fn encode_rounds_within(
    rounds: &RoundsCollection,
    limit: Option<usize>,
) -> Result<(String, Option<DegradeReason>), StorageError> {
    let encoded = serde_json::to_string(rounds)?;

    let Some(limit) = limit else {
        return Ok((encoded, None));
    };
    if encoded.len() <= limit {
        return Ok((encoded, None));
    }

    let mut lightened = rounds.clone();
    let stripped = lightened.strip_media();
    let retried = serde_json::to_string(&lightened)?;
    if stripped > 0 && retried.len() <= limit {
        warn!("round record over ceiling, stripped {stripped} media attachment(s)");
        Ok((retried, Some(DegradeReason::MediaStripped { stripped })))
    } else {
        Err(StorageError::QuotaExceeded {
            size: encoded.len(),
            limit,
        })
    }
}

fn encode_roster<T: Serialize>(
    roster: &[T],
    limit: Option<usize>,
) -> Result<String, StorageError> {
    let encoded = serde_json::to_string(roster)?;
    if let Some(limit) = limit
        && encoded.len() > limit
    {
        return Err(StorageError::QuotaExceeded {
            size: encoded.len(),
            limit,
        });
    }
    Ok(encoded)
}

/// A store writing each record as a JSON file in one directory
///
/// This is the transactional-object-store tier: by default there is no
/// size ceiling, so media-bearing round content is persisted as-is. A
/// ceiling can be configured to emulate the size-constrained tier of
/// earlier revisions, enabling the strip-and-retry degradation path.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    max_record_bytes: Option<usize>,
}

impl FileStore {
    /// Opens a store rooted at the given directory, without a ceiling
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_record_bytes: None,
        }
    }

    /// Caps every record at the given encoded size in bytes
    pub fn with_record_ceiling(mut self, max_record_bytes: usize) -> Self {
        self.max_record_bytes = Some(max_record_bytes);
        self
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn write_record(&self, id: &str, payload: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.record_path(id), payload)?;
        debug!("record {id} persisted ({} bytes)", payload.len());
        Ok(())
    }

    fn read_record<T: DeserializeOwned>(&self, id: &str) -> Option<T> {
        let payload = match fs::read_to_string(self.record_path(id)) {
            Ok(payload) => payload,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                error!("failed to read record {id}: {err}");
                return None;
            }
        };
        match serde_json::from_str(&payload) {
            Ok(record) => Some(record),
            Err(err) => {
                error!("record {id} is malformed, falling back to defaults: {err}");
                None
            }
        }
    }

    fn save_roster<T: Serialize>(&self, id: &str, roster: &[T]) -> SaveOutcome {
        let encoded = match encode_roster(roster, self.max_record_bytes) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!("failed to encode record {id}: {err}");
                return SaveOutcome::Failed(err);
            }
        };
        match self.write_record(id, &encoded) {
            Ok(()) => SaveOutcome::Saved,
            Err(err) => {
                error!("failed to persist record {id}: {err}");
                SaveOutcome::Failed(err)
            }
        }
    }

    /// The directory the records live in
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RecordStore for FileStore {
    fn save_rounds(&self, rounds: &RoundsCollection) -> SaveOutcome {
        let (encoded, degraded) = match encode_rounds_within(rounds, self.max_record_bytes) {
            Ok(result) => result,
            Err(err) => {
                error!("failed to encode round record: {err}");
                return SaveOutcome::Failed(err);
            }
        };
        match self.write_record(constants::storage::ROUNDS_RECORD_ID, &encoded) {
            Ok(()) => degraded.map_or(SaveOutcome::Saved, SaveOutcome::Degraded),
            Err(err) => {
                error!("failed to persist round record: {err}");
                SaveOutcome::Failed(err)
            }
        }
    }

    fn load_rounds(&self) -> Option<RoundsCollection> {
        self.read_record(constants::storage::ROUNDS_RECORD_ID)
    }

    fn save_players(&self, players: &[Player]) -> SaveOutcome {
        self.save_roster(constants::storage::PLAYERS_RECORD_ID, players)
    }

    fn load_players(&self) -> Vec<Player> {
        self.read_record(constants::storage::PLAYERS_RECORD_ID)
            .unwrap_or_default()
    }

    fn save_teams(&self, teams: &[Team]) -> SaveOutcome {
        self.save_roster(constants::storage::TEAMS_RECORD_ID, teams)
    }

    fn load_teams(&self) -> Vec<Team> {
        self.read_record(constants::storage::TEAMS_RECORD_ID)
            .unwrap_or_default()
    }
}

/// An in-memory store for tests and ephemeral embedding
///
/// Supports the same ceiling/degradation behavior as [`FileStore`] and
/// can be switched to an unavailable state to exercise total storage
/// failure.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
    unavailable: Mutex<bool>,
    max_record_bytes: Option<usize>,
}

impl MemoryStore {
    /// Creates an empty, available store without a ceiling
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps every record at the given encoded size in bytes
    pub fn with_record_ceiling(mut self, max_record_bytes: usize) -> Self {
        self.max_record_bytes = Some(max_record_bytes);
        self
    }

    /// Simulates the tier going down (or coming back)
    pub fn set_available(&self, available: bool) {
        *self.unavailable.lock().unwrap_or_else(|e| e.into_inner()) = !available;
    }

    fn is_unavailable(&self) -> bool {
        *self.unavailable.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn put(&self, id: &str, payload: String) -> SaveOutcome {
        if self.is_unavailable() {
            warn!("record {id} not persisted: storage unavailable");
            return SaveOutcome::Failed(StorageError::Unavailable);
        }
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_owned(), payload);
        SaveOutcome::Saved
    }

    fn get<T: DeserializeOwned>(&self, id: &str) -> Option<T> {
        if self.is_unavailable() {
            return None;
        }
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let payload = records.get(id)?;
        match serde_json::from_str(payload) {
            Ok(record) => Some(record),
            Err(err) => {
                error!("record {id} is malformed, falling back to defaults: {err}");
                None
            }
        }
    }

    fn save_roster<T: Serialize>(&self, id: &str, roster: &[T]) -> SaveOutcome {
        match encode_roster(roster, self.max_record_bytes) {
            Ok(encoded) => self.put(id, encoded),
            Err(err) => {
                error!("failed to encode record {id}: {err}");
                SaveOutcome::Failed(err)
            }
        }
    }
}

impl RecordStore for MemoryStore {
    fn save_rounds(&self, rounds: &RoundsCollection) -> SaveOutcome {
        match encode_rounds_within(rounds, self.max_record_bytes) {
            Ok((encoded, degraded)) => match self.put(constants::storage::ROUNDS_RECORD_ID, encoded)
            {
                SaveOutcome::Saved => degraded.map_or(SaveOutcome::Saved, SaveOutcome::Degraded),
                failed => failed,
            },
            Err(err) => {
                error!("failed to encode round record: {err}");
                SaveOutcome::Failed(err)
            }
        }
    }

    fn load_rounds(&self) -> Option<RoundsCollection> {
        self.get(constants::storage::ROUNDS_RECORD_ID)
    }

    fn save_players(&self, players: &[Player]) -> SaveOutcome {
        self.save_roster(constants::storage::PLAYERS_RECORD_ID, players)
    }

    fn load_players(&self) -> Vec<Player> {
        self.get(constants::storage::PLAYERS_RECORD_ID)
            .unwrap_or_default()
    }

    fn save_teams(&self, teams: &[Team]) -> SaveOutcome {
        self.save_roster(constants::storage::TEAMS_RECORD_ID, teams)
    }

    fn load_teams(&self) -> Vec<Team> {
        self.get(constants::storage::TEAMS_RECORD_ID)
            .unwrap_or_default()
    }
}
