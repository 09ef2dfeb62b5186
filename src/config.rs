//! Runtime configuration and fixture id lists
//!
//! Configuration arrives as a flat string-to-string property map from the
//! benchmark driver. Three read modes select how much transactional
//! machinery read-only operations pay for, updates are always
//! transactional, and an optional pair of fixture id files switches the
//! read operations into fixture mode for connectivity smoke runs.

use rand::Rng;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read id file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid id {value:?} at {path}:{line}")]
    InvalidId { path: PathBuf, line: usize, value: String },

    #[error("id file {path} contains no ids")]
    EmptyIdFile { path: PathBuf },

    #[error("fixture id list is empty")]
    EmptyIdList,
}

/// How read-only operations interact with the store's transaction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Reads bypass conflict tracking entirely: transactional reads are
    /// disabled for the duration of the operation and re-enabled after.
    /// No retry loop; an operation observing a torn write surfaces it.
    #[default]
    BestEffort,
    /// Reads run inside a store transaction for snapshot consistency but
    /// roll back instead of committing. No retry loop.
    StoreTransactional,
    /// Reads commit and retry on conflict, same as updates.
    Transactional,
}

/// Pre-sampled vertex ids backing fixture mode.
///
/// In fixture mode read operations skip evaluation and answer from these
/// lists, exercising only driver connectivity and parameter plumbing.
#[derive(Debug, Clone)]
pub struct Fixtures {
    person_ids: Vec<u64>,
    message_ids: Vec<u64>,
}

impl Fixtures {
    pub fn load(person_path: &Path, message_path: &Path) -> Result<Self, ConfigError> {
        Ok(Fixtures {
            person_ids: read_id_file(person_path)?,
            message_ids: read_id_file(message_path)?,
        })
    }

    /// Build from in-memory id lists. Sampling assumes non-empty lists, so
    /// an empty one is rejected here, mirroring the file loader.
    pub fn from_ids(
        person_ids: Vec<u64>,
        message_ids: Vec<u64>,
    ) -> Result<Self, ConfigError> {
        if person_ids.is_empty() || message_ids.is_empty() {
            return Err(ConfigError::EmptyIdList);
        }
        Ok(Fixtures { person_ids, message_ids })
    }

    pub fn person_ids(&self) -> &[u64] {
        &self.person_ids
    }

    pub fn message_ids(&self) -> &[u64] {
        &self.message_ids
    }

    /// Uniformly sampled person id.
    pub fn sample_person(&self, rng: &mut impl Rng) -> u64 {
        self.person_ids[rng.gen_range(0..self.person_ids.len())]
    }

    /// Uniformly sampled message id.
    pub fn sample_message(&self, rng: &mut impl Rng) -> u64 {
        self.message_ids[rng.gen_range(0..self.message_ids.len())]
    }
}

fn read_id_file(path: &Path) -> Result<Vec<u64>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut ids = Vec::new();
    for (i, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let id = line.parse::<u64>().map_err(|_| ConfigError::InvalidId {
            path: path.to_path_buf(),
            line: i + 1,
            value: line.to_string(),
        })?;
        ids.push(id);
    }
    if ids.is_empty() {
        return Err(ConfigError::EmptyIdFile { path: path.to_path_buf() });
    }
    Ok(ids)
}

/// Parsed runtime configuration.
#[derive(Debug, Default)]
pub struct RuntimeConfig {
    pub read_mode: ReadMode,
    /// Acknowledge update operations without touching the store.
    pub suppress_updates: bool,
    /// When present, read operations answer from fixtures.
    pub fixtures: Option<Fixtures>,
}

impl RuntimeConfig {
    /// Build from the driver's property map.
    ///
    /// `txReads` selects [`ReadMode::Transactional`] and wins over
    /// `storeTxReads` ([`ReadMode::StoreTransactional`]); presence of a key
    /// is what matters, its value is ignored. Fixture mode requires both
    /// `personIdsFile` and `messageIdsFile`.
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let read_mode = if props.contains_key("txReads") {
            ReadMode::Transactional
        } else if props.contains_key("storeTxReads") {
            ReadMode::StoreTransactional
        } else {
            ReadMode::BestEffort
        };

        let fixtures = match (props.get("personIdsFile"), props.get("messageIdsFile")) {
            (Some(person), Some(message)) => {
                Some(Fixtures::load(Path::new(person), Path::new(message))?)
            }
            _ => None,
        };

        Ok(RuntimeConfig {
            read_mode,
            suppress_updates: props.contains_key("suppressUpdates"),
            fixtures,
        })
    }
}
