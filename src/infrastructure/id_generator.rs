// Document ID Generator - Snowflake-like IDs assigned by the document store on insert

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use crate::error::{AppError, AppResult};

const WORKER_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const MAX_WORKERS: u16 = 1 << WORKER_BITS;
const MAX_SEQUENCE: u64 = (1 << SEQUENCE_BITS) - 1;

/// Opaque document identifier.
///
/// Serialized as a decimal string so JSON clients never round it through a
/// double. Layout: [timestamp:42][worker_id:10][sequence:12].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocId(i64);

impl DocId {
    pub fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }

    pub fn worker_id(self) -> u16 {
        (((self.0 as u64) >> SEQUENCE_BITS) & (MAX_WORKERS as u64 - 1)) as u16
    }

    pub fn timestamp_millis(self) -> u64 {
        (self.0 as u64) >> (WORKER_BITS + SEQUENCE_BITS)
    }

    pub fn sequence(self) -> u16 {
        ((self.0 as u64) & MAX_SEQUENCE) as u16
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(DocId)
            .map_err(|_| AppError::BadRequest(format!("Invalid id: {}", s)))
    }
}

impl From<DocId> for serde_json::Value {
    fn from(id: DocId) -> Self {
        serde_json::Value::String(id.to_string())
    }
}

impl Serialize for DocId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocIdVisitor;

        impl de::Visitor<'_> for DocIdVisitor {
            type Value = DocId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal document id string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<DocId, E> {
                v.parse::<i64>()
                    .map(DocId)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(DocIdVisitor)
    }
}

#[derive(Debug, Default)]
struct GeneratorState {
    last_timestamp: u64,
    sequence: u64,
}

/// Generates unique, roughly time-ordered ids for one worker.
#[derive(Debug)]
pub struct IdGenerator {
    worker_id: u16,
    state: Mutex<GeneratorState>,
}

impl IdGenerator {
    pub fn new(worker_id: u16) -> AppResult<Self> {
        if worker_id >= MAX_WORKERS {
            return Err(AppError::IdGenerationError(format!(
                "Worker ID must be less than {}, got {}",
                MAX_WORKERS, worker_id
            )));
        }

        Ok(Self {
            worker_id,
            state: Mutex::new(GeneratorState::default()),
        })
    }

    pub fn next_id(&self) -> DocId {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // A clock that moves backwards keeps issuing from the last timestamp.
        if now > state.last_timestamp {
            state.last_timestamp = now;
            state.sequence = 0;
        } else if state.sequence >= MAX_SEQUENCE {
            // Sequence exhausted for this millisecond: borrow the next one.
            state.last_timestamp += 1;
            state.sequence = 0;
        } else {
            state.sequence += 1;
        }

        let id = ((state.last_timestamp & 0x3FF_FFFF_FFFF) << (WORKER_BITS + SEQUENCE_BITS))
            | ((self.worker_id as u64) << SEQUENCE_BITS)
            | (state.sequence & MAX_SEQUENCE);

        DocId(id as i64)
    }
}
