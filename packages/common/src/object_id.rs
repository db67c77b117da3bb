use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Length of the textual (hex) form of an identifier.
pub const OBJECT_ID_HEX_LEN: usize = 24;

static COUNTER: AtomicU32 = AtomicU32::new(0);
static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();

/// Twelve-byte record identifier rendered as 24 lowercase hex characters.
///
/// Layout: 4-byte big-endian Unix seconds, 5 random bytes fixed per process,
/// 3-byte counter.
/// Identifiers generated within the same second sort by creation order as
/// long as they come from the same process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectIdError {
    #[error("identifier must be 24 characters, got {0}")]
    InvalidLength(usize),
    #[error("identifier must contain only hexadecimal characters")]
    InvalidHex,
}

impl ObjectId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or_default();
        let random = *PROCESS_UNIQUE.get_or_init(rand::random::<[u8; 5]>);
        Self::from_parts(secs, random, next_counter())
    }

    fn from_parts(secs: u32, random: [u8; 5], counter: u32) -> Self {
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&random);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 24-character hex string. Upper-case digits are accepted.
    pub fn parse_str(s: &str) -> Result<Self, ObjectIdError> {
        if s.len() != OBJECT_ID_HEX_LEN {
            return Err(ObjectIdError::InvalidLength(s.len()));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ObjectIdError::InvalidHex)?;
        Ok(Self(bytes))
    }
}

fn next_counter() -> u32 {
    let seed = COUNTER.load(Ordering::Relaxed);
    if seed == 0 {
        // First call in this process: start from a random offset.
        let _ = COUNTER.compare_exchange(
            0,
            rand::random::<u32>() | 1,
            Ordering::Relaxed,
            Ordering::Relaxed,
        );
    }
    COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s).map_err(serde::de::Error::custom)
    }
}
