use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a participant in a settlement window.
///
/// Unique within a single window; this is the hub's own numbering scheme,
/// not interpreted further by the engine.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::party::ParticipantId;
///
/// let a = ParticipantId::new(1);
/// let b = ParticipantId::new(2);
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u64);

impl ParticipantId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ParticipantId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Opaque identifier for a participant's settlement account on the hub.
///
/// Unsigned by construction: the receiving partner bank's pain.001 profile
/// rejects signed or negative account numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(u64);

impl AccountId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}
