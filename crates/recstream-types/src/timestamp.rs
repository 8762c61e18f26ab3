use std::fmt;

use serde::{Deserialize, Serialize};

/// Consensus timestamp assigned to a transaction by the network.
///
/// Seconds/nanoseconds since the UNIX epoch, carried verbatim from the
/// record payload. Ordering: `seconds` → `nanos` (total order).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsensusTimestamp {
    /// Whole seconds since the UNIX epoch.
    pub seconds: i64,
    /// Sub-second nanoseconds (0..=999_999_999).
    pub nanos: i32,
}

impl ConsensusTimestamp {
    /// Create a timestamp with explicit values.
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// The epoch timestamp (all zeros).
    pub const fn epoch() -> Self {
        Self {
            seconds: 0,
            nanos: 0,
        }
    }

    /// Returns `true` if this timestamp is strictly after `other`.
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }
}

impl PartialOrd for ConsensusTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConsensusTimestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.seconds
            .cmp(&other.seconds)
            .then(self.nanos.cmp(&other.nanos))
    }
}

impl fmt::Debug for ConsensusTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConsensusTimestamp({}.{:09})", self.seconds, self.nanos)
    }
}

impl fmt::Display for ConsensusTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}
