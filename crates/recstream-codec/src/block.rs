use serde::{Deserialize, Serialize};

use recstream_types::DIGEST_LEN;

/// Marker byte introducing a previous-file-hash block.
pub const MARKER_PREVIOUS_HASH: u8 = 1;
/// Marker byte introducing a transaction/record pair block.
pub const MARKER_RECORD_PAIR: u8 = 2;
/// Marker byte introducing a signature block.
pub const MARKER_SIGNATURE: u8 = 3;

/// Type tag for record-file blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Fixed 48-byte digest of the preceding record file (no length prefix).
    PreviousHash,
    /// Two independently length-prefixed byte ranges: transaction, then record.
    RecordPair,
    /// One length-prefixed byte range holding the file content signature.
    Signature,
}

impl BlockKind {
    /// Serialize to the on-disk marker byte.
    pub fn marker_byte(&self) -> u8 {
        match self {
            Self::PreviousHash => MARKER_PREVIOUS_HASH,
            Self::RecordPair => MARKER_RECORD_PAIR,
            Self::Signature => MARKER_SIGNATURE,
        }
    }

    /// Parse from a marker byte. Unknown bytes return `None`.
    pub fn from_marker_byte(byte: u8) -> Option<Self> {
        match byte {
            MARKER_PREVIOUS_HASH => Some(Self::PreviousHash),
            MARKER_RECORD_PAIR => Some(Self::RecordPair),
            MARKER_SIGNATURE => Some(Self::Signature),
            _ => None,
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreviousHash => write!(f, "previous-hash"),
            Self::RecordPair => write!(f, "record-pair"),
            Self::Signature => write!(f, "signature"),
        }
    }
}

/// A framed block with its raw byte ranges, before payload decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawBlock {
    /// Declared digest of the preceding file.
    PreviousHash([u8; DIGEST_LEN]),
    /// Opaque transaction and record byte ranges.
    RecordPair {
        transaction: Vec<u8>,
        record: Vec<u8>,
    },
    /// Raw signature bytes over the file content.
    Signature(Vec<u8>),
}

impl RawBlock {
    /// The kind tag for this block.
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::PreviousHash(_) => BlockKind::PreviousHash,
            Self::RecordPair { .. } => BlockKind::RecordPair,
            Self::Signature(_) => BlockKind::Signature,
        }
    }
}
