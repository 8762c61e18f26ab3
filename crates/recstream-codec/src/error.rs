use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::BlockKind;

/// Recoverable stream defect: the condition that stopped block consumption.
///
/// A defect terminates decoding of the remainder of one file's stream but
/// does not discard blocks already decoded; it travels inside the partially
/// decoded result rather than replacing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum StreamDefect {
    /// A declared length exceeded the remaining stream bytes.
    #[error("truncated {kind} block at offset {offset}")]
    TruncatedBlock { kind: BlockKind, offset: u64 },

    /// An unknown marker byte was encountered.
    #[error("unrecognized block marker {marker:#04x} at offset {offset}")]
    UnrecognizedBlock { marker: u8, offset: u64 },
}

/// Errors produced by the record-file codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// File shorter than the fixed two-integer version header.
    #[error("record file shorter than the 8-byte version header")]
    TruncatedHeader,

    /// A declared length exceeded the remaining stream bytes.
    #[error("truncated {kind} block at offset {offset}")]
    TruncatedBlock { kind: BlockKind, offset: u64 },

    /// An unknown marker byte was encountered.
    #[error("unrecognized block marker {marker:#04x} at offset {offset}")]
    UnrecognizedBlock { marker: u8, offset: u64 },

    /// Embedded transaction/record bytes failed payload deserialization.
    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },

    /// I/O error from the underlying stream.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<StreamDefect> for CodecError {
    fn from(defect: StreamDefect) -> Self {
        match defect {
            StreamDefect::TruncatedBlock { kind, offset } => {
                Self::TruncatedBlock { kind, offset }
            }
            StreamDefect::UnrecognizedBlock { marker, offset } => {
                Self::UnrecognizedBlock { marker, offset }
            }
        }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
