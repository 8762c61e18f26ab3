use serde::{Deserialize, Serialize};

use crate::digest::FileDigest;
use crate::timestamp::ConsensusTimestamp;

/// Declared chain link read from a record file.
///
/// The on-disk format does not distinguish "legitimately no predecessor"
/// from "legacy/malformed file missing the block", so that ambiguity is
/// preserved here instead of being collapsed to one interpretation:
///
/// - `Absent` — the file contained no previous-hash block at all
/// - `ZeroFilled` — the block was present with all 48 bytes zero
/// - `Present` — the block declared a concrete predecessor digest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviousHash {
    Absent,
    ZeroFilled,
    Present(FileDigest),
}

impl PreviousHash {
    /// Classify a raw 48-byte previous-hash block.
    pub fn from_raw(bytes: [u8; crate::digest::DIGEST_LEN]) -> Self {
        let digest = FileDigest::from_hash(bytes);
        if digest.is_zero() {
            Self::ZeroFilled
        } else {
            Self::Present(digest)
        }
    }

    /// The declared digest, if one was present and non-zero.
    pub fn digest(&self) -> Option<&FileDigest> {
        match self {
            Self::Present(digest) => Some(digest),
            Self::Absent | Self::ZeroFilled => None,
        }
    }

    /// Returns `true` if the file carried a previous-hash block (zero or not).
    pub fn is_declared(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

impl std::fmt::Display for PreviousHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::ZeroFilled => write!(f, "zero-filled"),
            Self::Present(digest) => write!(f, "{digest}"),
        }
    }
}

/// One signature over a transaction body, keyed by a public-key prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    /// Prefix of the signing public key (disambiguates multi-sig).
    pub pub_key_prefix: Vec<u8>,
    /// Ed25519 signature bytes. Extracted, never verified by this auditor.
    pub ed25519_sig: Vec<u8>,
}

/// A submitted transaction as embedded in a record file.
///
/// The auditor treats the body as opaque bytes; interpreting the body is a
/// consumer concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Serialized transaction body.
    pub body_bytes: Vec<u8>,
    /// Signatures over the body.
    pub signature_map: Vec<SignaturePair>,
}

/// Terminal status of a transaction's execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    /// Consensus reached but the outcome is not yet known.
    Unknown,
    /// Transaction executed successfully.
    Success,
    /// Transaction was rejected as invalid.
    InvalidTransaction,
    /// Transaction failed during execution.
    ExecutionFailed,
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Success => write!(f, "success"),
            Self::InvalidTransaction => write!(f, "invalid-transaction"),
            Self::ExecutionFailed => write!(f, "execution-failed"),
        }
    }
}

/// Execution outcome paired with a transaction in the record stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Consensus timestamp assigned by the network.
    pub consensus_timestamp: ConsensusTimestamp,
    /// Hash of the transaction this record describes.
    pub transaction_hash: Vec<u8>,
    /// Free-form memo carried from the transaction.
    pub memo: String,
    /// Fee charged, in the network's smallest denomination.
    pub transaction_fee: u64,
    /// Terminal execution status.
    pub status: ReceiptStatus,
}
