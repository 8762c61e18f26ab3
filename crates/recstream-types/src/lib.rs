//! Foundation types for the recstream record-file auditor.
//!
//! This crate provides the core identity and payload types used throughout
//! the recstream workspace. Every other recstream crate depends on
//! `recstream-types`.
//!
//! # Key Types
//!
//! - [`FileDigest`] — fixed 48-byte (SHA-384) digest of a record file's raw bytes
//! - [`PreviousHash`] — tri-state chain-link declaration read from a record file
//! - [`ConsensusTimestamp`] — seconds/nanos consensus time carried by records
//! - [`Transaction`] / [`TransactionRecord`] — the embedded payload message schema

pub mod digest;
pub mod error;
pub mod message;
pub mod timestamp;

pub use digest::{FileDigest, DIGEST_LEN};
pub use error::TypeError;
pub use message::{PreviousHash, ReceiptStatus, SignaturePair, Transaction, TransactionRecord};
pub use timestamp::ConsensusTimestamp;
