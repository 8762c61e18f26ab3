//! Digest and chain-of-custody validation for the recstream auditor.
//!
//! Provides the whole-file SHA-384 digest primitive and the validator that
//! checks each record file's declared previous-hash against the computed
//! digest of its predecessor. All crypto wraps an established library —
//! no custom hashing.

pub mod digest;
pub mod validator;

pub use digest::{digest384, digest384_file, digest384_reader};
pub use validator::{ChainCursor, ChainEntry, ChainMismatch, ChainReport, ChainValidator};
