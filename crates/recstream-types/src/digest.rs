use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Byte length of a record-file digest (SHA-384 output size).
pub const DIGEST_LEN: usize = 48;

/// Fixed-size digest of a record file's raw bytes.
///
/// A `FileDigest` is the SHA-384 hash of a file's exact on-disk content.
/// File *N* embeds the digest of file *N−1* as its previous-file-hash block,
/// which is what makes the record stream tamper-evident: any byte-level
/// change to a file changes its digest and breaks the declared link in its
/// successor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileDigest([u8; DIGEST_LEN]);

impl FileDigest {
    /// Create a `FileDigest` from a pre-computed 48-byte hash.
    pub const fn from_hash(hash: [u8; DIGEST_LEN]) -> Self {
        Self(hash)
    }

    /// The zero digest (all zeros). Used by writers to declare "no predecessor".
    pub const fn zero() -> Self {
        Self([0u8; DIGEST_LEN])
    }

    /// Returns `true` if every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; DIGEST_LEN]
    }

    /// The raw 48-byte hash.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Hex-encoded string representation (96 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != DIGEST_LEN {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; DIGEST_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileDigest({})", self.short_hex())
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; DIGEST_LEN]> for FileDigest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<FileDigest> for [u8; DIGEST_LEN] {
    fn from(digest: FileDigest) -> Self {
        digest.0
    }
}

// Serde has no derive support for [u8; 48]; serialize as a hex string,
// which is also the representation operators see in logs and JSON reports.
impl Serialize for FileDigest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FileDigest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
