use serde::{Deserialize, Serialize};
use tracing::error;

use recstream_types::{FileDigest, PreviousHash};

/// Per-file input to chain validation: the file's computed digest and the
/// previous-hash it declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainEntry {
    pub name: String,
    pub digest: FileDigest,
    pub declared_previous: PreviousHash,
}

/// One broken link between adjacent files in a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainMismatch {
    /// The predecessor file whose computed digest was expected.
    pub prev_name: String,
    /// The file whose declaration did not match.
    pub name: String,
    /// Digest computed over the predecessor's raw bytes.
    pub computed: FileDigest,
    /// What the file actually declared.
    pub declared: PreviousHash,
}

impl std::fmt::Display for ChainMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "chain break {} -> {}: computed {}, declared {}",
            self.prev_name, self.name, self.computed, self.declared
        )
    }
}

/// Streaming chain validator.
///
/// Chain validation is inherently sequential: file *N+1* cannot be checked
/// until file *N*'s digest is known. The cursor holds exactly that one
/// digest of state. The first observed file is recorded but never validated
/// — its declaration may reference history outside the batch window.
#[derive(Debug, Default)]
pub struct ChainCursor {
    prev: Option<(String, FileDigest)>,
}

impl ChainCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next file in batch order; returns the mismatch, if any.
    ///
    /// Comparison is byte-for-byte over the 48-byte digest. `ZeroFilled`
    /// compares as 48 zero bytes; `Absent` against a known predecessor is a
    /// missing link. Either way the mismatch is reported and the cursor
    /// advances — a break never stops the batch.
    pub fn observe(
        &mut self,
        name: &str,
        declared_previous: &PreviousHash,
        digest: FileDigest,
    ) -> Option<ChainMismatch> {
        let mismatch = match &self.prev {
            None => None,
            Some((prev_name, computed)) => {
                let matches = match declared_previous {
                    PreviousHash::Present(declared) => declared == computed,
                    PreviousHash::ZeroFilled => computed.is_zero(),
                    PreviousHash::Absent => false,
                };
                if matches {
                    None
                } else {
                    let mismatch = ChainMismatch {
                        prev_name: prev_name.clone(),
                        name: name.to_string(),
                        computed: *computed,
                        declared: *declared_previous,
                    };
                    error!(
                        prev = %mismatch.prev_name,
                        file = %mismatch.name,
                        computed = %mismatch.computed,
                        declared = %mismatch.declared,
                        "previous-hash does not match predecessor digest"
                    );
                    Some(mismatch)
                }
            }
        };

        self.prev = Some((name.to_string(), digest));
        mismatch
    }
}

/// Result of validating an ordered batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReport {
    /// Number of files observed (links checked is one fewer).
    pub files_checked: usize,
    /// Every broken link, in batch order.
    pub mismatches: Vec<ChainMismatch>,
}

impl ChainReport {
    /// Returns `true` if no link was broken.
    pub fn is_intact(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Batch-mode chain validation over pre-computed digests.
pub struct ChainValidator;

impl ChainValidator {
    /// Verify every adjacent link in an ordered batch, reporting all breaks.
    pub fn verify_batch(entries: &[ChainEntry]) -> ChainReport {
        let mut cursor = ChainCursor::new();
        let mut mismatches = Vec::new();
        for entry in entries {
            if let Some(mismatch) =
                cursor.observe(&entry.name, &entry.declared_previous, entry.digest)
            {
                mismatches.push(mismatch);
            }
        }
        ChainReport {
            files_checked: entries.len(),
            mismatches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::digest384;

    /// Build an intact chain: entry k+1 declares the digest of entry k.
    fn linked_entries(count: usize) -> Vec<ChainEntry> {
        let mut entries = Vec::new();
        let mut prev: Option<FileDigest> = None;
        for i in 0..count {
            let digest = digest384(format!("file-{i}").as_bytes());
            let declared = match prev {
                None => PreviousHash::ZeroFilled,
                Some(d) => PreviousHash::Present(d),
            };
            entries.push(ChainEntry {
                name: format!("2026-08-06T{i:02}.rcd"),
                digest,
                declared_previous: declared,
            });
            prev = Some(digest);
        }
        entries
    }

    #[test]
    fn empty_batch_is_intact() {
        let report = ChainValidator::verify_batch(&[]);
        assert!(report.is_intact());
        assert_eq!(report.files_checked, 0);
    }

    #[test]
    fn single_file_is_never_validated() {
        let mut entries = linked_entries(1);
        // Even a nonsense declaration on the first file is not a mismatch.
        entries[0].declared_previous = PreviousHash::Present(digest384(b"unrelated"));
        let report = ChainValidator::verify_batch(&entries);
        assert!(report.is_intact());
    }

    #[test]
    fn intact_chain_of_three() {
        let report = ChainValidator::verify_batch(&linked_entries(3));
        assert!(report.is_intact());
        assert_eq!(report.files_checked, 3);
    }

    #[test]
    fn flipped_declaration_breaks_exactly_one_link() {
        let mut entries = linked_entries(3);
        // Corrupt the second file's declaration (the 1->2 link).
        let mut bytes = *entries[1].declared_previous.digest().unwrap().as_bytes();
        bytes[0] ^= 0x01;
        entries[1].declared_previous = PreviousHash::Present(FileDigest::from_hash(bytes));

        let report = ChainValidator::verify_batch(&entries);
        assert_eq!(report.mismatches.len(), 1);
        let mismatch = &report.mismatches[0];
        assert_eq!(mismatch.prev_name, entries[0].name);
        assert_eq!(mismatch.name, entries[1].name);
        assert_eq!(mismatch.computed, entries[0].digest);
    }

    #[test]
    fn absent_declaration_after_first_file_is_a_break() {
        let mut entries = linked_entries(2);
        entries[1].declared_previous = PreviousHash::Absent;
        let report = ChainValidator::verify_batch(&entries);
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].declared, PreviousHash::Absent);
    }

    #[test]
    fn zero_filled_after_first_file_is_a_break() {
        let mut entries = linked_entries(2);
        entries[1].declared_previous = PreviousHash::ZeroFilled;
        let report = ChainValidator::verify_batch(&entries);
        assert_eq!(report.mismatches.len(), 1);
    }

    #[test]
    fn break_does_not_cascade() {
        // Corrupting one declaration must not invalidate later, correct links.
        let mut entries = linked_entries(4);
        entries[1].declared_previous = PreviousHash::Present(digest384(b"wrong"));
        let report = ChainValidator::verify_batch(&entries);
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].name, entries[1].name);
    }

    #[test]
    fn every_break_is_reported() {
        let mut entries = linked_entries(4);
        entries[1].declared_previous = PreviousHash::Present(digest384(b"bad-1"));
        entries[3].declared_previous = PreviousHash::Present(digest384(b"bad-3"));
        let report = ChainValidator::verify_batch(&entries);
        assert_eq!(report.mismatches.len(), 2);
        assert_eq!(report.mismatches[0].name, entries[1].name);
        assert_eq!(report.mismatches[1].name, entries[3].name);
    }

    #[test]
    fn cursor_reports_in_stream_order() {
        let entries = linked_entries(3);
        let mut cursor = ChainCursor::new();
        for entry in &entries {
            assert!(cursor
                .observe(&entry.name, &entry.declared_previous, entry.digest)
                .is_none());
        }
    }

    #[test]
    fn mismatch_display_names_both_files() {
        let mut entries = linked_entries(2);
        entries[1].declared_previous = PreviousHash::Absent;
        let report = ChainValidator::verify_batch(&entries);
        let text = report.mismatches[0].to_string();
        assert!(text.contains(&entries[0].name));
        assert!(text.contains(&entries[1].name));
        assert!(text.contains("absent"));
    }
}
