use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use recstream_chain::ChainMismatch;
use recstream_codec::StreamDefect;
use recstream_types::FileDigest;

/// How far one file's processing got.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    /// Whole stream consumed; every block decoded.
    Decoded,
    /// Decoding stopped at a stream defect; prior blocks were retained.
    Partial(StreamDefect),
    /// Nothing usable was decoded (unreadable file or truncated header).
    Failed(String),
    /// The path did not exist; skipped with a notice.
    Missing,
}

impl FileStatus {
    /// Returns `true` for outcomes that produced decoded content.
    pub fn produced_content(&self) -> bool {
        matches!(self, Self::Decoded | Self::Partial(_))
    }
}

/// Per-file result of a sweep.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
    /// SHA-384 over the file's full raw bytes; `None` if it was never read.
    pub digest: Option<FileDigest>,
    /// Pairs successfully decoded and dispatched.
    pub pairs_decoded: usize,
    /// Pairs dropped for malformed payload bytes.
    pub pairs_skipped: usize,
    /// Records the downstream sink refused.
    pub sink_failures: usize,
    /// Whether the file was moved into the archive directory.
    pub relocated: bool,
}

/// Result of sweeping an ordered batch of record files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// One outcome per file attempted, in batch order.
    pub outcomes: Vec<ProcessingOutcome>,
    /// Every chain break found, in batch order.
    pub mismatches: Vec<ChainMismatch>,
}

impl SweepReport {
    /// Number of files attempted.
    pub fn files_processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Total pairs decoded across the batch.
    pub fn pairs_decoded(&self) -> usize {
        self.outcomes.iter().map(|o| o.pairs_decoded).sum()
    }

    /// Number of files moved into the archive.
    pub fn files_relocated(&self) -> usize {
        self.outcomes.iter().filter(|o| o.relocated).count()
    }

    /// Files that yielded no decoded content.
    pub fn files_failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| !o.status.produced_content())
            .count()
    }

    /// Returns `true` when every file fully decoded and every link held.
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
            && self
                .outcomes
                .iter()
                .all(|o| matches!(o.status, FileStatus::Decoded))
    }
}
