use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use recstream_types::{PreviousHash, Transaction, TransactionRecord};

use crate::block::RawBlock;
use crate::error::{CodecResult, StreamDefect};
use crate::payload;
use crate::reader::EnvelopeReader;

/// One decoded transaction/record pair, in file order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordPairEntry {
    pub transaction: Transaction,
    pub record: TransactionRecord,
}

/// A record pair whose payload bytes failed deserialization.
///
/// The pair is dropped; decoding of subsequent blocks continues.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPair {
    /// Index of the pair's block within the file's block sequence.
    pub block_index: usize,
    /// The deserialization failure, as reported by the payload library.
    pub reason: String,
}

/// A fully assembled record file: envelope pass plus payload pass.
///
/// Immutable once constructed. `pairs` preserves file order; no reordering
/// or deduplication occurs. A partially decoded file keeps everything read
/// before the stream defect that stopped it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordFile {
    pub format_version: i32,
    pub protocol_version: i32,
    pub previous_hash: PreviousHash,
    pub pairs: Vec<RecordPairEntry>,
    pub signature: Option<Vec<u8>>,
    /// The condition that stopped block consumption, if any.
    pub defect: Option<StreamDefect>,
    /// Pairs dropped because their payload bytes were malformed.
    pub skipped: Vec<SkippedPair>,
}

impl RecordFile {
    /// Decode a record file from a readable byte stream.
    pub fn decode<R: Read>(reader: R) -> CodecResult<Self> {
        let raw = EnvelopeReader::read_stream(reader)?;
        Ok(Self::assemble(raw))
    }

    /// Decode a record file from an in-memory byte slice.
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        Self::decode(bytes)
    }

    /// Decode an on-disk record file.
    pub fn read(path: &Path) -> CodecResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Self::decode(reader)
    }

    fn assemble(raw: crate::reader::RawRecordFile) -> Self {
        let mut previous_hash = PreviousHash::Absent;
        let mut pairs = Vec::new();
        let mut signature: Option<Vec<u8>> = None;
        let mut skipped = Vec::new();

        for (block_index, block) in raw.blocks.into_iter().enumerate() {
            match block {
                RawBlock::PreviousHash(hash) => {
                    // First declaration wins; real writers emit the block once.
                    if previous_hash.is_declared() {
                        warn!(block_index, "duplicate previous-hash block ignored");
                    } else {
                        previous_hash = PreviousHash::from_raw(hash);
                    }
                }
                RawBlock::RecordPair {
                    transaction,
                    record,
                } => {
                    let decoded = payload::decode_transaction(&transaction)
                        .and_then(|tx| {
                            payload::decode_transaction_record(&record)
                                .map(|rec| (tx, rec))
                        });
                    match decoded {
                        Ok((transaction, record)) => pairs.push(RecordPairEntry {
                            transaction,
                            record,
                        }),
                        Err(e) => {
                            warn!(block_index, error = %e, "skipping malformed record pair");
                            skipped.push(SkippedPair {
                                block_index,
                                reason: e.to_string(),
                            });
                        }
                    }
                }
                RawBlock::Signature(bytes) => {
                    if signature.is_some() {
                        warn!(block_index, "duplicate signature block; keeping the later one");
                    }
                    signature = Some(bytes);
                }
            }
        }

        Self {
            format_version: raw.format_version,
            protocol_version: raw.protocol_version,
            previous_hash,
            pairs,
            signature,
            defect: raw.defect,
            skipped,
        }
    }

    /// Returns `true` if the whole stream was consumed without a defect.
    pub fn is_complete(&self) -> bool {
        self.defect.is_none()
    }

    /// Number of successfully decoded pairs.
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }
}
