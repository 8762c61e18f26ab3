use std::path::Path;

use recstream_types::{FileDigest, Transaction, TransactionRecord};

use crate::block::RawBlock;
use crate::error::CodecResult;
use crate::payload;

/// Builds a record file byte stream block by block.
///
/// Blocks are emitted in insertion order, so callers (tests, fixture
/// tooling) can produce any valid block ordering, including the legacy
/// trailing-previous-hash layout.
pub struct RecordFileWriter {
    format_version: i32,
    protocol_version: i32,
    blocks: Vec<RawBlock>,
}

impl RecordFileWriter {
    /// Create a writer with the given header integers.
    pub fn new(format_version: i32, protocol_version: i32) -> Self {
        Self {
            format_version,
            protocol_version,
            blocks: Vec::new(),
        }
    }

    /// Append a previous-hash block declaring the given predecessor digest.
    pub fn previous_hash(&mut self, digest: &FileDigest) {
        self.blocks.push(RawBlock::PreviousHash(*digest.as_bytes()));
    }

    /// Append a zero-filled previous-hash block ("no predecessor").
    pub fn zero_previous_hash(&mut self) {
        self.previous_hash(&FileDigest::zero());
    }

    /// Append a record-pair block, encoding both payloads.
    pub fn add_pair(
        &mut self,
        transaction: &Transaction,
        record: &TransactionRecord,
    ) -> CodecResult<()> {
        let transaction = payload::encode_transaction(transaction)?;
        let record = payload::encode_transaction_record(record)?;
        self.add_raw_pair(transaction, record);
        Ok(())
    }

    /// Append a record-pair block from pre-encoded byte ranges.
    pub fn add_raw_pair(&mut self, transaction: Vec<u8>, record: Vec<u8>) {
        self.blocks.push(RawBlock::RecordPair {
            transaction,
            record,
        });
    }

    /// Append a signature block.
    pub fn signature(&mut self, bytes: Vec<u8>) {
        self.blocks.push(RawBlock::Signature(bytes));
    }

    /// Number of blocks queued.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if no blocks are queued.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Encode the file to bytes.
    pub fn finish(self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&self.format_version.to_be_bytes());
        bytes.extend_from_slice(&self.protocol_version.to_be_bytes());

        for block in &self.blocks {
            bytes.push(block.kind().marker_byte());
            match block {
                RawBlock::PreviousHash(hash) => bytes.extend_from_slice(hash),
                RawBlock::RecordPair {
                    transaction,
                    record,
                } => {
                    push_length_prefixed(&mut bytes, transaction);
                    push_length_prefixed(&mut bytes, record);
                }
                RawBlock::Signature(sig) => push_length_prefixed(&mut bytes, sig),
            }
        }
        bytes
    }

    /// Encode the file and write it to disk.
    pub fn write_to(self, path: &Path) -> CodecResult<()> {
        std::fs::write(path, self.finish())?;
        Ok(())
    }
}

fn push_length_prefixed(bytes: &mut Vec<u8>, body: &[u8]) {
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
}
