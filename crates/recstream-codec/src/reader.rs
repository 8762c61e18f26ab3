use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use tracing::{debug, warn};

use recstream_types::{PreviousHash, DIGEST_LEN};

use crate::block::{BlockKind, RawBlock};
use crate::error::{CodecError, CodecResult, StreamDefect};

/// Byte length of the two-integer version header.
pub const HEADER_LEN: u64 = 8;

/// A record file's framing-level decode result.
///
/// `blocks` holds everything decoded before the stream ended; `defect`, if
/// set, is the condition that stopped consumption early. Clean end-of-stream
/// at a marker boundary leaves `defect` as `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRecordFile {
    pub format_version: i32,
    pub protocol_version: i32,
    pub blocks: Vec<RawBlock>,
    pub defect: Option<StreamDefect>,
}

/// Streaming decoder for the record-file envelope.
///
/// Consumes a byte stream front-to-back: two 4-byte big-endian header
/// integers, then a sequence of marker-tagged blocks until the stream is
/// exhausted. Holds no cross-call state and performs no I/O beyond the
/// stream itself.
pub struct EnvelopeReader;

impl EnvelopeReader {
    /// Decode the envelope from a readable byte stream.
    ///
    /// A short read inside the header is the fatal
    /// [`CodecError::TruncatedHeader`]; every later problem is recorded as a
    /// [`StreamDefect`] on the result, with already-decoded blocks retained.
    pub fn read_stream<R: Read>(mut reader: R) -> CodecResult<RawRecordFile> {
        let format_version = read_header_int(&mut reader)?;
        let protocol_version = read_header_int(&mut reader)?;
        debug!(format_version, protocol_version, "record file header");

        let mut offset = HEADER_LEN;
        let mut blocks = Vec::new();
        let mut defect = None;

        loop {
            let marker_offset = offset;
            let marker = match read_marker(&mut reader)? {
                Some(byte) => byte,
                // Stream exhausted at a marker boundary: normal end of file.
                None => break,
            };
            offset += 1;

            let kind = match BlockKind::from_marker_byte(marker) {
                Some(kind) => kind,
                None => {
                    warn!(marker, offset = marker_offset, "unrecognized block marker");
                    defect = Some(StreamDefect::UnrecognizedBlock {
                        marker,
                        offset: marker_offset,
                    });
                    break;
                }
            };

            match read_block(&mut reader, kind, &mut offset)? {
                Some(block) => blocks.push(block),
                None => {
                    warn!(%kind, offset = marker_offset, "truncated block");
                    defect = Some(StreamDefect::TruncatedBlock {
                        kind,
                        offset: marker_offset,
                    });
                    break;
                }
            }
        }

        Ok(RawRecordFile {
            format_version,
            protocol_version,
            blocks,
            defect,
        })
    }

    /// Decode the envelope of an on-disk record file.
    pub fn read_file(path: &Path) -> CodecResult<RawRecordFile> {
        let reader = BufReader::new(File::open(path)?);
        Self::read_stream(reader)
    }

    /// Read only a file's declared previous hash: header plus first block.
    ///
    /// Fast path for chain inspection that skips the rest of the stream. A
    /// leading block of any other kind (or no block at all) reports
    /// [`PreviousHash::Absent`].
    pub fn read_previous_hash(path: &Path) -> CodecResult<PreviousHash> {
        let mut reader = BufReader::new(File::open(path)?);
        read_header_int(&mut reader)?;
        read_header_int(&mut reader)?;

        let marker = match read_marker(&mut reader)? {
            Some(byte) => byte,
            None => return Ok(PreviousHash::Absent),
        };
        if marker != BlockKind::PreviousHash.marker_byte() {
            warn!(
                marker,
                path = %path.display(),
                "expected a leading previous-hash block"
            );
            return Ok(PreviousHash::Absent);
        }

        let mut hash = [0u8; DIGEST_LEN];
        if !fill(&mut reader, &mut hash)? {
            return Err(CodecError::TruncatedBlock {
                kind: BlockKind::PreviousHash,
                offset: HEADER_LEN,
            });
        }
        Ok(PreviousHash::from_raw(hash))
    }
}

/// Read one block's body. `None` means the stream ran out mid-block.
fn read_block<R: Read>(
    reader: &mut R,
    kind: BlockKind,
    offset: &mut u64,
) -> CodecResult<Option<RawBlock>> {
    match kind {
        BlockKind::PreviousHash => {
            let mut hash = [0u8; DIGEST_LEN];
            if !fill(reader, &mut hash)? {
                return Ok(None);
            }
            *offset += DIGEST_LEN as u64;
            Ok(Some(RawBlock::PreviousHash(hash)))
        }
        BlockKind::RecordPair => {
            let transaction = match read_length_prefixed(reader, offset)? {
                Some(bytes) => bytes,
                None => return Ok(None),
            };
            let record = match read_length_prefixed(reader, offset)? {
                Some(bytes) => bytes,
                None => return Ok(None),
            };
            Ok(Some(RawBlock::RecordPair {
                transaction,
                record,
            }))
        }
        BlockKind::Signature => {
            let signature = match read_length_prefixed(reader, offset)? {
                Some(bytes) => bytes,
                None => return Ok(None),
            };
            Ok(Some(RawBlock::Signature(signature)))
        }
    }
}

/// Read a 4-byte big-endian length followed by that many bytes.
///
/// Returns `None` on a short read of either part. The body is read through
/// `take`, so a hostile length cannot force an up-front allocation larger
/// than the bytes actually present.
fn read_length_prefixed<R: Read>(
    reader: &mut R,
    offset: &mut u64,
) -> CodecResult<Option<Vec<u8>>> {
    let mut len_bytes = [0u8; 4];
    if !fill(reader, &mut len_bytes)? {
        return Ok(None);
    }
    *offset += 4;

    let len = u32::from_be_bytes(len_bytes) as usize;
    let mut body = Vec::with_capacity(len.min(64 * 1024));
    let read = reader.take(len as u64).read_to_end(&mut body)?;
    if read < len {
        return Ok(None);
    }
    *offset += len as u64;
    Ok(Some(body))
}

/// Read one header integer; a short read here is fatal for the file.
fn read_header_int<R: Read>(reader: &mut R) -> CodecResult<i32> {
    let mut bytes = [0u8; 4];
    if !fill(reader, &mut bytes)? {
        return Err(CodecError::TruncatedHeader);
    }
    Ok(i32::from_be_bytes(bytes))
}

/// Read the next marker byte; `None` is clean end-of-stream.
fn read_marker<R: Read>(reader: &mut R) -> CodecResult<Option<u8>> {
    let mut byte = [0u8; 1];
    if fill(reader, &mut byte)? {
        Ok(Some(byte[0]))
    } else {
        Ok(None)
    }
}

/// Fill `buf` completely. `Ok(false)` means the stream ended first.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> CodecResult<bool> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}
