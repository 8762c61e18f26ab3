//! Record-file envelope codec for the recstream auditor.
//!
//! Decodes the binary record files a ledger node emits once per interval:
//! a fixed two-integer version header followed by marker-tagged blocks
//! (previous-file hash, transaction/record pairs, file signature).
//!
//! # Architecture
//!
//! - **EnvelopeReader**: streaming framing pass — header plus raw blocks,
//!   with defect-and-retain recovery on truncation or unknown markers
//! - **payload**: the external message-format boundary (bincode) for the
//!   embedded transaction/record byte ranges
//! - **RecordFile**: assembled result of both passes
//! - **RecordFileWriter**: block-by-block encoder for tests and tooling

pub mod block;
pub mod error;
pub mod file;
pub mod payload;
pub mod reader;
pub mod writer;

pub use block::{BlockKind, RawBlock};
pub use error::{CodecError, CodecResult, StreamDefect};
pub use file::{RecordFile, RecordPairEntry, SkippedPair};
pub use reader::{EnvelopeReader, RawRecordFile, HEADER_LEN};
pub use writer::RecordFileWriter;
