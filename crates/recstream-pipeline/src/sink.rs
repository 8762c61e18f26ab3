use std::path::Path;

use thiserror::Error;
use tracing::info;

use recstream_types::{ConsensusTimestamp, Transaction, TransactionRecord};

/// A downstream consumer rejected or failed to store a decoded record.
///
/// Sink failures are observability events, never fatal to the sweep.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("record sink failure: {0}")]
pub struct SinkError(pub String);

/// Downstream consumer of decoded results.
///
/// The pipeline drives one handler through the lifecycle of each file:
/// `on_file_start`, `on_record` once per successfully decoded pair (with a
/// 1-based per-file sequence number), `on_signature` if the file carried
/// one, then `on_file_complete` — for successes and partial decodes alike.
pub trait RecordHandler {
    fn on_file_start(&mut self, _path: &Path) {}

    fn on_record(
        &mut self,
        sequence: u64,
        consensus_timestamp: &ConsensusTimestamp,
        transaction: &Transaction,
        record: &TransactionRecord,
    ) -> Result<(), SinkError>;

    fn on_signature(&mut self, _path: &Path, _signature: &[u8]) {}

    fn on_file_complete(&mut self, _path: &Path) {}
}

/// The injected record sink, with an explicit disabled state.
///
/// `Disabled` drops every event without dispatching; it is a variant rather
/// than a no-op handler so callers and logs can see that record delivery is
/// switched off.
pub enum RecordSink {
    Disabled,
    Handler(Box<dyn RecordHandler>),
}

impl RecordSink {
    /// A sink that drops everything.
    pub fn disabled() -> Self {
        Self::Disabled
    }

    /// Wrap a handler.
    pub fn handler(handler: impl RecordHandler + 'static) -> Self {
        Self::Handler(Box::new(handler))
    }

    /// Returns `true` if record delivery is switched off.
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    pub fn file_start(&mut self, path: &Path) {
        if let Self::Handler(handler) = self {
            handler.on_file_start(path);
        }
    }

    pub fn record(
        &mut self,
        sequence: u64,
        consensus_timestamp: &ConsensusTimestamp,
        transaction: &Transaction,
        record: &TransactionRecord,
    ) -> Result<(), SinkError> {
        match self {
            Self::Disabled => Ok(()),
            Self::Handler(handler) => {
                handler.on_record(sequence, consensus_timestamp, transaction, record)
            }
        }
    }

    pub fn signature(&mut self, path: &Path, signature: &[u8]) {
        if let Self::Handler(handler) = self {
            handler.on_signature(path, signature);
        }
    }

    pub fn file_complete(&mut self, path: &Path) {
        if let Self::Handler(handler) = self {
            handler.on_file_complete(path);
        }
    }
}

/// Default production handler: logs each decoded pair.
pub struct TracingHandler;

impl RecordHandler for TracingHandler {
    fn on_file_start(&mut self, path: &Path) {
        info!(file = %path.display(), "record file start");
    }

    fn on_record(
        &mut self,
        sequence: u64,
        consensus_timestamp: &ConsensusTimestamp,
        _transaction: &Transaction,
        record: &TransactionRecord,
    ) -> Result<(), SinkError> {
        info!(
            sequence,
            consensus = %consensus_timestamp,
            fee = record.transaction_fee,
            status = %record.status,
            "decoded record"
        );
        Ok(())
    }

    fn on_signature(&mut self, path: &Path, signature: &[u8]) {
        info!(
            file = %path.display(),
            sig_len = signature.len(),
            "file signature"
        );
    }

    fn on_file_complete(&mut self, path: &Path) {
        info!(file = %path.display(), "record file complete");
    }
}
