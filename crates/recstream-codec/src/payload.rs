//! Payload boundary: the embedded transaction/record byte ranges are decoded
//! with the external message-format library (bincode) and nothing else. No
//! semantic validation of the decoded values happens here.

use recstream_types::{Transaction, TransactionRecord};

use crate::error::{CodecError, CodecResult};

/// Deserialize a transaction from its raw block bytes.
pub fn decode_transaction(bytes: &[u8]) -> CodecResult<Transaction> {
    bincode::deserialize(bytes).map_err(|e| CodecError::MalformedPayload {
        reason: e.to_string(),
    })
}

/// Deserialize a transaction record from its raw block bytes.
pub fn decode_transaction_record(bytes: &[u8]) -> CodecResult<TransactionRecord> {
    bincode::deserialize(bytes).map_err(|e| CodecError::MalformedPayload {
        reason: e.to_string(),
    })
}

/// Serialize a transaction to its wire bytes (writer/test support).
pub fn encode_transaction(transaction: &Transaction) -> CodecResult<Vec<u8>> {
    bincode::serialize(transaction).map_err(|e| CodecError::MalformedPayload {
        reason: e.to_string(),
    })
}

/// Serialize a transaction record to its wire bytes (writer/test support).
pub fn encode_transaction_record(record: &TransactionRecord) -> CodecResult<Vec<u8>> {
    bincode::serialize(record).map_err(|e| CodecError::MalformedPayload {
        reason: e.to_string(),
    })
}
