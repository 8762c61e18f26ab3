//! Batch sweep pipeline for the recstream auditor.
//!
//! Orchestrates reading an ordered batch of record files: decode each file,
//! compute its whole-file SHA-384 digest, validate the previous-hash chain
//! link against the prior file, hand decoded pairs to an injected record
//! sink, and move processed files into the archive directory.
//!
//! The sweep is single-threaded and sequential by design — digest chaining
//! makes file *N+1* depend on file *N* — and it never aborts the batch for
//! one file's problem.

pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod scan;
pub mod sink;

pub use error::{PipelineError, PipelineResult};
pub use outcome::{FileStatus, ProcessingOutcome, SweepReport};
pub use pipeline::{PipelineConfig, RecordFilePipeline, ARCHIVE_DIR_NAME};
pub use scan::collect_record_files;
pub use sink::{RecordHandler, RecordSink, SinkError, TracingHandler};

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use std::sync::atomic::AtomicBool;

    use recstream_chain::digest384;
    use recstream_codec::RecordFileWriter;
    use recstream_types::{
        ConsensusTimestamp, FileDigest, ReceiptStatus, Transaction, TransactionRecord,
    };

    use super::*;

    fn make_pair(seconds: i64) -> (Transaction, TransactionRecord) {
        (
            Transaction {
                body_bytes: format!("tx-{seconds}").into_bytes(),
                signature_map: vec![],
            },
            TransactionRecord {
                consensus_timestamp: ConsensusTimestamp::new(seconds, 0),
                transaction_hash: vec![0x1c; 48],
                memo: String::new(),
                transaction_fee: 11,
                status: ReceiptStatus::Success,
            },
        )
    }

    fn encode_file(previous: Option<FileDigest>, seconds: &[i64]) -> Vec<u8> {
        let mut writer = RecordFileWriter::new(2, 9);
        match previous {
            None => writer.zero_previous_hash(),
            Some(digest) => writer.previous_hash(&digest),
        }
        for &s in seconds {
            let (tx, rec) = make_pair(s);
            writer.add_pair(&tx, &rec).unwrap();
        }
        writer.signature(vec![0xe1; 64]);
        writer.finish()
    }

    /// Write `count` correctly chained files under `<root>/records/`.
    fn write_chain(root: &Path, count: usize) -> Vec<PathBuf> {
        let source = root.join("records");
        std::fs::create_dir_all(&source).unwrap();
        let mut paths = Vec::new();
        let mut prev: Option<FileDigest> = None;
        for i in 0..count {
            let bytes = encode_file(prev, &[100 * (i as i64 + 1), 100 * (i as i64 + 1) + 1]);
            let path = source.join(format!("interval-{i:02}.rcd"));
            std::fs::write(&path, &bytes).unwrap();
            prev = Some(digest384(&bytes));
            paths.push(path);
        }
        paths
    }

    fn pipeline(sink: RecordSink) -> RecordFilePipeline {
        RecordFilePipeline::new(PipelineConfig::default(), sink).unwrap()
    }

    #[test]
    fn end_to_end_three_chained_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_chain(dir.path(), 3);

        let report = pipeline(RecordSink::disabled()).sweep(&paths);

        assert_eq!(report.files_processed(), 3);
        assert!(report.mismatches.is_empty());
        assert!(report.is_clean());
        assert_eq!(report.pairs_decoded(), 6);
        assert_eq!(report.files_relocated(), 3);

        let archive = dir.path().join(ARCHIVE_DIR_NAME);
        for i in 0..3 {
            let archived = archive.join(format!("interval-{i:02}.rcd"));
            assert!(archived.is_file(), "missing {archived:?}");
        }
        for path in &paths {
            assert!(!path.exists(), "source not moved: {path:?}");
        }
    }

    #[test]
    fn tampered_declaration_reports_one_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("records");
        std::fs::create_dir_all(&source).unwrap();

        let f1 = encode_file(None, &[100]);
        // f2 declares a digest that is not digest(f1).
        let f2 = encode_file(Some(digest384(b"not the real predecessor")), &[200]);
        // f3 correctly declares the digest of f2's actual (tampered) bytes.
        let f3 = encode_file(Some(digest384(&f2)), &[300]);

        let paths: Vec<PathBuf> = [("01", &f1), ("02", &f2), ("03", &f3)]
            .iter()
            .map(|(name, bytes)| {
                let path = source.join(format!("{name}.rcd"));
                std::fs::write(&path, bytes).unwrap();
                path
            })
            .collect();

        let report = pipeline(RecordSink::disabled()).sweep(&paths);
        assert_eq!(report.mismatches.len(), 1);
        let mismatch = &report.mismatches[0];
        assert_eq!(mismatch.prev_name, "01.rcd");
        assert_eq!(mismatch.name, "02.rcd");
        assert_eq!(mismatch.computed, digest384(&f1));
        // The break never stops the batch: all three files still archived.
        assert_eq!(report.files_relocated(), 3);
    }

    #[test]
    fn missing_file_is_skipped_without_breaking_the_chain() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = write_chain(dir.path(), 2);
        paths.insert(1, dir.path().join("records").join("ghost.rcd"));

        let report = pipeline(RecordSink::disabled()).sweep(&paths);
        assert_eq!(report.files_processed(), 3);
        assert_eq!(report.outcomes[1].status, FileStatus::Missing);
        assert!(!report.outcomes[1].relocated);
        // The two real files still form an intact chain around the gap.
        assert!(report.mismatches.is_empty());
    }

    #[test]
    fn truncated_file_keeps_prior_pairs_and_is_archived() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("records");
        std::fs::create_dir_all(&source).unwrap();

        let full = encode_file(None, &[100, 200]);
        // Drop the trailing signature block's tail: decoding stops there.
        let cut = full.len() - 5;
        let path = source.join("torn.rcd");
        std::fs::write(&path, &full[..cut]).unwrap();

        let report = pipeline(RecordSink::disabled()).sweep(&[path.clone()]);
        let outcome = &report.outcomes[0];
        assert!(matches!(outcome.status, FileStatus::Partial(_)));
        assert_eq!(outcome.pairs_decoded, 2);
        assert!(outcome.relocated);
        assert!(!path.exists());
    }

    #[test]
    fn header_truncated_file_fails_but_batch_continues() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("records");
        std::fs::create_dir_all(&source).unwrap();

        let stub = source.join("stub.rcd");
        std::fs::write(&stub, &[0u8; 3]).unwrap();
        let good = encode_file(None, &[100]);
        let good_path = source.join("good.rcd");
        std::fs::write(&good_path, &good).unwrap();

        let report =
            pipeline(RecordSink::disabled()).sweep(&[stub.clone(), good_path.clone()]);
        assert!(matches!(report.outcomes[0].status, FileStatus::Failed(_)));
        assert_eq!(report.outcomes[0].pairs_decoded, 0);
        // Failed files are not archived; the batch still processed the rest.
        assert!(stub.exists());
        assert!(matches!(report.outcomes[1].status, FileStatus::Decoded));
    }

    #[derive(Default)]
    struct Collected {
        rows: Vec<(u64, ConsensusTimestamp)>,
        signatures: usize,
        completed: usize,
    }

    struct CollectingHandler(Rc<RefCell<Collected>>);

    impl RecordHandler for CollectingHandler {
        fn on_record(
            &mut self,
            sequence: u64,
            consensus_timestamp: &ConsensusTimestamp,
            _transaction: &Transaction,
            _record: &TransactionRecord,
        ) -> Result<(), SinkError> {
            self.0.borrow_mut().rows.push((sequence, *consensus_timestamp));
            Ok(())
        }

        fn on_signature(&mut self, _path: &Path, _signature: &[u8]) {
            self.0.borrow_mut().signatures += 1;
        }

        fn on_file_complete(&mut self, _path: &Path) {
            self.0.borrow_mut().completed += 1;
        }
    }

    #[test]
    fn sink_receives_pairs_in_order_with_per_file_sequences() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_chain(dir.path(), 2);

        let collected = Rc::new(RefCell::new(Collected::default()));
        let sink = RecordSink::handler(CollectingHandler(collected.clone()));
        let report = pipeline(sink).sweep(&paths);
        assert!(report.is_clean());

        let collected = collected.borrow();
        let sequences: Vec<u64> = collected.rows.iter().map(|(s, _)| *s).collect();
        assert_eq!(sequences, vec![1, 2, 1, 2]);
        let timestamps: Vec<i64> = collected.rows.iter().map(|(_, ts)| ts.seconds).collect();
        assert_eq!(timestamps, vec![100, 101, 200, 201]);
        assert_eq!(collected.signatures, 2);
        assert_eq!(collected.completed, 2);
    }

    struct RefusingHandler;

    impl RecordHandler for RefusingHandler {
        fn on_record(
            &mut self,
            sequence: u64,
            _consensus_timestamp: &ConsensusTimestamp,
            _transaction: &Transaction,
            _record: &TransactionRecord,
        ) -> Result<(), SinkError> {
            Err(SinkError(format!("no room for {sequence}")))
        }
    }

    #[test]
    fn sink_failures_are_counted_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_chain(dir.path(), 1);

        let report = pipeline(RecordSink::handler(RefusingHandler)).sweep(&paths);
        assert_eq!(report.outcomes[0].sink_failures, 2);
        assert!(matches!(report.outcomes[0].status, FileStatus::Decoded));
        assert!(report.outcomes[0].relocated);
    }

    #[test]
    fn relocation_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_chain(dir.path(), 2);

        let mut pipeline = RecordFilePipeline::new(
            PipelineConfig {
                archive_dir: None,
                relocate: false,
            },
            RecordSink::disabled(),
        )
        .unwrap();
        let report = pipeline.sweep(&paths);
        assert_eq!(report.files_relocated(), 0);
        for path in &paths {
            assert!(path.exists());
        }
    }

    #[test]
    fn cancellation_stops_between_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_chain(dir.path(), 3);

        let cancel = AtomicBool::new(true);
        let report = pipeline(RecordSink::disabled()).sweep_with_cancel(&paths, &cancel);
        assert_eq!(report.files_processed(), 0);
        for path in &paths {
            assert!(path.exists());
        }
    }

    #[test]
    fn configured_archive_dir_receives_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_chain(dir.path(), 2);
        let archive = dir.path().join("custom-archive");

        let mut pipeline = RecordFilePipeline::new(
            PipelineConfig {
                archive_dir: Some(archive.clone()),
                relocate: true,
            },
            RecordSink::disabled(),
        )
        .unwrap();
        let report = pipeline.sweep(&paths);
        assert_eq!(report.files_relocated(), 2);
        assert!(archive.join("interval-00.rcd").is_file());
        assert!(archive.join("interval-01.rcd").is_file());
    }
}
