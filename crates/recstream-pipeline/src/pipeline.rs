use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use recstream_chain::{digest384, ChainCursor, ChainMismatch};
use recstream_codec::RecordFile;

use crate::error::{PipelineError, PipelineResult};
use crate::outcome::{FileStatus, ProcessingOutcome, SweepReport};
use crate::sink::RecordSink;

/// Name of the archive directory record files are moved into.
pub const ARCHIVE_DIR_NAME: &str = "parsedRecordFiles";

/// Pipeline configuration.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Archive directory override. `None` derives the sibling
    /// `parsedRecordFiles` directory from each file's location.
    pub archive_dir: Option<PathBuf>,
    /// Whether processed files are moved into the archive at all.
    pub relocate: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            archive_dir: None,
            relocate: true,
        }
    }
}

/// Sequential batch sweep over an ordered list of record files.
///
/// Files are processed strictly in the caller-supplied order because chain
/// validation is a hard data dependency between consecutive files: file
/// *N+1* cannot be checked until file *N*'s digest is known. One file's
/// problem never halts the batch — the sweep is a best-effort pass that
/// maximizes the amount of recoverable audit information.
pub struct RecordFilePipeline {
    config: PipelineConfig,
    sink: RecordSink,
}

impl std::fmt::Debug for RecordFilePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordFilePipeline")
            .field("config", &self.config)
            .field("sink_disabled", &self.sink.is_disabled())
            .finish()
    }
}

impl RecordFilePipeline {
    /// Create a pipeline.
    ///
    /// An explicitly configured archive directory that cannot be created is
    /// the one startup condition escalated as a hard error.
    pub fn new(config: PipelineConfig, sink: RecordSink) -> PipelineResult<Self> {
        if let Some(dir) = &config.archive_dir {
            std::fs::create_dir_all(dir).map_err(|e| PipelineError::Archive {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(Self { config, sink })
    }

    /// Sweep a batch of record files in order.
    pub fn sweep(&mut self, paths: &[PathBuf]) -> SweepReport {
        self.sweep_with_cancel(paths, &AtomicBool::new(false))
    }

    /// Sweep with cooperative cancellation, checked between files.
    ///
    /// Outcomes already produced and files already relocated stay valid;
    /// there is no rollback of partial progress.
    pub fn sweep_with_cancel(&mut self, paths: &[PathBuf], cancel: &AtomicBool) -> SweepReport {
        let mut cursor = ChainCursor::new();
        let mut outcomes = Vec::with_capacity(paths.len());
        let mut mismatches = Vec::new();

        for path in paths {
            if cancel.load(Ordering::Relaxed) {
                info!(
                    processed = outcomes.len(),
                    remaining = paths.len() - outcomes.len(),
                    "sweep cancelled between files"
                );
                break;
            }
            outcomes.push(self.process_file(path, &mut cursor, &mut mismatches));
        }

        SweepReport {
            outcomes,
            mismatches,
        }
    }

    fn process_file(
        &mut self,
        path: &Path,
        cursor: &mut ChainCursor,
        mismatches: &mut Vec<ChainMismatch>,
    ) -> ProcessingOutcome {
        let name = file_name(path);
        let mut outcome = ProcessingOutcome {
            path: path.to_path_buf(),
            status: FileStatus::Missing,
            digest: None,
            pairs_decoded: 0,
            pairs_skipped: 0,
            sink_failures: 0,
            relocated: false,
        };

        if !path.exists() {
            info!(file = %path.display(), "record file does not exist; skipping");
            return outcome;
        }

        // The digest covers the file's exact raw bytes, read independently
        // of the decode pass, which may stop early on a defect.
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "cannot read record file");
                outcome.status = FileStatus::Failed(e.to_string());
                return outcome;
            }
        };
        let digest = digest384(&bytes);
        outcome.digest = Some(digest);

        match RecordFile::from_bytes(&bytes) {
            Ok(file) => {
                outcome.status = match &file.defect {
                    None => FileStatus::Decoded,
                    Some(defect) => FileStatus::Partial(*defect),
                };
                outcome.pairs_decoded = file.pairs.len();
                outcome.pairs_skipped = file.skipped.len();
                outcome.sink_failures = self.dispatch(path, &file);

                if let Some(mismatch) = cursor.observe(&name, &file.previous_hash, digest) {
                    mismatches.push(mismatch);
                }
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "record file yielded nothing");
                outcome.status = FileStatus::Failed(e.to_string());
                // The file still anchors the chain for its successor; its
                // own declaration is unreadable, which the cursor reports
                // as a missing link.
                if let Some(mismatch) =
                    cursor.observe(&name, &recstream_types::PreviousHash::Absent, digest)
                {
                    mismatches.push(mismatch);
                }
            }
        }

        if self.config.relocate && outcome.status.produced_content() {
            outcome.relocated = self.relocate(path, &name);
        }

        info!(
            file = %name,
            digest = %digest.short_hex(),
            pairs = outcome.pairs_decoded,
            relocated = outcome.relocated,
            "record file processed"
        );
        outcome
    }

    /// Dispatch a decoded file's contents to the sink. Returns the number
    /// of records the sink refused.
    fn dispatch(&mut self, path: &Path, file: &RecordFile) -> usize {
        self.sink.file_start(path);
        let mut failures = 0;
        for (index, pair) in file.pairs.iter().enumerate() {
            let sequence = index as u64 + 1;
            if let Err(e) = self.sink.record(
                sequence,
                &pair.record.consensus_timestamp,
                &pair.transaction,
                &pair.record,
            ) {
                warn!(file = %path.display(), sequence, error = %e, "sink refused record");
                failures += 1;
            }
        }
        if let Some(signature) = &file.signature {
            self.sink.signature(path, signature);
        }
        self.sink.file_complete(path);
        failures
    }

    /// Move a processed file into the archive, preserving its name.
    /// Returns `true` on success; failures are logged, never fatal.
    fn relocate(&self, path: &Path, name: &str) -> bool {
        let archive_dir = self.archive_dir_for(path);
        if let Err(e) = std::fs::create_dir_all(&archive_dir) {
            warn!(
                file = %path.display(),
                archive = %archive_dir.display(),
                error = %e,
                "cannot create archive directory; file left in place"
            );
            return false;
        }

        let dest = archive_dir.join(name);
        match move_file(path, &dest) {
            Ok(()) => {
                info!(file = %path.display(), dest = %dest.display(), "archived");
                true
            }
            Err(e) => {
                warn!(
                    file = %path.display(),
                    dest = %dest.display(),
                    error = %e,
                    "relocation failed; file left in place"
                );
                false
            }
        }
    }

    fn archive_dir_for(&self, path: &Path) -> PathBuf {
        if let Some(dir) = &self.config.archive_dir {
            return dir.clone();
        }
        // Sibling of the file's directory: <dir>/../parsedRecordFiles.
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        parent
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(ARCHIVE_DIR_NAME)
    }
}

/// Rename with overwrite semantics, falling back to copy-and-remove for
/// archive directories on a different filesystem.
fn move_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    match std::fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            std::fs::copy(source, dest)?;
            std::fs::remove_file(source)
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
