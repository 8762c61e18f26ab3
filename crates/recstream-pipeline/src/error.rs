use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors escalated out of the pipeline as hard failures.
///
/// Everything else the sweep encounters — missing files, decode defects,
/// chain breaks, relocation problems — is absorbed into the per-file
/// outcomes and logged.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// I/O error outside any single file's processing.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The configured archive directory cannot be created at startup.
    #[error("cannot prepare archive directory {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The batch's source directory cannot be read.
    #[error("cannot read source directory {}: {source}", path.display())]
    SourceDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
