use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::warn;

use crate::error::{PipelineError, PipelineResult};

/// List the record files in a source directory, in processing order.
///
/// Non-recursive. Regular files only, optionally filtered by extension
/// (without the leading dot). Ordered by modification time, then by path,
/// which for interval-named record files is the order the node wrote them —
/// the order chain validation requires.
pub fn collect_record_files(
    dir: &Path,
    extension: Option<&str>,
) -> PipelineResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| PipelineError::SourceDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::SourceDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }
        if let Some(wanted) = extension {
            if path.extension().map(|e| e == wanted) != Some(true) {
                continue;
            }
        }

        let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
        files.push((modified, path));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}
