//! Source set resolution.
//!
//! Expands the construction-time glob pattern into the fixed, ordered
//! list of files a [`LineSource`](super::LineSource) iterates over. The
//! pattern is resolved exactly once; filesystem changes after that are
//! not observed.

use std::path::PathBuf;

use snafu::ResultExt;
use tracing::{debug, warn};

use crate::error::{PatternSnafu, SourceError};

/// Expand `pattern` and return the matches sorted ascending by their OS
/// string representation.
///
/// Entries the filesystem walk could not read are skipped with a warning.
/// An empty result is valid; only a malformed pattern is an error.
pub(super) fn resolve(pattern: &str) -> Result<Vec<PathBuf>, SourceError> {
    let entries = glob::glob(pattern).context(PatternSnafu { pattern })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => {
                warn!(path = %e.path().display(), error = %e, "Skipping unreadable path during resolution");
            }
        }
    }

    // Byte order over the whole path string, not component-wise Path order.
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));

    debug!(pattern, files = files.len(), "Resolved source pattern");
    Ok(files)
}
