//! Error types for the linesource crate.

use snafu::prelude::*;

/// Errors that can occur while constructing a line source.
///
/// Everything after construction is handled by the skip-and-continue
/// policy: files that fail to open or read are logged and passed over,
/// so iteration itself never surfaces an error value.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SourceError {
    /// The glob pattern could not be parsed.
    #[snafu(display("Invalid glob pattern {pattern}: {source}"))]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
}
