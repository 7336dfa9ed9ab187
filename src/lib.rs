//! linesource: stream lines from many files as one continuous sequence.
//!
//! This library presents every file matched by a glob pattern as a single
//! ordered stream of lines. It handles:
//! - Resolving the pattern once into a fixed, path-sorted file set
//! - Reading plain and gzip-compressed files through one cursor
//! - Discarding a configured number of header lines per file
//! - Firing hooks at file boundaries
//! - Skipping unreadable files without interrupting the stream
//!
//! # Example
//!
//! ```ignore
//! use linesource::LineSource;
//!
//! let mut source = LineSource::builder("logs/app-*.log.gz")
//!     .skip_lines(1)
//!     .on_file_opened(|pos| println!("reading {}", pos.path.display()))
//!     .open()?;
//!
//! for line in source {
//!     print!("{line}");
//! }
//! ```

pub mod error;
pub mod source;

// Re-export main types
pub use error::SourceError;
pub use source::{BoundaryHook, LineSource, LineSourceBuilder, SourcePosition};
