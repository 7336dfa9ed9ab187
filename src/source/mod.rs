//! Source coordinator for streaming lines out of matched files.
//!
//! Split across three parts: pattern resolution into a fixed file set,
//! per-file decoder selection, and the cursor that pulls lines across
//! file boundaries.

mod decoder;
mod listing;
mod reader;

pub use reader::{BoundaryHook, LineSource, LineSourceBuilder, SourcePosition};
