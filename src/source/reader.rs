//! Multi-file line streaming.
//!
//! [`LineSource`] presents every file matched by a glob pattern as one
//! continuous sequence of lines. Files are visited in path order, gzip
//! members are expanded transparently, configured header lines are
//! discarded at each file open, and files that cannot be opened or read
//! are logged and skipped without interrupting the stream.

use std::fmt;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{decoder, listing};
use crate::error::SourceError;

/// Callback invoked at file boundaries.
pub type BoundaryHook = Box<dyn FnMut(&SourcePosition<'_>) + Send>;

/// Snapshot of the cursor state handed to boundary hooks.
#[derive(Debug, Clone, Copy)]
pub struct SourcePosition<'a> {
    /// The file the cursor is positioned on.
    pub path: &'a Path,
    /// Zero-based index of that file within the resolved set.
    pub index: usize,
    /// Lines consumed from that file so far, counting skipped header lines.
    pub line_number: u64,
}

/// Where the cursor stands within the resolved file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Before the first file: freshly built over an empty set is never
    /// here (construction advances immediately), but an explicit close
    /// rewinds to this state.
    Unpositioned,
    /// Reading the file at this index.
    Current(usize),
    /// Past the last file. Terminal for iteration.
    Exhausted,
}

/// Builder for [`LineSource`].
pub struct LineSourceBuilder {
    pattern: String,
    skip_lines: u64,
    on_file_opened: Option<BoundaryHook>,
    on_file_closed: Option<BoundaryHook>,
}

impl LineSourceBuilder {
    /// Number of header lines to discard at the start of every file.
    pub fn skip_lines(mut self, count: u64) -> Self {
        self.skip_lines = count;
        self
    }

    /// Hook fired after a file is opened, before any of its lines are
    /// produced.
    pub fn on_file_opened<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&SourcePosition<'_>) + Send + 'static,
    {
        self.on_file_opened = Some(Box::new(hook));
        self
    }

    /// Hook fired when an opened file is left behind, after its last
    /// produced line.
    pub fn on_file_closed<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&SourcePosition<'_>) + Send + 'static,
    {
        self.on_file_closed = Some(Box::new(hook));
        self
    }

    /// Resolve the pattern and position the source on its first readable
    /// file.
    ///
    /// Fails only on a malformed pattern. An empty match yields a valid,
    /// already-exhausted source.
    pub fn open(self) -> Result<LineSource, SourceError> {
        let files = listing::resolve(&self.pattern)?;
        let mut source = LineSource {
            files,
            skip_lines: self.skip_lines,
            position: Position::Unpositioned,
            reader: None,
            line_number: 0,
            last_line: None,
            on_file_opened: self.on_file_opened,
            on_file_closed: self.on_file_closed,
        };
        source.next_file();
        Ok(source)
    }
}

/// Streams lines from every file matched by a glob pattern, in path
/// order, as one continuous sequence.
///
/// Construction resolves the pattern once and opens the first readable
/// file. Lines are pulled lazily with [`next_line`](Self::next_line) or
/// through the [`Iterator`] implementation; the end of one file silently
/// rolls over to the next.
///
/// # Example
///
/// ```
/// use linesource::LineSource;
///
/// # fn main() -> Result<(), linesource::SourceError> {
/// let mut source = LineSource::builder("logs/*.log").skip_lines(1).open()?;
/// while let Some(line) = source.next_line() {
///     print!("{line}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct LineSource {
    files: Vec<PathBuf>,
    skip_lines: u64,
    position: Position,
    reader: Option<Box<dyn BufRead + Send>>,
    line_number: u64,
    last_line: Option<String>,
    on_file_opened: Option<BoundaryHook>,
    on_file_closed: Option<BoundaryHook>,
}

impl LineSource {
    /// Open a source over `pattern` with default settings.
    pub fn open(pattern: impl Into<String>) -> Result<Self, SourceError> {
        Self::builder(pattern).open()
    }

    /// Start configuring a source over `pattern`.
    pub fn builder(pattern: impl Into<String>) -> LineSourceBuilder {
        LineSourceBuilder {
            pattern: pattern.into(),
            skip_lines: 0,
            on_file_opened: None,
            on_file_closed: None,
        }
    }

    /// Produce the next line, rolling over to the next file as needed.
    ///
    /// The returned line keeps its terminator exactly as stored; the
    /// final line of a file arrives without one if the file does not end
    /// in a newline. Returns `None` at end of data, permanently and
    /// without side effects on repeated calls. A failed read (truncated
    /// gzip data, bytes that are not valid UTF-8) abandons the rest of
    /// that file with a logged warning and continues with the next one.
    pub fn next_line(&mut self) -> Option<String> {
        self.last_line = None;

        loop {
            let reader = self.reader.as_mut()?;
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => {}
                Ok(_) => {
                    self.line_number += 1;
                    self.last_line = Some(line.clone());
                    return Some(line);
                }
                Err(e) => {
                    if let Position::Current(index) = self.position {
                        warn!(path = %self.files[index].display(), error = %e, "Read failed, skipping rest of file");
                    }
                }
            }
            self.next_file()?;
        }
    }

    /// Leave the current file and open the next one in the set.
    ///
    /// Files that fail to open (missing, unreadable, corrupt gzip
    /// header) are logged and skipped. Returns the path of the newly
    /// current file, or `None` once the set is exhausted; further calls
    /// keep returning `None`. After an explicit [`close`](Self::close)
    /// the cursor sits before the first file again, so this reopens the
    /// start of the same resolved set.
    pub fn next_file(&mut self) -> Option<&Path> {
        self.leave_current_file();

        let mut next = match self.position {
            Position::Unpositioned => 0,
            Position::Current(index) => index + 1,
            Position::Exhausted => return None,
        };

        while next < self.files.len() {
            match self.open_file(next) {
                Ok(reader) => {
                    self.reader = Some(reader);
                    self.position = Position::Current(next);
                    self.fire_opened();
                    return self.path();
                }
                Err(e) => {
                    warn!(path = %self.files[next].display(), error = %e, "Could not open file, skipping");
                    next += 1;
                }
            }
        }

        self.position = Position::Exhausted;
        None
    }

    /// Close the current file, if any, and rewind the cursor to before
    /// the first file.
    ///
    /// Fires the on-file-closed hook for a still-open file. Afterwards
    /// the accessors report no position and [`next_line`](Self::next_line)
    /// stays at end of data, but an explicit [`next_file`](Self::next_file)
    /// starts over at the first file of the same resolved set; the
    /// pattern is never re-resolved. Closing an already-closed source is
    /// a no-op. Dropping the source releases the handle without firing
    /// hooks.
    pub fn close(&mut self) {
        self.leave_current_file();
        self.position = Position::Unpositioned;
        self.last_line = None;
    }

    /// Path of the current file, or `None` when no file is current.
    pub fn path(&self) -> Option<&Path> {
        match self.position {
            Position::Current(index) => Some(&self.files[index]),
            _ => None,
        }
    }

    /// Size in bytes of the current file as stored on disk, or `None`
    /// when no file is current or the size cannot be read.
    ///
    /// For gzip files this is the compressed size, not the expanded one.
    pub fn file_size(&self) -> Option<u64> {
        let metadata = std::fs::metadata(self.path()?).ok()?;
        Some(metadata.len())
    }

    /// Lines consumed from the current file so far, counting skipped
    /// header lines, or `None` when no file is current.
    pub fn line_number(&self) -> Option<u64> {
        match self.position {
            Position::Current(_) => Some(self.line_number),
            _ => None,
        }
    }

    /// The most recently produced line, retained until the next pull.
    pub fn last_line(&self) -> Option<&str> {
        self.last_line.as_deref()
    }

    /// Whether the current file has no further bytes to produce.
    ///
    /// `true` when no file is current. Peeks at the decoded stream
    /// without consuming anything.
    pub fn is_eof(&mut self) -> bool {
        match self.reader.as_mut() {
            Some(reader) => reader.fill_buf().map_or(true, |buf| buf.is_empty()),
            None => true,
        }
    }

    /// The resolved file set, in visiting order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Open the file at `index` and consume its header lines.
    ///
    /// The stream is probed with one `fill_buf` before the skip so that
    /// gzip header problems fail the open instead of the first line pull.
    fn open_file(&mut self, index: usize) -> io::Result<Box<dyn BufRead + Send>> {
        let path = &self.files[index];
        let decoder = decoder::for_path(path);
        let mut reader = decoder.open(path)?;
        reader.fill_buf()?;

        self.line_number = self.skip_lines;
        let mut discard = Vec::new();
        for _ in 0..self.skip_lines {
            discard.clear();
            if reader.read_until(b'\n', &mut discard)? == 0 {
                break;
            }
        }

        debug!(path = %path.display(), decoder = decoder.name(), "Opened source file");
        Ok(reader)
    }

    /// Fire the closed hook and drop the handle, leaving the position
    /// untouched so the caller can compute the successor index.
    fn leave_current_file(&mut self) {
        if self.reader.is_some() {
            self.fire_closed();
            self.reader = None;
            if let Position::Current(index) = self.position {
                debug!(path = %self.files[index].display(), lines = self.line_number, "Finished source file");
            }
        }
    }

    fn fire_opened(&mut self) {
        if let Position::Current(index) = self.position
            && let Some(hook) = self.on_file_opened.as_mut()
        {
            hook(&SourcePosition {
                path: &self.files[index],
                index,
                line_number: self.line_number,
            });
        }
    }

    fn fire_closed(&mut self) {
        if let Position::Current(index) = self.position
            && let Some(hook) = self.on_file_closed.as_mut()
        {
            hook(&SourcePosition {
                path: &self.files[index],
                index,
                line_number: self.line_number,
            });
        }
    }
}

impl Iterator for LineSource {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_line()
    }
}

impl fmt::Debug for LineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineSource")
            .field("files", &self.files.len())
            .field("skip_lines", &self.skip_lines)
            .field("position", &self.position)
            .field("line_number", &self.line_number)
            .finish_non_exhaustive()
    }
}
