//! Decoder selection for plain and gzip-compressed source files.
//!
//! Each file is decoded by exactly one decoder, chosen once at open time
//! from the filename suffix: a name ending in `.gz` selects gzip,
//! anything else is read as plain text. Contents are never sniffed.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Trait for decoders that open a file as a buffered line stream.
pub(super) trait Decoder: Send + Sync {
    /// Open the file behind a decoding `BufRead`.
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>>;

    /// Human-readable name of this decoder (for logging).
    fn name(&self) -> &'static str;
}

/// Reads uncompressed text as-is.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct PlainDecoder;

impl Decoder for PlainDecoder {
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

/// Gzip decoder using flate2.
///
/// Reads the first gzip member of the file. Header errors only surface on
/// the first read, not here, so callers probe the stream before treating
/// the file as opened.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct GzipDecoder;

impl Decoder for GzipDecoder {
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
        Ok(Box::new(BufReader::new(flate2::read::GzDecoder::new(
            File::open(path)?,
        ))))
    }

    fn name(&self) -> &'static str {
        "gzip"
    }
}

/// Select the decoder for a path from its filename suffix.
pub(super) fn for_path(path: &Path) -> &'static dyn Decoder {
    // Suffix match on the name itself; `Path::extension` would miss a
    // file named exactly `.gz`.
    if path
        .file_name()
        .is_some_and(|name| name.as_encoded_bytes().ends_with(b".gz"))
    {
        &GzipDecoder
    } else {
        &PlainDecoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    fn make_gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_selects_gzip_for_gz_suffix() {
        assert_eq!(for_path(Path::new("logs/app.log.gz")).name(), "gzip");
        assert_eq!(for_path(Path::new("archive.gz")).name(), "gzip");
        assert_eq!(for_path(Path::new(".gz")).name(), "gzip");
        assert_eq!(for_path(Path::new("logs/.gz")).name(), "gzip");
    }

    #[test]
    fn test_selects_plain_otherwise() {
        assert_eq!(for_path(Path::new("app.log")).name(), "plain");
        assert_eq!(for_path(Path::new("notes.gzip")).name(), "plain");
        assert_eq!(for_path(Path::new("gz")).name(), "plain");
    }

    #[test]
    fn test_suffix_match_is_case_sensitive() {
        assert_eq!(for_path(Path::new("upper.GZ")).name(), "plain");
    }

    #[test]
    fn test_plain_decoder_reads_file_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, b"alpha\nbeta\n").unwrap();

        let mut reader = PlainDecoder.open(&path).unwrap();
        let mut content = String::new();
        reader.read_to_string(&mut content).unwrap();

        assert_eq!(content, "alpha\nbeta\n");
    }

    #[test]
    fn test_gzip_decoder_expands_compressed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt.gz");
        std::fs::write(&path, make_gzip(b"alpha\nbeta\n")).unwrap();

        let mut reader = GzipDecoder.open(&path).unwrap();
        let mut content = String::new();
        reader.read_to_string(&mut content).unwrap();

        assert_eq!(content, "alpha\nbeta\n");
    }

    #[test]
    fn test_gzip_decoder_fails_on_garbage_at_first_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt.gz");
        std::fs::write(&path, b"not gzip at all").unwrap();

        let mut reader = GzipDecoder.open(&path).unwrap();
        let mut content = String::new();
        assert!(reader.read_to_string(&mut content).is_err());
    }

    #[test]
    fn test_decoder_names() {
        assert_eq!(PlainDecoder.name(), "plain");
        assert_eq!(GzipDecoder.name(), "gzip");
    }
}
