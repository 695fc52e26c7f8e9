//! Bounded-memory file primitives.
//!
//! Every operation streams the file through a [`reader::LineReader`] rather
//! than loading it, so memory use tracks the longest line and the search
//! window, not the file size. Mutations are written to a sibling temporary
//! file that is renamed over the target only once it is complete; the
//! temporary file is removed on every failure path when it is dropped.

mod commit;
mod reader;

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::encoding::{EncodingError, TextEncoding};

pub use commit::write_atomic;

use reader::LineReader;

/// Hard ceiling on the size of any file the primitives touch.
pub const MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Largest file [`LargeFileOps::read_range`] returns in one read.
pub const MAX_FULL_READ_SIZE: u64 = 100 * 1024 * 1024;

/// Leading bytes inspected when deciding whether a file is text.
pub const SNIFF_BYTES: u64 = 8 * 1024;

/// Errors raised by the file primitives.
#[derive(Debug, Error)]
pub enum FileOpsError {
    /// The file does not exist.
    #[error("file not found: {path}")]
    NotFound {
        /// Missing file.
        path: PathBuf,
    },

    /// The file exceeds the size ceiling.
    #[error("file {path} is {size} bytes, above the {limit} byte limit")]
    TooLarge {
        /// Offending file.
        path: PathBuf,
        /// File size in bytes.
        size: u64,
        /// Ceiling in bytes.
        limit: u64,
    },

    /// The file is not text.
    #[error("file {path} does not look like text")]
    InvalidFileType {
        /// Offending file.
        path: PathBuf,
    },

    /// The search text does not occur in the file.
    #[error("no match in {path}")]
    NoMatch {
        /// Searched file.
        path: PathBuf,
    },

    /// The search text occurs more than once.
    #[error("multiple occurrences found in lines {lines:?}")]
    Ambiguous {
        /// Searched file.
        path: PathBuf,
        /// One-based line of each occurrence.
        lines: Vec<usize>,
    },

    /// A line number lies beyond the end of the file.
    #[error("line {line} is outside {path}, which has {total} lines")]
    LineOutOfRange {
        /// Examined file.
        path: PathBuf,
        /// Requested line.
        line: usize,
        /// Number of lines in the file.
        total: usize,
    },

    /// The content is not valid in the file's encoding.
    #[error("failed to transcode {path}: {source}")]
    Decode {
        /// Affected file.
        path: PathBuf,
        /// Encoding failure.
        #[source]
        source: EncodingError,
    },

    /// An I/O operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Affected file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl FileOpsError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn decode(path: &Path, source: EncodingError) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The single occurrence of a search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMatch {
    /// One-based line on which the occurrence starts.
    pub line: usize,
    /// Matched text, followed by `'\n'` when the match ends a line.
    pub text: String,
}

/// Streaming file primitives with configurable limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LargeFileOps {
    max_file_size: u64,
    max_full_read_size: u64,
}

impl Default for LargeFileOps {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            max_full_read_size: MAX_FULL_READ_SIZE,
        }
    }
}

impl LargeFileOps {
    /// Primitives with the default 1 GiB ceiling and 100 MiB full-read size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitives with custom limits. The ceiling never exceeds
    /// [`MAX_FILE_SIZE`].
    #[must_use]
    pub fn with_limits(max_file_size: u64, max_full_read_size: u64) -> Self {
        Self {
            max_file_size: max_file_size.min(MAX_FILE_SIZE),
            max_full_read_size,
        }
    }

    /// Effective size ceiling in bytes.
    #[must_use]
    pub const fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Checks that `path` is an existing text file within the size ceiling
    /// and returns its size.
    ///
    /// A file is treated as binary when its first [`SNIFF_BYTES`] contain a
    /// NUL byte, unless it starts with a UTF-16 byte order mark.
    ///
    /// # Errors
    ///
    /// Returns [`FileOpsError::NotFound`], [`FileOpsError::TooLarge`] or
    /// [`FileOpsError::InvalidFileType`] before any content is read beyond
    /// the sniffed prefix.
    pub fn validate(&self, path: &Path) -> Result<u64, FileOpsError> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(FileOpsError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => return Err(FileOpsError::io(path, source)),
        };
        if !metadata.is_file() {
            return Err(FileOpsError::InvalidFileType {
                path: path.to_path_buf(),
            });
        }

        let size = metadata.len();
        if size > self.max_file_size {
            return Err(FileOpsError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.max_file_size,
            });
        }

        let mut head = Vec::new();
        File::open(path)
            .and_then(|file| file.take(SNIFF_BYTES).read_to_end(&mut head))
            .map_err(|source| FileOpsError::io(path, source))?;
        let utf16 = TextEncoding::from_bom(&head).is_some_and(|encoding| encoding.is_utf16());
        if !utf16 && memchr::memchr(0, &head).is_some() {
            return Err(FileOpsError::InvalidFileType {
                path: path.to_path_buf(),
            });
        }
        Ok(size)
    }

    /// Counts the lines of `path`, including an unterminated last line.
    ///
    /// # Errors
    ///
    /// Fails when the file is invalid or cannot be decoded.
    pub fn count_lines(&self, path: &Path, encoding: TextEncoding) -> Result<usize, FileOpsError> {
        self.validate(path)?;
        LineReader::open(path, encoding)?.count()
    }

    /// Finds the single occurrence of `needle` in `path`.
    ///
    /// Occurrences may span lines and may overlap. The file is scanned with
    /// a sliding window just large enough to hold any occurrence starting in
    /// its first line, so every occurrence is seen exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`FileOpsError::Ambiguous`] listing every matching line when
    /// `needle` occurs more than once, and validation or decoding errors.
    pub fn find_unique(
        &self,
        path: &Path,
        encoding: TextEncoding,
        needle: &str,
    ) -> Result<Option<ParsedMatch>, FileOpsError> {
        self.validate(path)?;
        if needle.is_empty() {
            return Ok(None);
        }

        let span = needle.matches('\n').count() + 2;
        let mut reader = LineReader::open(path, encoding)?;
        let mut window: VecDeque<String> = VecDeque::with_capacity(span);
        let mut search = Occurrences::new(needle);
        let mut first_line = 1;

        while let Some(line) = reader.next_line()? {
            window.push_back(line);
            if window.len() == span {
                search.scan(&window, first_line);
                window.pop_front();
                first_line += 1;
            }
        }
        while !window.is_empty() {
            search.scan(&window, first_line);
            window.pop_front();
            first_line += 1;
        }

        search.finish(path)
    }

    /// Reads lines `start..=end` (one-based) of `path`.
    ///
    /// Without a range, files up to the full-read size are returned as they
    /// are. Otherwise lines are streamed and each returned line is
    /// terminated with `'\n'`.
    ///
    /// # Errors
    ///
    /// Fails when the file is invalid or cannot be decoded.
    pub fn read_range(
        &self,
        path: &Path,
        encoding: TextEncoding,
        start: Option<usize>,
        end: Option<usize>,
    ) -> Result<String, FileOpsError> {
        let size = self.validate(path)?;
        if start.is_none() && end.is_none() && size <= self.max_full_read_size {
            let bytes = fs::read(path).map_err(|source| FileOpsError::io(path, source))?;
            return encoding
                .decode(&bytes)
                .map_err(|source| FileOpsError::decode(path, source));
        }

        let first = start.unwrap_or(1).max(1);
        let mut reader = LineReader::open(path, encoding)?;
        let mut text = String::new();
        let mut number = 0_usize;
        while let Some(line) = reader.next_line()? {
            number += 1;
            if end.is_some_and(|last| number > last) {
                break;
            }
            if number >= first {
                text.push_str(&line);
                if !line.ends_with('\n') {
                    text.push('\n');
                }
            }
        }
        Ok(text)
    }

    /// Replaces the single occurrence of `old` with `new` and returns where
    /// it was.
    ///
    /// Lines outside the match are copied through unchanged. The original
    /// file is untouched unless the final rename succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`FileOpsError::NoMatch`] or [`FileOpsError::Ambiguous`] when
    /// `old` is not unique, and I/O or encoding errors from the rewrite.
    pub fn replace_unique(
        &self,
        path: &Path,
        encoding: TextEncoding,
        old: &str,
        new: &str,
    ) -> Result<ParsedMatch, FileOpsError> {
        let found = self
            .find_unique(path, encoding, old)?
            .ok_or_else(|| FileOpsError::NoMatch {
                path: path.to_path_buf(),
            })?;
        commit::rewrite(path, encoding, |reader, sink| {
            let mut number = 0_usize;
            while number + 1 < found.line {
                let Some(line) = reader.next_line()? else {
                    break;
                };
                sink.write(&line)?;
                number += 1;
            }

            let mut region = String::new();
            for _ in 0..=old.matches('\n').count() {
                match reader.next_line()? {
                    Some(line) => region.push_str(&line),
                    None => break,
                }
            }
            sink.write(&region.replacen(old, new, 1))?;

            while let Some(line) = reader.next_line()? {
                sink.write(&line)?;
            }
            Ok(())
        })?;
        Ok(found)
    }

    /// Inserts `text` after line `line` (zero inserts at the top).
    ///
    /// An unterminated line preceding the insertion gains a `'\n'`, and the
    /// inserted text always ends with one.
    ///
    /// # Errors
    ///
    /// Returns [`FileOpsError::LineOutOfRange`] when `line` exceeds the line
    /// count, and I/O or encoding errors from the rewrite.
    pub fn insert_after(
        &self,
        path: &Path,
        encoding: TextEncoding,
        line: usize,
        text: &str,
    ) -> Result<(), FileOpsError> {
        let total = self.count_lines(path, encoding)?;
        if line > total {
            return Err(FileOpsError::LineOutOfRange {
                path: path.to_path_buf(),
                line,
                total,
            });
        }

        let mut inserted = text.to_owned();
        if !inserted.ends_with('\n') {
            inserted.push('\n');
        }

        commit::rewrite(path, encoding, |reader, sink| {
            for _ in 0..line {
                let Some(mut current) = reader.next_line()? else {
                    break;
                };
                if !current.ends_with('\n') {
                    current.push('\n');
                }
                sink.write(&current)?;
            }
            sink.write(&inserted)?;
            while let Some(rest) = reader.next_line()? {
                sink.write(&rest)?;
            }
            Ok(())
        })
    }
}

/// Accumulates occurrences found while sliding the search window.
struct Occurrences<'needle> {
    needle: &'needle str,
    lines: Vec<usize>,
    first: Option<ParsedMatch>,
    count: usize,
}

impl<'needle> Occurrences<'needle> {
    const fn new(needle: &'needle str) -> Self {
        Self {
            needle,
            lines: Vec::new(),
            first: None,
            count: 0,
        }
    }

    /// Records every occurrence that starts within the window's first line.
    fn scan(&mut self, window: &VecDeque<String>, line: usize) {
        let Some(head_len) = window.front().map(String::len) else {
            return;
        };
        let joined: String = window.iter().map(String::as_str).collect();

        let mut from = 0;
        while from < head_len {
            let Some(offset) = joined.get(from..).and_then(|rest| rest.find(self.needle)) else {
                break;
            };
            let start = from + offset;
            if start >= head_len {
                break;
            }
            self.record(&joined, start, line);
            from = start + joined.get(start..).and_then(|rest| rest.chars().next()).map_or(1, char::len_utf8);
        }
    }

    fn record(&mut self, joined: &str, start: usize, line: usize) {
        self.count += 1;
        if self.lines.last() != Some(&line) {
            self.lines.push(line);
        }
        if self.first.is_none() {
            let end = start + self.needle.len();
            let mut text = self.needle.to_owned();
            if joined.get(end..).is_some_and(|rest| rest.starts_with('\n')) {
                text.push('\n');
            }
            self.first = Some(ParsedMatch { line, text });
        }
    }

    fn finish(self, path: &Path) -> Result<Option<ParsedMatch>, FileOpsError> {
        if self.count > 1 {
            return Err(FileOpsError::Ambiguous {
                path: path.to_path_buf(),
                lines: self.lines,
            });
        }
        Ok(self.first)
    }
}
