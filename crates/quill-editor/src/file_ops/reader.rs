//! Chunked, decoding line reader.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use encoding_rs::{Decoder, DecoderResult};

use super::FileOpsError;
use crate::encoding::{EncodingError, TextEncoding};

/// Bytes read from disk per refill.
pub(crate) const CHUNK_BYTES: usize = 64 * 1024;

/// Yields the lines of a file, terminators included, holding at most one
/// chunk of decoded text in memory.
pub(crate) struct LineReader {
    path: PathBuf,
    file: File,
    encoding: TextEncoding,
    decoder: Decoder,
    chunk: Vec<u8>,
    pending: String,
    cursor: usize,
    finished: bool,
}

impl LineReader {
    /// Opens `path` and skips a byte order mark belonging to `encoding`.
    pub(crate) fn open(path: &Path, encoding: TextEncoding) -> Result<Self, FileOpsError> {
        let io_error = |source| FileOpsError::io(path, source);
        let mut file = File::open(path).map_err(io_error)?;

        let bom = encoding.bom_bytes();
        if !bom.is_empty() {
            let mut head = vec![0; bom.len()];
            let present = file.read_exact(&mut head).is_ok() && head == bom;
            if !present {
                file.rewind().map_err(io_error)?;
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
            encoding,
            decoder: encoding.decoder(),
            chunk: vec![0; CHUNK_BYTES],
            pending: String::new(),
            cursor: 0,
            finished: false,
        })
    }

    /// Returns the next line, or `None` once the file is exhausted.
    ///
    /// Every line but possibly the last ends with `'\n'`.
    pub(crate) fn next_line(&mut self) -> Result<Option<String>, FileOpsError> {
        loop {
            let unread = self.pending.as_bytes().get(self.cursor..).unwrap_or_default();
            if let Some(offset) = memchr::memchr(b'\n', unread) {
                let end = self.cursor + offset + 1;
                let line = self.pending.get(self.cursor..end).unwrap_or_default().to_owned();
                self.cursor = end;
                return Ok(Some(line));
            }

            if self.finished {
                let rest = self.pending.get(self.cursor..).unwrap_or_default().to_owned();
                self.pending.clear();
                self.cursor = 0;
                return Ok((!rest.is_empty()).then_some(rest));
            }

            self.fill()?;
        }
    }

    /// Counts the remaining lines, including an unterminated last line.
    pub(crate) fn count(mut self) -> Result<usize, FileOpsError> {
        let mut lines = 0_usize;
        while self.next_line()?.is_some() {
            lines += 1;
        }
        Ok(lines)
    }

    fn fill(&mut self) -> Result<(), FileOpsError> {
        self.pending.drain(..self.cursor);
        self.cursor = 0;

        let read = self
            .file
            .read(&mut self.chunk)
            .map_err(|source| FileOpsError::io(&self.path, source))?;
        let last = read == 0;
        let input = self.chunk.get(..read).unwrap_or_default();

        let mut consumed = 0;
        loop {
            let remaining = input.get(consumed..).unwrap_or_default();
            let needed = self
                .decoder
                .max_utf8_buffer_length_without_replacement(remaining.len())
                .unwrap_or(CHUNK_BYTES);
            self.pending.reserve(needed);
            let (result, read_now) =
                self.decoder
                    .decode_to_string_without_replacement(remaining, &mut self.pending, last);
            consumed += read_now;
            match result {
                DecoderResult::InputEmpty => break,
                DecoderResult::OutputFull => {}
                DecoderResult::Malformed(_, _) => {
                    return Err(FileOpsError::Decode {
                        path: self.path.clone(),
                        source: EncodingError::Malformed {
                            encoding: self.encoding.name(),
                        },
                    });
                }
            }
        }

        self.finished = last;
        Ok(())
    }
}
