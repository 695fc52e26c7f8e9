//! `Content-Length` framing over a reader and writer pair.
//!
//! ```text
//! Content-Length: <length>\r\n
//! \r\n
//! <payload>
//! ```

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::{ChildStdin, ChildStdout};

use super::error::TransportError;

/// Transport over a child process's stdout and stdin.
pub type StdioTransport = FramedTransport<BufReader<ChildStdout>, BufWriter<ChildStdin>>;

/// Reads and writes LSP-framed messages.
pub struct FramedTransport<R, W> {
    reader: R,
    writer: W,
}

impl StdioTransport {
    /// Wraps a child process's pipes.
    #[must_use]
    pub fn from_pipes(stdout: ChildStdout, stdin: ChildStdin) -> Self {
        Self::new(BufReader::new(stdout), BufWriter::new(stdin))
    }
}

impl<R: BufRead, W: Write> FramedTransport<R, W> {
    /// Creates a transport from a buffered reader and a writer.
    #[must_use]
    pub const fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Sends one framed message and flushes the writer.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] if writing fails.
    pub fn send(&mut self, message: &[u8]) -> Result<(), TransportError> {
        write!(self.writer, "Content-Length: {}\r\n\r\n", message.len())?;
        self.writer.write_all(message)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Blocks until one framed message has been read.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::MissingContentLength`] or
    /// [`TransportError::InvalidHeader`] for malformed headers and
    /// [`TransportError::Io`] when the stream fails or ends early.
    pub fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        let content_length = self.read_headers()?;
        let mut content = vec![0_u8; content_length];
        self.reader.read_exact(&mut content)?;
        Ok(content)
    }

    /// Consumes the transport, returning the writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn read_headers(&mut self) -> Result<usize, TransportError> {
        let mut content_length = None;
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(TransportError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed while reading headers",
                )));
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }
            if let Some(value) = trimmed.strip_prefix("Content-Length:") {
                let parsed = value
                    .trim()
                    .parse()
                    .map_err(|_| TransportError::InvalidHeader)?;
                content_length = Some(parsed);
            }
        }
        content_length.ok_or(TransportError::MissingContentLength)
    }
}
