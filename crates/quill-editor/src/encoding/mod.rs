//! Byte encodings of edited files.
//!
//! A file's encoding is detected once by [`EncodingManager`], cached against
//! the file's modification time, and reused for both reading and writing so
//! non-ASCII content round-trips byte for byte.

mod manager;

use std::fmt;
use std::io;
use std::path::PathBuf;

use encoding_rs::{Decoder, Encoding, UTF_8, UTF_16BE, UTF_16LE};
use thiserror::Error;

pub use quill_syntax::MtimeCache;
pub use manager::{CONFIDENCE_THRESHOLD, DETECTION_SAMPLE_BYTES, EncodingManager, detect_bytes};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16LE_BOM: &[u8] = b"\xFF\xFE";
const UTF16BE_BOM: &[u8] = b"\xFE\xFF";

/// Errors raised while detecting or applying an encoding.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The file could not be read for detection.
    #[error("failed to read {path} for encoding detection: {source}")]
    Read {
        /// File being inspected.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The bytes are not valid in the resolved encoding.
    #[error("content is not valid {encoding}")]
    Malformed {
        /// Name of the encoding.
        encoding: &'static str,
    },

    /// The text contains characters the encoding cannot represent.
    #[error("text contains characters that cannot be written as {encoding}")]
    Unmappable {
        /// Name of the encoding.
        encoding: &'static str,
    },

    /// The label does not name a known encoding.
    #[error("unknown encoding label '{label}'")]
    UnknownLabel {
        /// Label supplied by the caller.
        label: String,
    },
}

/// A resolved text encoding, including whether files carry a byte order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding {
    encoding: &'static Encoding,
    bom: bool,
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::UTF8
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())?;
        if self.bom {
            formatter.write_str(" (BOM)")?;
        }
        Ok(())
    }
}

impl TextEncoding {
    /// UTF-8 without a byte order mark.
    pub const UTF8: Self = Self {
        encoding: UTF_8,
        bom: false,
    };

    /// Wraps an `encoding_rs` encoding.
    #[must_use]
    pub const fn new(encoding: &'static Encoding, bom: bool) -> Self {
        Self { encoding, bom }
    }

    /// Resolves a WHATWG or chardet label such as `windows-1251`.
    ///
    /// `ascii` resolves to UTF-8, of which it is a subset.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::UnknownLabel`] for labels `encoding_rs` does
    /// not recognise.
    pub fn for_label(label: &str) -> Result<Self, EncodingError> {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case("ascii") || trimmed.eq_ignore_ascii_case("us-ascii") {
            return Ok(Self::UTF8);
        }
        Encoding::for_label(trimmed.as_bytes())
            .map(|encoding| Self::new(encoding, false))
            .ok_or_else(|| EncodingError::UnknownLabel {
                label: trimmed.to_owned(),
            })
    }

    /// Detects an encoding from a leading byte order mark.
    #[must_use]
    pub fn from_bom(bytes: &[u8]) -> Option<Self> {
        Encoding::for_bom(bytes).map(|(encoding, _)| Self::new(encoding, true))
    }

    /// Canonical name of the encoding.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Whether written files start with a byte order mark.
    #[must_use]
    pub const fn has_bom(&self) -> bool {
        self.bom
    }

    /// Whether the encoding uses two-byte code units.
    #[must_use]
    pub fn is_utf16(&self) -> bool {
        self.encoding == UTF_16LE || self.encoding == UTF_16BE
    }

    /// Byte order mark emitted at the start of written files.
    #[must_use]
    pub fn bom_bytes(&self) -> &'static [u8] {
        if !self.bom {
            return &[];
        }
        if self.encoding == UTF_16LE {
            UTF16LE_BOM
        } else if self.encoding == UTF_16BE {
            UTF16BE_BOM
        } else if self.encoding == UTF_8 {
            UTF8_BOM
        } else {
            &[]
        }
    }

    /// Length of the byte order mark `bytes` starts with, if it matches this
    /// encoding.
    #[must_use]
    pub fn bom_len(&self, bytes: &[u8]) -> usize {
        let bom = self.bom_bytes();
        if !bom.is_empty() && bytes.starts_with(bom) {
            bom.len()
        } else {
            0
        }
    }

    /// Streaming decoder that does not treat a byte order mark specially.
    #[must_use]
    pub fn decoder(&self) -> Decoder {
        self.encoding.new_decoder_without_bom_handling()
    }

    /// Decodes a complete file, skipping a matching byte order mark.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::Malformed`] when the bytes are not valid in
    /// this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, EncodingError> {
        let body = bytes.get(self.bom_len(bytes)..).unwrap_or_default();
        self.encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .map(std::borrow::Cow::into_owned)
            .ok_or(EncodingError::Malformed {
                encoding: self.name(),
            })
    }

    /// Encodes `text`, prefixing the byte order mark when the file carries
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::Unmappable`] when `text` contains characters
    /// the encoding cannot represent.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        let mut bytes = self.bom_bytes().to_vec();
        bytes.extend(self.encode_fragment(text)?);
        Ok(bytes)
    }

    /// Encodes a fragment of a file, without a byte order mark.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::Unmappable`] when `text` contains characters
    /// the encoding cannot represent.
    pub fn encode_fragment(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        if self.encoding == UTF_16LE {
            return Ok(encode_utf16le(text));
        }
        if self.encoding == UTF_16BE {
            return Ok(encode_utf16be(text));
        }
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            return Err(EncodingError::Unmappable {
                encoding: self.name(),
            });
        }
        Ok(bytes.into_owned())
    }
}

#[expect(
    clippy::little_endian_bytes,
    reason = "UTF-16LE code units are little endian by definition"
)]
fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

#[expect(
    clippy::big_endian_bytes,
    reason = "UTF-16BE code units are big endian by definition"
)]
fn encode_utf16be(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_be_bytes).collect()
}
