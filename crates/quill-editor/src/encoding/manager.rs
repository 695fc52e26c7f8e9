//! Detection, caching and overrides of file encodings.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{EncodingError, MtimeCache, TextEncoding};

const ENCODING_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::encoding");

/// Number of leading bytes sampled for detection.
pub const DETECTION_SAMPLE_BYTES: u64 = 1024 * 1024;

/// Detector confidence a guess must exceed to be used.
pub const CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Resolves and remembers the encoding of each file.
///
/// Lookups compare the cached modification time with the file's current one
/// and re-detect on mismatch. Explicit overrides win over detection until
/// [`EncodingManager::clear_cache`] drops them.
#[derive(Debug, Default)]
pub struct EncodingManager {
    cache: MtimeCache<TextEncoding>,
    overrides: HashMap<PathBuf, TextEncoding>,
}

impl EncodingManager {
    /// Creates a manager with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the encoding to use for `path`.
    ///
    /// Missing files resolve to UTF-8 without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::Read`] when the file exists but cannot be
    /// inspected.
    pub fn resolve(&mut self, path: &Path) -> Result<TextEncoding, EncodingError> {
        if let Some(encoding) = self.overrides.get(path) {
            return Ok(*encoding);
        }

        let modified = match fs::metadata(path).and_then(|metadata| metadata.modified()) {
            Ok(modified) => modified,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(TextEncoding::default());
            }
            Err(source) => {
                return Err(EncodingError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if let Some(encoding) = self.cache.get(path, modified) {
            return Ok(*encoding);
        }

        let encoding = detect_file(path)?;
        debug!(
            target: ENCODING_TARGET,
            path = %path.display(),
            encoding = %encoding,
            "detected encoding"
        );
        self.cache.put(path.to_path_buf(), modified, encoding);
        Ok(encoding)
    }

    /// Pins the encoding of `path` until the cache entry is cleared.
    pub fn set_encoding(&mut self, path: &Path, encoding: TextEncoding) {
        self.overrides.insert(path.to_path_buf(), encoding);
    }

    /// Records `encoding` against the current modification time of `path`.
    ///
    /// Called after the editor writes a file so the next lookup does not
    /// re-run detection on content the editor produced itself.
    pub fn remember(&mut self, path: &Path, encoding: TextEncoding) {
        match fs::metadata(path).and_then(|metadata| metadata.modified()) {
            Ok(modified) => self.cache.put(path.to_path_buf(), modified, encoding),
            Err(_) => {
                self.cache.invalidate(path);
            }
        }
    }

    /// Drops cached detection and overrides for `path`, or for every file.
    pub fn clear_cache(&mut self, path: Option<&Path>) {
        if let Some(target) = path {
            self.cache.invalidate(target);
            self.overrides.remove(target);
        } else {
            self.cache.clear();
            self.overrides.clear();
        }
    }

    /// Number of files with a cached detection result.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

/// Detects the encoding of a sample of leading bytes.
///
/// A byte order mark is authoritative. Otherwise the statistical detector
/// runs and its guess is used only above [`CONFIDENCE_THRESHOLD`]; anything
/// else, including binary-looking input, falls back to UTF-8.
#[must_use]
pub fn detect_bytes(sample: &[u8]) -> TextEncoding {
    if let Some(encoding) = TextEncoding::from_bom(sample) {
        return encoding;
    }
    if sample.is_empty() {
        return TextEncoding::default();
    }

    let (charset, confidence, _) = chardet::detect(&sample.to_vec());
    if confidence <= CONFIDENCE_THRESHOLD {
        return TextEncoding::default();
    }
    TextEncoding::for_label(chardet::charset2encoding(&charset)).unwrap_or_default()
}

fn detect_file(path: &Path) -> Result<TextEncoding, EncodingError> {
    let read_error = |source| EncodingError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_error)?;
    let mut sample = Vec::new();
    file.take(DETECTION_SAMPLE_BYTES)
        .read_to_end(&mut sample)
        .map_err(read_error)?;
    Ok(detect_bytes(&sample))
}
