//! Temporary-file writes swapped into place by rename.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::FileOpsError;
use super::reader::LineReader;
use crate::encoding::TextEncoding;

const TEMP_PREFIX: &str = ".quill-";

/// Encoding writer over the temporary file.
pub(super) struct Sink<'file> {
    path: PathBuf,
    encoding: TextEncoding,
    writer: BufWriter<&'file mut File>,
}

impl Sink<'_> {
    /// Encodes and writes a fragment of the new content.
    pub(super) fn write(&mut self, text: &str) -> Result<(), FileOpsError> {
        let bytes = self
            .encoding
            .encode_fragment(text)
            .map_err(|source| FileOpsError::decode(&self.path, source))?;
        self.writer
            .write_all(&bytes)
            .map_err(|source| FileOpsError::io(&self.path, source))
    }
}

/// Streams `path` through `produce` into a sibling temporary file, then
/// renames it over `path`, keeping the original permissions.
pub(super) fn rewrite<F>(
    path: &Path,
    encoding: TextEncoding,
    produce: F,
) -> Result<(), FileOpsError>
where
    F: FnOnce(&mut LineReader, &mut Sink<'_>) -> Result<(), FileOpsError>,
{
    let permissions = fs::metadata(path)
        .map_err(|source| FileOpsError::io(path, source))?
        .permissions();
    let mut temp = create_temp(path)?;
    let mut reader = LineReader::open(path, encoding)?;

    {
        let mut sink = Sink {
            path: path.to_path_buf(),
            encoding,
            writer: BufWriter::new(temp.as_file_mut()),
        };
        sink.writer
            .write_all(encoding.bom_bytes())
            .map_err(|source| FileOpsError::io(path, source))?;
        produce(&mut reader, &mut sink)?;
        sink.writer
            .flush()
            .map_err(|source| FileOpsError::io(path, source))?;
    }

    fs::set_permissions(temp.path(), permissions)
        .map_err(|source| FileOpsError::io(path, source))?;
    persist(temp, path)
}

/// Atomically replaces (or creates) `path` with `bytes`.
///
/// Missing parent directories are created. An existing file keeps its
/// permissions.
///
/// # Errors
///
/// Returns [`FileOpsError::Io`] when the temporary file cannot be written or
/// renamed; the target is left untouched in that case.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), FileOpsError> {
    let permissions = fs::metadata(path).ok().map(|metadata| metadata.permissions());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| FileOpsError::io(path, source))?;
    }

    let mut temp = create_temp(path)?;
    temp.write_all(bytes)
        .and_then(|()| temp.flush())
        .map_err(|source| FileOpsError::io(path, source))?;
    if let Some(original) = permissions {
        fs::set_permissions(temp.path(), original)
            .map_err(|source| FileOpsError::io(path, source))?;
    }
    persist(temp, path)
}

fn create_temp(path: &Path) -> Result<NamedTempFile, FileOpsError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(parent)
        .map_err(|source| FileOpsError::io(path, source))
}

fn persist(temp: NamedTempFile, path: &Path) -> Result<(), FileOpsError> {
    temp.persist(path)
        .map(|_| ())
        .map_err(|error| FileOpsError::io(path, error.error))
}
