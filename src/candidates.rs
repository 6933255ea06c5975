//! Candidate files and the lazy text providers backing them.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::error::{EmbedError, EmbedResult};
use crate::models::CandidateFile;

const READ_CHUNK: usize = 64 * 1024;
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Cooperative cancellation flag shared between the host and the pipeline.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes the request.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`CancellationToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Outcome of a text read that did not produce text.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The host cancelled the run before the read completed.
    #[error("read was cancelled")]
    Cancelled,
    /// The underlying source failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Deferred accessor for the full text of a candidate file.
pub trait TextProvider {
    /// Produce the complete text, or report why it could not be produced.
    fn read_text(&self, cancel: &CancellationToken) -> Result<String, ReadError>;
}

impl<F> TextProvider for F
where
    F: Fn(&CancellationToken) -> Result<String, ReadError>,
{
    fn read_text(&self, cancel: &CancellationToken) -> Result<String, ReadError> {
        self(cancel)
    }
}

/// Text that was already loaded by the host.
#[derive(Debug, Clone)]
pub struct InlineText(
    /// Complete file text.
    pub String,
);

impl TextProvider for InlineText {
    fn read_text(&self, cancel: &CancellationToken) -> Result<String, ReadError> {
        if cancel.is_cancelled() {
            return Err(ReadError::Cancelled);
        }
        Ok(self.0.clone())
    }
}

/// Reads a file from disk in chunks, checking for cancellation between chunks.
///
/// Content must be UTF-8; a leading byte order mark is dropped.
#[derive(Debug, Clone)]
pub struct FileText {
    path: PathBuf,
}

impl FileText {
    /// Create a provider for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TextProvider for FileText {
    fn read_text(&self, cancel: &CancellationToken) -> Result<String, ReadError> {
        let mut file = File::open(&self.path)?;
        let mut bytes = Vec::new();
        let mut buffer = vec![0u8; READ_CHUNK];

        loop {
            if cancel.is_cancelled() {
                return Err(ReadError::Cancelled);
            }
            match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => bytes.extend_from_slice(&buffer[..read]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }

        let mut text =
            String::from_utf8(bytes).map_err(|err| io::Error::new(ErrorKind::InvalidData, err))?;
        if text.starts_with(BYTE_ORDER_MARK) {
            text.drain(..BYTE_ORDER_MARK.len_utf8());
        }
        Ok(text)
    }
}

/// Files and directories discovered while scanning a resource directory.
#[derive(Default)]
pub struct DirectoryScan {
    /// Every regular file found, in enumeration order.
    pub candidates: Vec<CandidateFile>,
    /// Directories that were read, starting with the root.
    pub visited_dirs: Vec<PathBuf>,
}

/// Enumerate the files below `root` as lazily-read candidates.
///
/// Hidden entries (leading `.`) are skipped. A missing root yields an empty scan.
pub fn scan_directory(root: &Path, recursive: bool) -> EmbedResult<DirectoryScan> {
    let mut scan = DirectoryScan::default();
    if !root.exists() {
        return Ok(scan);
    }

    collect_candidates(root, recursive, &mut scan)?;
    Ok(scan)
}

fn collect_candidates(dir: &Path, recursive: bool, scan: &mut DirectoryScan) -> EmbedResult<()> {
    let unreadable = |source: io::Error| EmbedError::UnreadableResource {
        path: dir.to_path_buf(),
        source: ReadError::Io(source),
    };

    let entries = fs::read_dir(dir).map_err(unreadable)?;
    scan.visited_dirs.push(dir.to_path_buf());

    for entry in entries {
        let entry = entry.map_err(unreadable)?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type().map_err(unreadable)?;
        if file_type.is_dir() {
            if recursive {
                collect_candidates(&path, recursive, scan)?;
            }
        } else if path.is_file() {
            scan.candidates.push(CandidateFile::new(path.clone(), FileText::new(path)));
        }
    }

    Ok(())
}
