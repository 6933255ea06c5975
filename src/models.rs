//! Data structures passed between the pipeline stages.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::candidates::{CancellationToken, ReadError, TextProvider};

/// One file supplied by the host, with lazily-read contents.
pub struct CandidateFile {
  path: PathBuf,
  text: Box<dyn TextProvider>,
}

impl CandidateFile {
  /// Pair a path with the provider that can produce its text.
  pub fn new(path: impl Into<PathBuf>, text: impl TextProvider + 'static) -> Self {
    Self {
      path: path.into(),
      text: Box::new(text),
    }
  }

  /// Path of the candidate as supplied by the host.
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Invoke the deferred text provider.
  pub fn read_text(&self, cancel: &CancellationToken) -> Result<String, ReadError> {
    self.text.read_text(cancel)
  }
}

impl fmt::Debug for CandidateFile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CandidateFile")
      .field("path", &self.path)
      .finish_non_exhaustive()
  }
}

/// A resource accepted for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
  /// Rust identifier the constant is declared under.
  pub identifier: String,
  /// Quoted Rust string literal decoding to the file content.
  pub literal: String,
  /// File the entry was built from.
  pub source: PathBuf,
  /// Name before sanitisation, when the identifier had to be rewritten.
  pub original_name: Option<String>,
}

/// Location of the generated container: a module path and a type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerName {
  /// Module segments wrapping the container, outermost first. May be empty.
  pub namespace: Vec<String>,
  /// Name of the struct holding the constants.
  pub type_name: String,
}

/// Fully assembled artifact, ready to render.
#[derive(Debug, Clone)]
pub struct EmissionArtifact {
  /// Where the container is declared.
  pub container: ContainerName,
  /// Entries in render order with unique identifiers.
  pub entries: Vec<ResourceEntry>,
}

/// Serializable summary of an embedded entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
  /// Constant identifier.
  pub identifier: String,
  /// Originating resource path.
  pub source: PathBuf,
}

impl From<&ResourceEntry> for EntrySummary {
  fn from(entry: &ResourceEntry) -> Self {
    Self {
      identifier: entry.identifier.clone(),
      source: entry.source.clone(),
    }
  }
}
