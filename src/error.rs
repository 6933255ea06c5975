//! Error taxonomy for a single embedding run.
//!
//! Every variant is terminal: the run stops and no artifact is submitted.

use std::path::PathBuf;

use thiserror::Error;

use crate::candidates::ReadError;

/// Result alias used by the pipeline stages.
pub type EmbedResult<T> = Result<T, EmbedError>;

/// Failures surfaced while turning resource files into a generated artifact.
#[derive(Debug, Error)]
pub enum EmbedError {
  /// The text of a resource could not be obtained, or the read was cancelled.
  #[error("failed to read resource {}: {source}", .path.display())]
  UnreadableResource {
    /// Resource that failed to load.
    path: PathBuf,
    /// Underlying read failure.
    #[source]
    source: ReadError,
  },

  /// A resource name does not form a legal Rust identifier.
  #[error("resource {} produces invalid identifier '{identifier}': {reason}", .path.display())]
  InvalidIdentifier {
    /// Resource the identifier was derived from.
    path: PathBuf,
    /// Offending identifier candidate.
    identifier: String,
    /// Why the candidate was refused.
    reason: String,
  },

  /// Two or more resources derive the same identifier.
  #[error("identifier '{identifier}' is produced by multiple resources: {}", display_paths(.paths))]
  DuplicateIdentifier {
    /// Identifier shared by the conflicting resources.
    identifier: String,
    /// Every resource deriving the identifier, sorted.
    paths: Vec<PathBuf>,
  },

  /// A configuration value cannot be used to render the artifact.
  #[error("invalid configuration value for `{field}` ('{value}'): {reason}")]
  InvalidConfig {
    /// Configuration field name.
    field: &'static str,
    /// Rejected value.
    value: String,
    /// Why the value was rejected.
    reason: String,
  },
}

fn display_paths(paths: &[PathBuf]) -> String {
  paths
    .iter()
    .map(|path| path.display().to_string())
    .collect::<Vec<_>>()
    .join(", ")
}
