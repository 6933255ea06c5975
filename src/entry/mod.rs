//! Turn selected candidate files into resource entries.
//!
//! Identifier derivation and literal escaping live in their own submodules so each can be tested
//! in isolation.

mod ident;
mod literal;

use std::path::Path;

pub use ident::{IdentifierPolicy, check_identifier, resolve_identifier, sanitize_identifier};
pub use literal::escape_literal;

use crate::candidates::{CancellationToken, ReadError};
use crate::error::{EmbedError, EmbedResult};
use crate::models::{CandidateFile, ResourceEntry};
use crate::selection::ExtensionFilter;

/// Base name of `path` with the recognised suffix removed.
pub fn resource_name(path: &Path, filter: &ExtensionFilter) -> String {
  let Some(file_name) = path.file_name() else {
    return String::new();
  };
  let file_name = file_name.to_string_lossy();

  match filter.strip_from(&file_name) {
    Some(stem) => stem.to_string(),
    None => path
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_default(),
  }
}

/// Build the entry for one selected file.
///
/// The identifier is resolved before any text is read, so naming failures never touch the file.
pub fn build_entry(
  file: &CandidateFile,
  filter: &ExtensionFilter,
  policy: IdentifierPolicy,
  cancel: &CancellationToken,
) -> EmbedResult<ResourceEntry> {
  let path = file.path();
  let name = resource_name(path, filter);

  let (identifier, renamed) =
    resolve_identifier(&name, policy).map_err(|reason| EmbedError::InvalidIdentifier {
      path: path.to_path_buf(),
      identifier: name.clone(),
      reason: reason.to_string(),
    })?;

  let unreadable = |source: ReadError| EmbedError::UnreadableResource {
    path: path.to_path_buf(),
    source,
  };
  if cancel.is_cancelled() {
    return Err(unreadable(ReadError::Cancelled));
  }
  let text = file.read_text(cancel).map_err(unreadable)?;

  Ok(ResourceEntry {
    identifier,
    literal: escape_literal(&text),
    source: path.to_path_buf(),
    original_name: renamed.then_some(name),
  })
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;
  use std::io;
  use std::rc::Rc;

  use super::literal::tests::decode_literal;
  use super::*;
  use crate::candidates::InlineText;

  fn inline(path: &str, text: &str) -> CandidateFile {
    CandidateFile::new(path, InlineText(text.to_string()))
  }

  #[test]
  fn derives_identifier_and_literal() {
    let file = inline("queries/greeting.sql", "SELECT 'hi';");
    let entry = build_entry(
      &file,
      &ExtensionFilter::default(),
      IdentifierPolicy::Reject,
      &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(entry.identifier, "greeting");
    assert_eq!(decode_literal(&entry.literal), "SELECT 'hi';");
    assert_eq!(entry.source, Path::new("queries/greeting.sql"));
    assert_eq!(entry.original_name, None);
  }

  #[test]
  fn strips_only_the_recognised_suffix() {
    let filter = ExtensionFilter::new(".sql", false);
    assert_eq!(resource_name(Path::new("a/b/Report.SQL"), &filter), "Report");
    assert_eq!(
      resource_name(Path::new("a/b/report.v2.sql"), &filter),
      "report.v2"
    );
    assert_eq!(resource_name(Path::new("a/.."), &filter), "");
  }

  #[test]
  fn rejects_invalid_names_without_reading() {
    let reads = Rc::new(Cell::new(0));
    let counter = Rc::clone(&reads);
    let file = CandidateFile::new("my report.sql", move |_: &CancellationToken| {
      counter.set(counter.get() + 1);
      Ok::<_, ReadError>(String::new())
    });

    let err = build_entry(
      &file,
      &ExtensionFilter::default(),
      IdentifierPolicy::Reject,
      &CancellationToken::new(),
    )
    .unwrap_err();

    match err {
      EmbedError::InvalidIdentifier {
        path, identifier, ..
      } => {
        assert_eq!(path, Path::new("my report.sql"));
        assert_eq!(identifier, "my report");
      }
      other => panic!("unexpected error: {other}"),
    }
    assert_eq!(reads.get(), 0);
  }

  #[test]
  fn sanitize_policy_records_original_name() {
    let file = inline("2fa-codes.sql", "SELECT code FROM otp;");
    let entry = build_entry(
      &file,
      &ExtensionFilter::default(),
      IdentifierPolicy::Sanitize,
      &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(entry.identifier, "_2fa_codes");
    assert_eq!(entry.original_name.as_deref(), Some("2fa-codes"));
  }

  #[test]
  fn cancellation_aborts_the_entry() {
    let token = CancellationToken::new();
    token.cancel();

    let err = build_entry(
      &inline("greeting.sql", "SELECT 1;"),
      &ExtensionFilter::default(),
      IdentifierPolicy::Reject,
      &token,
    )
    .unwrap_err();

    assert!(matches!(
      err,
      EmbedError::UnreadableResource {
        source: ReadError::Cancelled,
        ..
      }
    ));
  }

  #[test]
  fn provider_failures_name_the_file() {
    let file = CandidateFile::new("broken.sql", |_: &CancellationToken| {
      Err::<String, _>(ReadError::Io(io::Error::other("disk on fire")))
    });

    let err = build_entry(
      &file,
      &ExtensionFilter::default(),
      IdentifierPolicy::Reject,
      &CancellationToken::new(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("broken.sql"));
  }
}
