//! Helpers used to filter which candidate files are embedded.

use std::path::Path;

use crate::models::CandidateFile;

/// Trait describing selection filters for candidate files.
pub trait ResourceFilter {
  /// Returns `true` when the file at `path` should be embedded.
  fn is_included(&self, path: &Path) -> bool;
}

/// Suffix match on the path's string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
  suffix: String,
  case_sensitive: bool,
}

impl Default for ExtensionFilter {
  fn default() -> Self {
    Self::new(".sql", true)
  }
}

impl ExtensionFilter {
  /// Match paths ending with `suffix`, optionally ignoring ASCII case.
  pub fn new(suffix: impl Into<String>, case_sensitive: bool) -> Self {
    Self {
      suffix: suffix.into(),
      case_sensitive,
    }
  }

  /// Remove the recognised suffix from `value`, returning `None` when it does not match.
  pub fn strip_from<'a>(&self, value: &'a str) -> Option<&'a str> {
    if self.suffix.is_empty() || value.len() < self.suffix.len() {
      return None;
    }

    let split = value.len() - self.suffix.len();
    if !value.is_char_boundary(split) {
      return None;
    }

    let (head, tail) = value.split_at(split);
    let matches = if self.case_sensitive {
      tail == self.suffix
    } else {
      tail.eq_ignore_ascii_case(&self.suffix)
    };
    matches.then_some(head)
  }
}

impl ResourceFilter for ExtensionFilter {
  fn is_included(&self, path: &Path) -> bool {
    self.strip_from(&path.to_string_lossy()).is_some()
  }
}

/// Keep the candidates accepted by `filter`, preserving input order.
pub fn select<I, F>(candidates: I, filter: &F) -> impl Iterator<Item = CandidateFile>
where
  I: IntoIterator<Item = CandidateFile>,
  F: ResourceFilter + ?Sized,
{
  candidates
    .into_iter()
    .filter(move |file| filter.is_included(file.path()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::candidates::InlineText;
  use proptest::prelude::*;

  fn candidate(path: &str) -> CandidateFile {
    CandidateFile::new(path, InlineText(String::new()))
  }

  #[test]
  fn keeps_only_sql_files_in_order() {
    let filter = ExtensionFilter::default();
    let selected: Vec<String> = select(
      vec![
        candidate("b.sql"),
        candidate("a.txt"),
        candidate("a.sql"),
        candidate("notes.sql.bak"),
      ],
      &filter,
    )
    .map(|file| file.path().display().to_string())
    .collect();

    assert_eq!(selected, vec!["b.sql", "a.sql"]);
  }

  #[test]
  fn default_match_is_case_sensitive() {
    let filter = ExtensionFilter::default();
    assert!(!filter.is_included(Path::new("LOUD.SQL")));
    assert!(ExtensionFilter::new(".sql", false).is_included(Path::new("LOUD.SQL")));
  }

  #[test]
  fn strip_from_removes_matched_suffix() {
    let filter = ExtensionFilter::new(".sql", false);
    assert_eq!(filter.strip_from("report.SQL"), Some("report"));
    assert_eq!(filter.strip_from("report.txt"), None);
    assert_eq!(filter.strip_from(".sql"), Some(""));
    assert_eq!(filter.strip_from("ü"), None);
  }

  #[test]
  fn empty_input_selects_nothing() {
    let filter = ExtensionFilter::default();
    assert_eq!(select(Vec::new(), &filter).count(), 0);
  }

  proptest! {
    #[test]
    fn selected_count_matches_suffix_count(
      names in proptest::collection::vec("[a-z]{1,6}\\.(sql|txt|SQL|md)", 0..24),
    ) {
      let filter = ExtensionFilter::default();
      let expected = names.iter().filter(|name| name.ends_with(".sql")).count();
      let candidates: Vec<CandidateFile> = names.iter().map(|name| candidate(name)).collect();
      prop_assert_eq!(select(candidates, &filter).count(), expected);
    }
  }
}
