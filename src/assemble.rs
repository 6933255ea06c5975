//! Assemble resource entries into the generated container source.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::error::{EmbedError, EmbedResult};
use crate::models::{ContainerName, EmissionArtifact, ResourceEntry};

const INDENT: &str = "    ";

/// Order in which constants are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ordering {
  /// Sort by identifier so the output is stable across platforms and runs.
  #[default]
  Sorted,
  /// Keep the order the files were discovered in.
  Discovery,
}

/// Check identifier uniqueness and order the entries for rendering.
pub fn assemble(
  entries: Vec<ResourceEntry>,
  container: ContainerName,
  ordering: Ordering,
) -> EmbedResult<EmissionArtifact> {
  ensure_unique_identifiers(&entries)?;

  let mut entries = entries;
  if ordering == Ordering::Sorted {
    entries.sort_by(|a, b| a.identifier.cmp(&b.identifier));
  }

  Ok(EmissionArtifact { container, entries })
}

fn ensure_unique_identifiers(entries: &[ResourceEntry]) -> EmbedResult<()> {
  let mut sources: BTreeMap<&str, Vec<PathBuf>> = BTreeMap::new();
  for entry in entries {
    sources
      .entry(entry.identifier.as_str())
      .or_default()
      .push(entry.source.clone());
  }

  match sources.into_iter().find(|(_, paths)| paths.len() > 1) {
    Some((identifier, mut paths)) => {
      paths.sort();
      Err(EmbedError::DuplicateIdentifier {
        identifier: identifier.to_string(),
        paths,
      })
    }
    None => Ok(()),
  }
}

impl ContainerName {
  /// Dotted name used for the generated file, e.g. `generated.SqlFiles`.
  pub fn qualified_name(&self) -> String {
    self
      .namespace
      .iter()
      .chain(std::iter::once(&self.type_name))
      .map(String::as_str)
      .collect::<Vec<_>>()
      .join(".")
  }
}

impl EmissionArtifact {
  /// File name the artifact is submitted under.
  pub fn file_name(&self) -> String {
    format!("{}.g.rs", self.container.qualified_name())
  }

  /// Render the complete source text.
  pub fn render(&self) -> String {
    let mut out = String::new();
    let _ = writeln!(
      out,
      "// @generated by sql_embed from {} resource file(s). Do not edit.",
      self.entries.len()
    );
    out.push('\n');

    for (depth, segment) in self.container.namespace.iter().enumerate() {
      let _ = writeln!(out, "{}pub mod {segment} {{", INDENT.repeat(depth));
    }

    let depth = self.container.namespace.len();
    let pad = INDENT.repeat(depth);
    let type_name = &self.container.type_name;

    let _ = writeln!(out, "{pad}/// Resource files embedded at build time.");
    let _ = writeln!(out, "{pad}#[allow(dead_code)]");
    let _ = writeln!(out, "{pad}pub struct {type_name};");
    out.push('\n');
    let _ = writeln!(out, "{pad}#[allow(dead_code, non_upper_case_globals)]");

    if self.entries.is_empty() {
      let _ = writeln!(out, "{pad}impl {type_name} {{}}");
    } else {
      let _ = writeln!(out, "{pad}impl {type_name} {{");
      for entry in &self.entries {
        let _ = writeln!(
          out,
          "{pad}{INDENT}pub const {}: &'static str = {};",
          entry.identifier, entry.literal
        );
      }
      let _ = writeln!(out, "{pad}}}");
    }

    for depth in (0..depth).rev() {
      let _ = writeln!(out, "{}}}", INDENT.repeat(depth));
    }

    out
  }
}
