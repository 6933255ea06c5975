//! Embedding configuration, optionally loaded from a JSON file next to the manifest.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::assemble::Ordering;
use crate::entry::{IdentifierPolicy, check_identifier};
use crate::error::{EmbedError, EmbedResult};
use crate::models::ContainerName;
use crate::selection::ExtensionFilter;

/// Configuration file searched for in the manifest directory.
pub const DEFAULT_CONFIG_FILE: &str = "sql_embed.json";

/// Options controlling selection, naming and rendering of the generated container.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EmbedConfig {
  /// Path suffix a file must end with to be embedded.
  pub resource_extension: String,
  /// Whether the suffix comparison is case-sensitive.
  pub case_sensitive_extension: bool,
  /// `::`-separated module path wrapping the container. Empty for none.
  pub container_namespace: String,
  /// Name of the struct holding the generated constants.
  pub container_type_name: String,
  /// Sort entries by identifier before rendering.
  pub deterministic_ordering: bool,
  /// How file names that are not valid identifiers are handled.
  pub identifier_policy: IdentifierPolicy,
  /// Directory, relative to the manifest directory, holding the resource files.
  pub resource_dir: String,
  /// Descend into subdirectories of the resource directory.
  pub recursive: bool,
}

impl Default for EmbedConfig {
  fn default() -> Self {
    Self {
      resource_extension: ".sql".into(),
      case_sensitive_extension: true,
      container_namespace: "generated".into(),
      container_type_name: "SqlFiles".into(),
      deterministic_ordering: true,
      identifier_policy: IdentifierPolicy::Reject,
      resource_dir: "sql".into(),
      recursive: true,
    }
  }
}

impl EmbedConfig {
  /// Load configuration from [`DEFAULT_CONFIG_FILE`] in `manifest_dir`.
  ///
  /// A missing file yields the defaults; a file that cannot be read or parsed is an error.
  pub fn discover(manifest_dir: &Path) -> Result<Self> {
    let candidate = manifest_dir.join(DEFAULT_CONFIG_FILE);
    match fs::read_to_string(&candidate) {
      Ok(content) => Self::from_json(&content)
        .with_context(|| format!("failed to parse {}", candidate.display())),
      Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
      Err(err) => {
        Err(err).with_context(|| format!("failed to read {}", candidate.display()))
      }
    }
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Result<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Self::from_json(&content).with_context(|| format!("failed to parse {}", path.display()))
  }

  /// Parse and validate configuration from JSON text.
  pub fn from_json(content: &str) -> Result<Self> {
    let config: Self = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Check that every value can be used to render a compilable artifact.
  pub fn validate(&self) -> EmbedResult<()> {
    if self.resource_extension.is_empty() {
      return Err(EmbedError::InvalidConfig {
        field: "resource_extension",
        value: String::new(),
        reason: "the resource suffix must not be empty".into(),
      });
    }
    self.container_name().map(|_| ())
  }

  /// Split the configured namespace and type name into a validated container location.
  pub fn container_name(&self) -> EmbedResult<ContainerName> {
    let namespace = self.container_namespace.trim();
    let segments: Vec<String> = if namespace.is_empty() {
      Vec::new()
    } else {
      namespace
        .split("::")
        .map(|segment| segment.trim().to_string())
        .collect()
    };

    for segment in &segments {
      check_identifier(segment).map_err(|reason| EmbedError::InvalidConfig {
        field: "container_namespace",
        value: self.container_namespace.clone(),
        reason: format!("segment '{segment}' {reason}"),
      })?;
    }

    check_identifier(&self.container_type_name).map_err(|reason| EmbedError::InvalidConfig {
      field: "container_type_name",
      value: self.container_type_name.clone(),
      reason: reason.to_string(),
    })?;

    Ok(ContainerName {
      namespace: segments,
      type_name: self.container_type_name.clone(),
    })
  }

  /// Filter selecting the configured resource suffix.
  pub fn extension_filter(&self) -> ExtensionFilter {
    ExtensionFilter::new(&self.resource_extension, self.case_sensitive_extension)
  }

  /// Ordering applied by the assembler.
  pub fn ordering(&self) -> Ordering {
    if self.deterministic_ordering {
      Ordering::Sorted
    } else {
      Ordering::Discovery
    }
  }

  /// Absolute resource directory for the given manifest directory.
  pub fn resource_dir_path(&self, manifest_dir: &Path) -> PathBuf {
    manifest_dir.join(&self.resource_dir)
  }
}
