//! Build orchestrator running selection, entry construction and assembly in one pass.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::assemble::assemble;
use crate::candidates::{CancellationToken, scan_directory};
use crate::config::{DEFAULT_CONFIG_FILE, EmbedConfig};
use crate::entry::build_entry;
use crate::error::EmbedResult;
use crate::models::{CandidateFile, EntrySummary};
use crate::output::{OutDirSink, OutputSink, cargo};
use crate::selection::select;

/// Generated artifact produced by one run.
#[derive(Debug, Clone)]
pub struct GeneratedSource {
  /// Name the artifact is submitted under, e.g. `generated.SqlFiles.g.rs`.
  pub file_name: String,
  /// Rendered Rust source.
  pub code: String,
  /// Embedded constants in render order.
  pub entries: Vec<EntrySummary>,
  /// Paths that should trigger rerunning the build script when changed.
  pub rerun_paths: Vec<PathBuf>,
}

impl GeneratedSource {
  /// Hand the artifact to `sink`.
  pub fn submit<S: OutputSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
    sink.add_source(&self.file_name, &self.code)
  }

  /// Print a `cargo:rerun-if-changed` directive for every tracked path.
  pub fn emit_rerun_directives(&self) {
    for path in &self.rerun_paths {
      cargo::rerun_if_changed(path);
    }
  }
}

/// High-level helper turning resource files into a generated container.
pub struct SqlEmbedBuilder<'a> {
  config: &'a EmbedConfig,
  cancel: CancellationToken,
}

impl<'a> SqlEmbedBuilder<'a> {
  /// Create a builder for the provided configuration.
  pub fn new(config: &'a EmbedConfig) -> Self {
    Self {
      config,
      cancel: CancellationToken::new(),
    }
  }

  /// Observe `token` while reading resource text.
  pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
    self.cancel = token;
    self
  }

  /// Run the pipeline over host-supplied candidates.
  ///
  /// The first failure ends the run; no partial artifact is produced.
  pub fn build<I>(&self, candidates: I) -> EmbedResult<GeneratedSource>
  where
    I: IntoIterator<Item = CandidateFile>,
  {
    self.config.validate()?;
    let container = self.config.container_name()?;
    let filter = self.config.extension_filter();

    let mut entries = Vec::new();
    for file in select(candidates, &filter) {
      let entry = build_entry(&file, &filter, self.config.identifier_policy, &self.cancel)?;
      if let Some(original) = &entry.original_name {
        cargo::warning(&format!(
          "'{}' in {} is not a valid identifier; embedded as '{}'",
          original,
          entry.source.display(),
          entry.identifier
        ));
      }
      entries.push(entry);
    }

    let artifact = assemble(entries, container, self.config.ordering())?;

    Ok(GeneratedSource {
      file_name: artifact.file_name(),
      code: artifact.render(),
      entries: artifact.entries.iter().map(EntrySummary::from).collect(),
      rerun_paths: artifact
        .entries
        .iter()
        .map(|entry| entry.source.clone())
        .collect(),
    })
  }

  /// Scan `dir` for candidates and run the pipeline over them.
  pub fn build_from_dir(&self, dir: &Path) -> EmbedResult<GeneratedSource> {
    let scan = scan_directory(dir, self.config.recursive)?;
    let mut rerun_paths = vec![dir.to_path_buf()];
    rerun_paths.extend(scan.visited_dirs.into_iter().filter(|visited| visited != dir));

    let mut generated = self.build(scan.candidates)?;
    rerun_paths.append(&mut generated.rerun_paths);
    generated.rerun_paths = rerun_paths;
    Ok(generated)
  }
}

/// Entry point for `build.rs`: embed the configured resource directory into `OUT_DIR`.
///
/// Configuration is discovered in `CARGO_MANIFEST_DIR`; the generated file can then be pulled in
/// with `include!(concat!(env!("OUT_DIR"), "/<file name>"))`.
pub fn run_build_script() -> Result<GeneratedSource> {
  let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR")
    .map(PathBuf::from)
    .context("CARGO_MANIFEST_DIR is not set; run from a build script")?;

  let config = EmbedConfig::discover(&manifest_dir)?;
  let config_path = manifest_dir.join(DEFAULT_CONFIG_FILE);
  if config_path.exists() {
    cargo::rerun_if_changed(&config_path);
  }

  let resource_dir = config.resource_dir_path(&manifest_dir);
  let generated = SqlEmbedBuilder::new(&config)
    .build_from_dir(&resource_dir)
    .with_context(|| format!("failed to embed resources from {}", resource_dir.display()))?;

  generated.submit(&mut OutDirSink::from_env()?)?;
  generated.emit_rerun_directives();
  Ok(generated)
}
