//! Submission of generated sources and Cargo build-script directives.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Destination for generated source units.
pub trait OutputSink {
  /// Accept one generated source under `name`.
  fn add_source(&mut self, name: &str, text: &str) -> Result<()>;
}

/// Writes generated sources into a directory, normally Cargo's `OUT_DIR`.
///
/// Files whose content is unchanged are left untouched so their modification time stays stable.
#[derive(Debug, Clone)]
pub struct OutDirSink {
  dir: PathBuf,
}

impl OutDirSink {
  /// Create a sink writing below `dir`.
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  /// Sink for the `OUT_DIR` of the running build script.
  pub fn from_env() -> Result<Self> {
    let dir = std::env::var_os("OUT_DIR").context("OUT_DIR is not set; run from a build script")?;
    Ok(Self::new(dir))
  }

  /// Directory the sink writes into.
  pub fn dir(&self) -> &Path {
    &self.dir
  }
}

impl OutputSink for OutDirSink {
  fn add_source(&mut self, name: &str, text: &str) -> Result<()> {
    fs::create_dir_all(&self.dir)
      .with_context(|| format!("failed to create {}", self.dir.display()))?;

    let target = self.dir.join(name);
    if fs::read(&target).is_ok_and(|existing| existing == text.as_bytes()) {
      return Ok(());
    }
    fs::write(&target, text).with_context(|| format!("failed to write {}", target.display()))
  }
}

/// Keeps submitted sources in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
  /// Submitted `(name, text)` pairs in submission order.
  pub sources: Vec<(String, String)>,
}

impl OutputSink for MemorySink {
  fn add_source(&mut self, name: &str, text: &str) -> Result<()> {
    self.sources.push((name.to_string(), text.to_string()));
    Ok(())
  }
}

/// Cargo build-script directives.
pub mod cargo {
  use std::path::Path;

  /// Surface `message` as a build warning.
  pub fn warning(message: &str) {
    for line in message.lines() {
      println!("cargo:warning={line}");
    }
  }

  /// Ask Cargo to rerun the build script when `path` changes.
  pub fn rerun_if_changed(path: &Path) {
    println!("cargo:rerun-if-changed={}", path.display());
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::{Duration, SystemTime};
  use tempfile::tempdir;

  #[test]
  fn out_dir_sink_creates_missing_directories() {
    let dir = tempdir().unwrap();
    let out_dir = dir.path().join("nested/out");

    let mut sink = OutDirSink::new(&out_dir);
    sink.add_source("SqlFiles.g.rs", "// generated\n").unwrap();

    let written = fs::read_to_string(out_dir.join("SqlFiles.g.rs")).unwrap();
    assert_eq!(written, "// generated\n");
  }

  #[test]
  fn out_dir_sink_skips_unchanged_content() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("SqlFiles.g.rs");
    fs::write(&target, "same").unwrap();

    let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
    fs::File::options()
      .write(true)
      .open(&target)
      .unwrap()
      .set_modified(past)
      .unwrap();

    let mut sink = OutDirSink::new(dir.path());
    sink.add_source("SqlFiles.g.rs", "same").unwrap();
    assert_eq!(fs::metadata(&target).unwrap().modified().unwrap(), past);

    sink.add_source("SqlFiles.g.rs", "changed").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "changed");
  }

  #[test]
  fn memory_sink_records_submissions() {
    let mut sink = MemorySink::default();
    sink.add_source("a.g.rs", "one").unwrap();
    sink.add_source("b.g.rs", "two").unwrap();

    assert_eq!(sink.sources, vec![
      ("a.g.rs".to_string(), "one".to_string()),
      ("b.g.rs".to_string(), "two".to_string()),
    ]);
  }
}
