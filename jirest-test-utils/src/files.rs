//! Temporary fixture files

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory for fixture files, removed on drop
pub struct FixtureDir {
  temp_dir: TempDir,
}

impl Default for FixtureDir {
  fn default() -> Self {
    Self::new()
  }
}

impl FixtureDir {
  pub fn new() -> Self {
    Self {
      temp_dir: TempDir::new().expect("Failed to create temp directory"),
    }
  }

  pub fn path(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Write a file with the given content and return its path
  pub fn file(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = self.temp_dir.path().join(name);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, content).expect("Failed to write fixture file");
    path
  }

  /// A path inside the directory that does not exist
  pub fn missing(&self, name: &str) -> PathBuf {
    self.temp_dir.path().join(name)
  }
}
