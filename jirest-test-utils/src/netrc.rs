//! Temporary home directories holding a `.netrc`

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// RAII guard for test .netrc files
///
/// Creates a temporary home directory containing a `.netrc` with the given
/// content. Code under test receives the home directory explicitly, so the
/// process-wide `HOME` is never touched. Everything is removed on drop.
pub struct NetrcGuard {
  temp_dir: TempDir,
  netrc_path: PathBuf,
}

impl NetrcGuard {
  /// Create a new NetrcGuard with the given content
  pub fn new(content: &str) -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let netrc_path = temp_dir.path().join(".netrc");
    fs::write(&netrc_path, content).expect("Failed to write test .netrc");

    Self { temp_dir, netrc_path }
  }

  /// The temporary home directory
  pub fn home_dir(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Path of the `.netrc` file
  pub fn netrc_path(&self) -> &Path {
    &self.netrc_path
  }
}
