//! Shared fixtures for library integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary site directory next to a cache file.
pub struct Fixture {
  pub temp: TempDir,
}

impl Fixture {
  pub fn new() -> Self {
    let fixture = Self {
      temp: TempDir::new().unwrap(),
    };
    fs::create_dir_all(fixture.site_dir()).unwrap();
    fixture
  }

  pub fn site_dir(&self) -> PathBuf {
    self.temp.path().join("site-packages")
  }

  pub fn data_file(&self) -> PathBuf {
    self.temp.path().join("cache").join("entry_points.json")
  }

  /// Install a `.dist-info` directory declaring `entry_points`.
  pub fn install(&self, name: &str, version: &str, entry_points: &str) {
    let dir = self
      .site_dir()
      .join(format!("{}-{}.dist-info", name.replace('-', "_"), version));
    write(&dir.join("METADATA"), &format!("Metadata-Version: 2.1\nName: {}\nVersion: {}\n", name, version));
    write(&dir.join("entry_points.txt"), entry_points);
  }
}

fn write(path: &Path, content: &str) {
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, content).unwrap();
}
