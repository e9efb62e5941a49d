//! JSON file backend for the entry point cache.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{StoreBackend, StoreError, StoreMap};
use crate::platform::paths::{PathError, data_file};

/// Stores the whole cache as a single JSON object in one file.
#[derive(Debug, Clone)]
pub struct JsonBackend {
  path: PathBuf,
}

impl JsonBackend {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Backend at the default cache location.
  pub fn default_location() -> Result<Self, PathError> {
    Ok(Self::new(data_file()?))
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn temp_path(&self) -> PathBuf {
    let mut name = self
      .path
      .file_name()
      .map(|n| n.to_os_string())
      .unwrap_or_else(|| OsString::from("entry_points.json"));
    name.push(".tmp");
    self.path.with_file_name(name)
  }

  fn ensure_parent(&self) -> Result<(), StoreError> {
    match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => {
        fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
          path: parent.to_path_buf(),
          source,
        })
      }
      _ => Ok(()),
    }
  }
}

impl StoreBackend for JsonBackend {
  /// Reads the cache file, creating it with an empty document if absent.
  fn load(&self) -> Result<StoreMap, StoreError> {
    let content = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "initializing empty entry point cache");
        let empty = StoreMap::new();
        self.persist(&empty)?;
        return Ok(empty);
      }
      Err(source) => {
        return Err(StoreError::Read {
          path: self.path.clone(),
          source,
        });
      }
    };

    serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
      path: self.path.clone(),
      source,
    })
  }

  /// Writes to a sibling temp file, then renames it over the cache file.
  fn persist(&self, entries: &StoreMap) -> Result<(), StoreError> {
    self.ensure_parent()?;

    let temp_path = self.temp_path();
    let content = serde_json::to_string_pretty(entries).map_err(StoreError::Serialize)?;
    fs::write(&temp_path, &content).map_err(|source| StoreError::Write {
      path: temp_path.clone(),
      source,
    })?;
    if let Err(source) = fs::rename(&temp_path, &self.path) {
      let _ = fs::remove_file(&temp_path);
      return Err(StoreError::Write {
        path: self.path.clone(),
        source,
      });
    }

    debug!(path = %self.path.display(), distributions = entries.len(), "wrote entry point cache");
    Ok(())
  }

  fn location(&self) -> String {
    self.path.display().to_string()
  }
}
