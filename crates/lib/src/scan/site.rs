//! Installed distributions found in site directories.
//!
//! # Layout
//!
//! ```text
//! site-packages/
//! ├── pkg_a-1.0.dist-info/
//! │   ├── METADATA            # "Name: pkg-a" header
//! │   └── entry_points.txt
//! └── pkg_b-2.1-py3.12.egg-info/
//!     ├── PKG-INFO
//!     └── entry_points.txt
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{Discovered, Distribution, DistributionSource, RawEntryMap, RawGroup, ScanError, SkippedDistribution};
use crate::platform::paths::{env_site_dirs, virtualenv_site_dirs};

const ENTRY_POINTS_FILENAME: &str = "entry_points.txt";

/// Metadata directory suffixes and the file holding their `Name:` header.
const METADATA_KINDS: &[(&str, &str)] = &[(".dist-info", "METADATA"), (".egg-info", "PKG-INFO")];

/// Distributions installed in a set of site directories.
#[derive(Debug, Clone)]
pub struct SitePackages {
  dirs: Vec<PathBuf>,
}

impl SitePackages {
  /// Use the given site directories, de-duplicated after canonicalization.
  pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
    let mut seen = BTreeSet::new();
    let dirs = dirs
      .into_iter()
      .map(|dir| dunce::canonicalize(&dir).unwrap_or(dir))
      .filter(|dir| seen.insert(dir.clone()))
      .collect();
    Self { dirs }
  }

  /// Site directories from `REENTRY_SITE_DIRS`, falling back to the active virtualenv.
  pub fn discover() -> Result<Self, ScanError> {
    let mut dirs = env_site_dirs();
    if dirs.is_empty() {
      dirs = virtualenv_site_dirs();
    }
    if dirs.is_empty() {
      return Err(ScanError::NoSiteDirs);
    }
    Ok(Self::new(dirs))
  }

  pub fn dirs(&self) -> &[PathBuf] {
    &self.dirs
  }

  fn scan_dir(&self, dir: &Path, found: &mut Vec<Discovered>) -> Result<(), ScanError> {
    if !dir.is_dir() {
      warn!(path = %dir.display(), "site directory does not exist");
      return Ok(());
    }

    let walker = WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name();
    for entry in walker {
      let entry = entry.map_err(|source| ScanError::Walk {
        path: dir.to_path_buf(),
        source,
      })?;
      // Follows symlinked metadata directories
      if !entry.path().is_dir() {
        continue;
      }

      let file_name = entry.file_name().to_string_lossy();
      let Some((suffix, metadata_file)) = METADATA_KINDS
        .iter()
        .find(|(suffix, _)| file_name.ends_with(suffix))
      else {
        continue;
      };

      match read_distribution(entry.path(), &file_name, suffix, metadata_file) {
        Ok(Some(dist)) => found.push(Ok(dist)),
        Ok(None) => {}
        Err(e) => {
          debug!(path = %entry.path().display(), error = %e, "unreadable distribution metadata");
          found.push(Err(SkippedDistribution {
            name: fallback_name(&file_name, suffix),
            reason: e.to_string(),
          }));
        }
      }
    }

    Ok(())
  }
}

impl DistributionSource for SitePackages {
  fn distributions(&self) -> Result<Vec<Discovered>, ScanError> {
    let mut found = Vec::new();
    for dir in &self.dirs {
      self.scan_dir(dir, &mut found)?;
    }
    Ok(found)
  }
}

/// The distribution described by one metadata directory, or `None` if it
/// declares no entry points.
fn read_distribution(
  meta_dir: &Path,
  dir_name: &str,
  suffix: &str,
  metadata_file: &str,
) -> Result<Option<Distribution>, ScanError> {
  let entry_points_path = meta_dir.join(ENTRY_POINTS_FILENAME);
  let content = match fs::read_to_string(&entry_points_path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
    Err(source) => {
      return Err(ScanError::Read {
        path: entry_points_path,
        source,
      });
    }
  };

  let name = match read_project_name(&meta_dir.join(metadata_file))? {
    Some(name) => name,
    None => fallback_name(dir_name, suffix),
  };
  debug!(distribution = %name, path = %meta_dir.display(), "found distribution");

  Ok(Some(Distribution {
    name,
    entry_points: parse_entry_points_txt(&content, &entry_points_path)?,
  }))
}

/// Parse the INI-style `entry_points.txt` of a distribution.
pub fn parse_entry_points_txt(content: &str, path: &Path) -> Result<RawEntryMap, ScanError> {
  let mut map = RawEntryMap::new();
  let mut current: Option<String> = None;

  for (idx, line) in content.lines().enumerate() {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
      continue;
    }

    if let Some(rest) = line.strip_prefix('[') {
      let group = rest.strip_suffix(']').map(str::trim).unwrap_or_default();
      if group.is_empty() {
        return Err(ScanError::Malformed {
          path: path.to_path_buf(),
          line: idx + 1,
          message: "invalid group header",
        });
      }
      map
        .entry(group.to_string())
        .or_insert_with(|| RawGroup::Declarations(Vec::new()));
      current = Some(group.to_string());
      continue;
    }

    let Some(group) = &current else {
      return Err(ScanError::Malformed {
        path: path.to_path_buf(),
        line: idx + 1,
        message: "declaration outside of a group section",
      });
    };

    if let Some(RawGroup::Declarations(lines)) = map.get_mut(group) {
      lines.push(line.to_string());
    }
  }

  Ok(map)
}

/// The `Name:` header of a METADATA or PKG-INFO file, if present.
///
/// Older PKG-INFO files are not always UTF-8; invalid bytes are replaced.
fn read_project_name(path: &Path) -> Result<Option<String>, ScanError> {
  let content = match fs::read(path) {
    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
    Err(source) => {
      return Err(ScanError::Read {
        path: path.to_path_buf(),
        source,
      });
    }
  };

  // Headers end at the first blank line
  Ok(
    content
      .lines()
      .take_while(|line| !line.trim().is_empty())
      .find_map(|line| line.strip_prefix("Name:"))
      .map(|name| name.trim().to_string())
      .filter(|name| !name.is_empty()),
  )
}

/// `pkg_a-1.0.dist-info` -> `pkg_a`
fn fallback_name(dir_name: &str, suffix: &str) -> String {
  let stem = dir_name.strip_suffix(suffix).unwrap_or(dir_name);
  stem.split('-').next().unwrap_or(stem).to_string()
}
