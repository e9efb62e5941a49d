use std::path::PathBuf;

use thiserror::Error;

use crate::consts::{APP_NAME, DATA_FILE_ENV, DATA_FILENAME, SITE_DIRS_ENV};

/// Errors resolving per-user locations.
#[derive(Debug, Error)]
pub enum PathError {
  #[error("cannot determine the home directory (set HOME or REENTRY_DATA_FILE)")]
  NoHomeDirectory,
}

fn non_empty_var(name: &str) -> Option<PathBuf> {
  std::env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Result<PathBuf, PathError> {
  non_empty_var("USERPROFILE").ok_or(PathError::NoHomeDirectory)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Result<PathBuf, PathError> {
  non_empty_var("HOME").ok_or(PathError::NoHomeDirectory)
}

/// Returns the directory for data files for the application
#[cfg(windows)]
pub fn data_dir() -> Result<PathBuf, PathError> {
  let data_home = match non_empty_var("APPDATA") {
    Some(appdata) => appdata,
    None => home_dir()?,
  };
  Ok(data_home.join(APP_NAME))
}

/// Returns the directory for data files for the application
#[cfg(not(windows))]
pub fn data_dir() -> Result<PathBuf, PathError> {
  let data_home = match non_empty_var("XDG_DATA_HOME") {
    Some(data_home) => data_home,
    None => home_dir()?.join(".local").join("share"),
  };
  Ok(data_home.join(APP_NAME))
}

/// Returns the entry point cache file.
///
/// `REENTRY_DATA_FILE` takes precedence over the data directory default.
pub fn data_file() -> Result<PathBuf, PathError> {
  match non_empty_var(DATA_FILE_ENV) {
    Some(path) => Ok(path),
    None => Ok(data_dir()?.join(DATA_FILENAME)),
  }
}

/// Site directories listed in `REENTRY_SITE_DIRS`, in order.
pub fn env_site_dirs() -> Vec<PathBuf> {
  std::env::var_os(SITE_DIRS_ENV)
    .map(|value| std::env::split_paths(&value).filter(|p| !p.as_os_str().is_empty()).collect())
    .unwrap_or_default()
}

/// Site directories of the active virtualenv, if `VIRTUAL_ENV` is set.
#[cfg(windows)]
pub fn virtualenv_site_dirs() -> Vec<PathBuf> {
  std::env::var_os("VIRTUAL_ENV")
    .map(|venv| vec![PathBuf::from(venv).join("Lib").join("site-packages")])
    .unwrap_or_default()
}

/// Site directories of the active virtualenv, if `VIRTUAL_ENV` is set.
///
/// Every `lib/python*/site-packages` below the environment root is returned.
#[cfg(not(windows))]
pub fn virtualenv_site_dirs() -> Vec<PathBuf> {
  let Some(venv) = std::env::var_os("VIRTUAL_ENV") else {
    return Vec::new();
  };
  let lib = PathBuf::from(venv).join("lib");
  let Ok(entries) = std::fs::read_dir(&lib) else {
    return Vec::new();
  };

  let mut dirs: Vec<PathBuf> = entries
    .flatten()
    .filter(|entry| entry.file_name().to_string_lossy().starts_with("python"))
    .map(|entry| entry.path().join("site-packages"))
    .filter(|path| path.is_dir())
    .collect();
  dirs.sort();
  dirs
}
