//! Persistent entry point cache.
//!
//! The cache is a nested mapping held fully in memory and written back to its
//! backend after every mutation:
//!
//! ```text
//! distribution -> group -> entry point name -> spec string
//! ```
//!
//! Spec strings are stored as-is and parsed into [`EntryPoint`]s when read.
//!
//! # Concurrency
//!
//! There is no locking around the backing file. Two processes mutating the
//! same cache race, and the last one to write wins.

mod json;
mod selector;

pub use json::JsonBackend;
pub use selector::Selector;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io;
use std::path::PathBuf;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::entrypoint::{EntryPoint, SpecError};
use crate::platform::paths::PathError;

/// Entry point name -> spec string.
pub type GroupMap = BTreeMap<String, String>;

/// Group name -> entries of that group.
pub type DistributionMap = BTreeMap<String, GroupMap>;

/// Distribution name -> its groups. The persisted document has this shape.
pub type StoreMap = BTreeMap<String, DistributionMap>;

/// Group name -> entry point name -> parsed entry point.
pub type EntryPointMap = BTreeMap<String, BTreeMap<String, EntryPoint>>;

/// Groups that are not plugin registrations and are never cached.
pub const RESERVED_GROUPS: &[&str] = &[
  "console_scripts",
  "gui_scripts",
  "distutils.commands",
  "distutils.setup_keywords",
  "setuptools.installation",
  "setuptools.file_finders",
  "egg_info.writers",
];

/// Returns true if `group` is never stored in the cache.
pub fn is_reserved_group(group: &str) -> bool {
  RESERVED_GROUPS.contains(&group)
}

/// Errors that can occur when reading, writing or querying the cache.
#[derive(Debug, Error)]
pub enum StoreError {
  /// The backing document exists but is not a valid cache.
  #[error("entry point cache {} is corrupt: {source}", path.display())]
  Corrupt {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to read entry point cache {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write entry point cache {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to serialize entry point cache: {0}")]
  Serialize(#[source] serde_json::Error),

  /// A query named a distribution that is not cached.
  #[error("the {name} distribution was not found")]
  UnknownDistribution { name: String },

  #[error("invalid name pattern '{pattern}': {source}")]
  InvalidPattern {
    pattern: String,
    #[source]
    source: regex::Error,
  },

  #[error(transparent)]
  Spec(#[from] SpecError),

  #[error(transparent)]
  Location(#[from] PathError),
}

/// Storage format behind an [`EntryPointStore`].
pub trait StoreBackend {
  /// Read the full cache, initializing empty storage if there is none yet.
  fn load(&self) -> Result<StoreMap, StoreError>;

  /// Replace the stored cache with `entries`.
  fn persist(&self, entries: &StoreMap) -> Result<(), StoreError>;

  /// Human readable location, for logs and diagnostics.
  fn location(&self) -> String;
}

/// Result of [`EntryPointStore::get_entry_point`] when at least one entry matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPointMatch {
  Single(EntryPoint),
  /// Several distributions register the same group and name.
  Multiple(Vec<EntryPoint>),
}

impl EntryPointMatch {
  pub fn into_vec(self) -> Vec<EntryPoint> {
    match self {
      EntryPointMatch::Single(ep) => vec![ep],
      EntryPointMatch::Multiple(eps) => eps,
    }
  }
}

/// In-memory entry point cache bound to a backend.
#[derive(Debug)]
pub struct EntryPointStore<B: StoreBackend = JsonBackend> {
  backend: B,
  epmap: StoreMap,
}

impl EntryPointStore<JsonBackend> {
  /// Open the JSON cache at `path`, creating it if it doesn't exist.
  pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
    Self::with_backend(JsonBackend::new(path))
  }

  /// Open the JSON cache at the default location.
  pub fn open_default() -> Result<Self, StoreError> {
    Self::with_backend(JsonBackend::default_location()?)
  }
}

impl<B: StoreBackend> EntryPointStore<B> {
  pub fn with_backend(backend: B) -> Result<Self, StoreError> {
    let epmap = backend.load()?;
    debug!(location = %backend.location(), distributions = epmap.len(), "loaded entry point cache");
    Ok(Self { backend, epmap })
  }

  /// The raw cache contents, with unparsed spec strings.
  pub fn entries(&self) -> &StoreMap {
    &self.epmap
  }

  fn persist(&self) -> Result<(), StoreError> {
    self.backend.persist(&self.epmap)
  }

  /// Add or replace a distribution's entry points.
  ///
  /// Reserved groups are dropped and values are stored in their spec string
  /// form. Incoming groups replace same-named cached groups of the
  /// distribution; other cached groups are kept. If nothing is left after
  /// dropping reserved groups the cache is not touched.
  ///
  /// Returns whether the cache was written.
  pub fn upsert_distribution<V: fmt::Display>(
    &mut self,
    name: &str,
    entry_points: BTreeMap<String, BTreeMap<String, V>>,
  ) -> Result<bool, StoreError> {
    let groups: DistributionMap = entry_points
      .into_iter()
      .filter(|(group, _)| {
        let reserved = is_reserved_group(group);
        if reserved {
          debug!(distribution = %name, group = %group, "skipping reserved group");
        }
        !reserved
      })
      .map(|(group, entries)| {
        let specs = entries
          .into_iter()
          .map(|(ep_name, value)| (ep_name, value.to_string()))
          .collect();
        (group, specs)
      })
      .collect();

    if groups.is_empty() {
      debug!(distribution = %name, "no plugin entry points to cache");
      return Ok(false);
    }

    let group_count = groups.len();
    self.epmap.entry(name.to_string()).or_default().extend(groups);
    self.persist()?;

    info!(distribution = %name, groups = group_count, "cached entry points");
    Ok(true)
  }

  /// Remove a distribution's entry points. Unknown distributions are ignored.
  pub fn remove_distribution(&mut self, name: &str) -> Result<(), StoreError> {
    if self.epmap.remove(name).is_some() {
      info!(distribution = %name, "removed distribution from cache");
    }
    self.persist()
  }

  /// Remove a group from every distribution.
  pub fn remove_group(&mut self, group: &str) -> Result<(), StoreError> {
    for (dist, groups) in self.epmap.iter_mut() {
      if groups.remove(group).is_some() {
        debug!(distribution = %dist, group = %group, "removed group");
      }
    }
    self.persist()
  }

  /// Drop every cached entry point.
  pub fn clear(&mut self) -> Result<(), StoreError> {
    self.epmap.clear();
    info!(location = %self.backend.location(), "cleared entry point cache");
    self.persist()
  }

  pub fn distribution_names(&self) -> BTreeSet<String> {
    self.epmap.keys().cloned().collect()
  }

  /// Union of group names across all distributions.
  pub fn group_names(&self) -> BTreeSet<String> {
    self
      .epmap
      .values()
      .flat_map(|groups| groups.keys().cloned())
      .collect()
  }

  /// Look up an entry point by group and name.
  ///
  /// With `dist`, only that distribution is consulted. Without it every
  /// distribution is searched: one hit is returned as
  /// [`EntryPointMatch::Single`], several as [`EntryPointMatch::Multiple`].
  pub fn get_entry_point(
    &self,
    group: &str,
    name: &str,
    dist: Option<&str>,
  ) -> Result<Option<EntryPointMatch>, StoreError> {
    if let Some(dist) = dist {
      return Ok(self.lookup(dist, group, name)?.map(EntryPointMatch::Single));
    }

    let mut found = self.find_entry_points(group, name)?;
    Ok(match found.len() {
      0 => None,
      1 => found.pop().map(EntryPointMatch::Single),
      _ => Some(EntryPointMatch::Multiple(found)),
    })
  }

  /// Every distribution's registration of `group`/`name`, in distribution order.
  pub fn find_entry_points(&self, group: &str, name: &str) -> Result<Vec<EntryPoint>, StoreError> {
    let mut found = Vec::new();
    for dist in self.epmap.keys() {
      if let Some(ep) = self.lookup(dist, group, name)? {
        found.push(ep);
      }
    }
    Ok(found)
  }

  /// The first registration of `group`/`name`, in distribution order.
  pub fn first_entry_point(&self, group: &str, name: &str) -> Result<Option<EntryPoint>, StoreError> {
    Ok(self.find_entry_points(group, name)?.into_iter().next())
  }

  fn lookup(&self, dist: &str, group: &str, name: &str) -> Result<Option<EntryPoint>, StoreError> {
    let spec = self
      .epmap
      .get(dist)
      .and_then(|groups| groups.get(group))
      .and_then(|entries| entries.get(name))
      .filter(|spec| !spec.is_empty());

    match spec {
      Some(spec) => Ok(Some(EntryPoint::parse(spec)?)),
      None => Ok(None),
    }
  }

  /// All entry points of one distribution. Unknown distributions yield an empty map.
  pub fn get_distribution_map(&self, dist: &str) -> Result<EntryPointMap, StoreError> {
    let Some(groups) = self.epmap.get(dist) else {
      return Ok(EntryPointMap::new());
    };

    let mut result = EntryPointMap::new();
    for (group, entries) in groups {
      let parsed = entries
        .iter()
        .map(|(name, spec)| Ok((name.clone(), EntryPoint::parse(spec)?)))
        .collect::<Result<BTreeMap<_, _>, SpecError>>()?;
      result.insert(group.clone(), parsed);
    }
    Ok(result)
  }

  /// Query the cache by distribution, group and entry point name.
  ///
  /// Each axis defaults to everything when given [`Selector::All`]. Name
  /// selectors are regular expressions matched from the start of the entry
  /// point name. Matches from all selected distributions are merged into one
  /// map; if two distributions register the same group and name, the later
  /// distribution in name order overwrites the earlier one.
  ///
  /// # Errors
  ///
  /// Fails with [`StoreError::UnknownDistribution`] if a selected
  /// distribution is not cached.
  pub fn query(
    &self,
    dist: impl Into<Selector<String>>,
    group: impl Into<Selector<String>>,
    name: impl Into<Selector<String>>,
  ) -> Result<EntryPointMap, StoreError> {
    let dists = dist.into().into_set().unwrap_or_else(|| self.distribution_names());
    let groups = group.into().into_set();
    let patterns = compile_name_patterns(name.into())?;

    let mut result = EntryPointMap::new();
    for dist in &dists {
      let dist_map = self
        .epmap
        .get(dist)
        .ok_or_else(|| StoreError::UnknownDistribution { name: dist.clone() })?;

      for (group_name, entries) in dist_map {
        if groups.as_ref().is_some_and(|wanted| !wanted.contains(group_name)) {
          continue;
        }

        let mut matched = BTreeMap::new();
        for (ep_name, spec) in entries {
          let keep = patterns
            .as_ref()
            .is_none_or(|patterns| patterns.iter().any(|re| re.is_match(ep_name)));
          if keep {
            matched.insert(ep_name.clone(), EntryPoint::parse(spec)?);
          }
        }

        if !matched.is_empty() {
          result.entry(group_name.clone()).or_default().extend(matched);
        }
      }
    }

    Ok(result)
  }

  /// Iterate over the entry points of `group` across all distributions.
  pub fn iter_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = Result<EntryPoint, SpecError>> + 'a {
    self
      .epmap
      .values()
      .filter_map(move |groups| groups.get(group))
      .flat_map(|entries| entries.values())
      .map(|spec| EntryPoint::parse(spec))
  }
}

/// Compile name patterns, anchored at the start of the name.
///
/// An empty pattern list filters nothing.
fn compile_name_patterns(selector: Selector<String>) -> Result<Option<Vec<Regex>>, StoreError> {
  let Some(patterns) = selector.into_values() else {
    return Ok(None);
  };
  if patterns.is_empty() {
    return Ok(None);
  }

  patterns
    .into_iter()
    .map(|pattern| {
      Regex::new(&format!("^(?:{})", pattern)).map_err(|source| StoreError::InvalidPattern { pattern, source })
    })
    .collect::<Result<Vec<_>, _>>()
    .map(Some)
}
