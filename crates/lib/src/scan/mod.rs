//! Scanning installed distributions into the entry point cache.
//!
//! A [`DistributionSource`] enumerates installed distributions and their raw
//! entry point declarations; [`scan`] filters their groups and records them in
//! an [`EntryPointStore`].

mod site;

pub use site::{SitePackages, parse_entry_points_txt};

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::PathBuf;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::entrypoint::{EntryPoint, SpecError, declaration_name};
use crate::store::{EntryPointStore, StoreBackend, StoreError};

/// Entry points of one group, as declared by a distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawGroup {
  /// Plain `name = target [extras]` declaration lines.
  Declarations(Vec<String>),
  /// Declarations already keyed by entry point name.
  Named(BTreeMap<String, String>),
}

/// Group name -> declared entry points.
pub type RawEntryMap = BTreeMap<String, RawGroup>;

/// An installed distribution and its declared entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
  pub name: String,
  pub entry_points: RawEntryMap,
}

/// One installed distribution as found by a source, or why it could not be read.
pub type Discovered = Result<Distribution, SkippedDistribution>;

/// Something that can enumerate installed distributions.
///
/// A distribution whose metadata cannot be read is returned as skipped; the
/// outer error is reserved for failures of the source itself.
pub trait DistributionSource {
  fn distributions(&self) -> Result<Vec<Discovered>, ScanError>;
}

/// Errors that can occur while scanning.
#[derive(Debug, Error)]
pub enum ScanError {
  #[error("no site directories to scan (set REENTRY_SITE_DIRS, activate a virtualenv or pass --site-dir)")]
  NoSiteDirs,

  #[error("failed to walk {}: {source}", path.display())]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("{}:{line}: {message}", path.display())]
  Malformed {
    path: PathBuf,
    line: usize,
    message: &'static str,
  },

  #[error("invalid group pattern: {0}")]
  InvalidPattern(#[source] regex::Error),

  #[error(transparent)]
  Store(#[from] StoreError),
}

/// Which groups a scan records.
#[derive(Debug, Clone, Default)]
pub enum GroupFilter {
  #[default]
  All,
  /// Exact group names.
  Names(BTreeSet<String>),
  /// Groups matching any of the patterns, from the start of the group name.
  Pattern(Regex),
}

impl GroupFilter {
  /// Build a filter from command line patterns. No patterns selects all groups.
  pub fn from_patterns(patterns: &[String], use_regex: bool) -> Result<Self, ScanError> {
    if patterns.is_empty() {
      return Ok(GroupFilter::All);
    }
    if !use_regex {
      return Ok(GroupFilter::Names(patterns.iter().cloned().collect()));
    }

    let alternation = patterns
      .iter()
      .map(|p| format!("({})", p))
      .collect::<Vec<_>>()
      .join("|");
    let regex = Regex::new(&format!("^(?:{})", alternation)).map_err(ScanError::InvalidPattern)?;
    Ok(GroupFilter::Pattern(regex))
  }

  pub fn matches(&self, group: &str) -> bool {
    match self {
      GroupFilter::All => true,
      GroupFilter::Names(names) => names.contains(group),
      GroupFilter::Pattern(regex) => regex.is_match(group),
    }
  }
}

/// A distribution left out of the cache and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDistribution {
  pub name: String,
  pub reason: String,
}

/// Summary of a scan.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
  /// Number of distributions the source returned.
  pub scanned: usize,
  /// Distributions whose entry points were written to the cache.
  pub updated: Vec<String>,
  /// Distributions with no plugin entry points after filtering.
  pub unchanged: Vec<String>,
  pub skipped: Vec<SkippedDistribution>,
}

/// Key raw declarations by name and parse them.
pub fn normalize_entry_map(raw: RawEntryMap) -> Result<BTreeMap<String, BTreeMap<String, EntryPoint>>, SpecError> {
  let mut result = BTreeMap::new();
  for (group, declarations) in raw {
    let mut entries = BTreeMap::new();
    match declarations {
      RawGroup::Declarations(lines) => {
        for line in lines {
          let name = declaration_name(&line)?.to_string();
          entries.insert(name, EntryPoint::parse(&line)?);
        }
      }
      RawGroup::Named(named) => {
        for (name, declaration) in named {
          entries.insert(name, EntryPoint::parse(&declaration)?);
        }
      }
    }
    result.insert(group, entries);
  }
  Ok(result)
}

/// Record every distribution of `source` in `store`, keeping only groups
/// accepted by `filter`.
///
/// Distributions with malformed declarations are skipped and reported;
/// storage failures abort the scan.
pub fn scan<B: StoreBackend>(
  store: &mut EntryPointStore<B>,
  source: &impl DistributionSource,
  filter: &GroupFilter,
) -> Result<ScanReport, ScanError> {
  let distributions = source.distributions()?;
  let mut report = ScanReport {
    scanned: distributions.len(),
    ..Default::default()
  };

  for dist in distributions {
    let dist = match dist {
      Ok(dist) => dist,
      Err(skipped) => {
        warn!(distribution = %skipped.name, reason = %skipped.reason, "skipping unreadable distribution");
        report.skipped.push(skipped);
        continue;
      }
    };

    let raw: RawEntryMap = dist
      .entry_points
      .into_iter()
      .filter(|(group, _)| filter.matches(group))
      .collect();

    let entry_points = match normalize_entry_map(raw) {
      Ok(entry_points) => entry_points,
      Err(e) => {
        warn!(distribution = %dist.name, error = %e, "skipping distribution with malformed entry points");
        report.skipped.push(SkippedDistribution {
          name: dist.name,
          reason: e.to_string(),
        });
        continue;
      }
    };

    if store.upsert_distribution(&dist.name, entry_points)? {
      report.updated.push(dist.name);
    } else {
      report.unchanged.push(dist.name);
    }
  }

  info!(
    scanned = report.scanned,
    updated = report.updated.len(),
    skipped = report.skipped.len(),
    "scan complete"
  );
  Ok(report)
}
