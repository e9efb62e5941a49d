//! Implementation of the `reentry scan` command.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use reentry_lib::scan::{GroupFilter, ScanReport, SitePackages, scan};

use super::open_store;
use crate::output::{OutputFormat, format_duration, print_info, print_json, print_success, print_warning, symbols};

/// Execute the scan command.
///
/// With `regex` set, `groups` are regular expressions matched from the start
/// of each group name; an empty pattern list then means there is nothing to
/// scan. Without `regex`, `groups` are exact group names and an empty list
/// scans every group.
pub fn cmd_scan(
  data_file: &Path,
  groups: &[String],
  regex: bool,
  site_dirs: Vec<PathBuf>,
  output: OutputFormat,
) -> Result<()> {
  let start = Instant::now();

  if regex && groups.is_empty() {
    if output.is_json() {
      print_json(&ScanReport::default())?;
    } else {
      print_info("No patterns given, nothing to scan");
    }
    return Ok(());
  }

  let filter = GroupFilter::from_patterns(groups, regex)?;
  let source = if site_dirs.is_empty() {
    SitePackages::discover()?
  } else {
    SitePackages::new(site_dirs)
  };

  let mut store = open_store(data_file)?;
  let report = scan(&mut store, &source, &filter).context("Failed to scan for entry points")?;

  if output.is_json() {
    return print_json(&report);
  }

  for name in &report.updated {
    println!("  {} {}", symbols::SUCCESS.green(), name);
  }
  for skipped in &report.skipped {
    print_warning(&format!("Skipped {}: {}", skipped.name, skipped.reason));
  }

  print_success(&format!(
    "Scanned {} distribution(s), cached {} in {}",
    report.scanned,
    report.updated.len(),
    format_duration(start.elapsed())
  ));

  Ok(())
}
