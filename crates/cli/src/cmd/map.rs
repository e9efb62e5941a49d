//! Implementation of the `reentry map` command.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use reentry_lib::Selector;
use reentry_lib::store::EntryPointMap;

use super::open_store;
use crate::output::{OutputFormat, print_entry_point_map, print_info, print_json, spec_strings};

/// Execute the map command.
///
/// Without `dists` the map is printed per distribution. With `dists` the
/// matches of all named distributions are merged into one map.
pub fn cmd_map(
  data_file: &Path,
  dists: Vec<String>,
  groups: Vec<String>,
  names: Vec<String>,
  output: OutputFormat,
) -> Result<()> {
  let store = open_store(data_file)?;
  let groups = Selector::from_values(groups);
  let names = Selector::from_values(names);

  if !dists.is_empty() {
    let map = store.query(Selector::from_values(dists), groups, names)?;
    if output.is_json() {
      return print_json(&spec_strings(&map));
    }
    if map.is_empty() {
      print_info("No matching entry points");
    }
    print_entry_point_map(&map, 0);
    return Ok(());
  }

  let mut per_dist: BTreeMap<String, EntryPointMap> = BTreeMap::new();
  for dist in store.distribution_names() {
    let map = store.query(dist.as_str(), groups.clone(), names.clone())?;
    if !map.is_empty() {
      per_dist.insert(dist, map);
    }
  }

  if output.is_json() {
    let json: BTreeMap<&str, _> = per_dist
      .iter()
      .map(|(dist, map)| (dist.as_str(), spec_strings(map)))
      .collect();
    return print_json(&json);
  }

  if per_dist.is_empty() {
    print_info("No matching entry points");
    return Ok(());
  }

  for (dist, map) in &per_dist {
    println!("{}", dist.bold());
    print_entry_point_map(map, 2);
  }

  Ok(())
}
