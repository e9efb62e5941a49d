//! Implementation of the `reentry info` command.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use super::open_store;
use crate::output::{OutputFormat, print_json, print_stat};

#[derive(Debug, Serialize)]
struct InfoOutput {
  data_file: String,
  distributions: usize,
  groups: usize,
  entry_points: usize,
}

pub fn cmd_info(data_file: &Path, output: OutputFormat) -> Result<()> {
  let store = open_store(data_file)?;

  let info = InfoOutput {
    data_file: data_file.display().to_string(),
    distributions: store.distribution_names().len(),
    groups: store.group_names().len(),
    entry_points: store
      .entries()
      .values()
      .flat_map(|groups| groups.values())
      .map(|entries| entries.len())
      .sum(),
  };

  if output.is_json() {
    return print_json(&info);
  }

  println!("Entry point cache:");
  print_stat("File", &info.data_file);
  print_stat("Distributions", &info.distributions.to_string());
  print_stat("Groups", &info.groups.to_string());
  print_stat("Entry points", &info.entry_points.to_string());
  Ok(())
}
