//! Implementation of the `reentry get` command.

use std::path::Path;

use anyhow::{Result, bail};
use reentry_lib::EntryPointMatch;

use super::open_store;
use crate::output::{OutputFormat, print_json, print_stat, print_warning};

pub fn cmd_get(data_file: &Path, group: &str, name: &str, dist: Option<&str>, output: OutputFormat) -> Result<()> {
  let store = open_store(data_file)?;

  let Some(found) = store.get_entry_point(group, name, dist)? else {
    match dist {
      Some(dist) => bail!("No entry point '{}' in group '{}' of {}", name, group, dist),
      None => bail!("No entry point '{}' in group '{}'", name, group),
    }
  };

  if output.is_json() {
    return match &found {
      EntryPointMatch::Single(ep) => print_json(ep),
      EntryPointMatch::Multiple(eps) => print_json(eps),
    };
  }

  if let EntryPointMatch::Multiple(eps) = &found {
    print_warning(&format!(
      "{} distributions register '{}' in group '{}'",
      eps.len(),
      name,
      group
    ));
  }

  for ep in found.into_vec() {
    println!("{}", ep);
    print_stat("Module", &ep.module);
    if let Some(attr) = &ep.attr {
      print_stat("Attribute", attr);
    }
    if !ep.extras.is_empty() {
      print_stat("Extras", &ep.extras.join(", "));
    }
  }

  Ok(())
}
