//! Implementation of the `reentry clear` command.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use anyhow::{Result, bail};

use super::open_store;
use crate::output::{print_info, print_success};

pub fn cmd_clear(data_file: &Path, force: bool) -> Result<()> {
  let mut store = open_store(data_file)?;
  let count = store.distribution_names().len();

  if !confirm(
    &format!("Remove cached entry points of {} distribution(s)?", count),
    force,
  )? {
    print_info("Cancelled");
    return Ok(());
  }

  store.clear()?;
  print_success(&format!("Cleared {}", data_file.display()));
  Ok(())
}

/// Ask a yes/no question on stderr. `force` answers yes without asking.
fn confirm(message: &str, force: bool) -> Result<bool> {
  if force {
    return Ok(true);
  }

  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!("Cannot prompt for confirmation in non-interactive mode. Use --force to proceed.");
  }

  write!(io::stderr(), "{} [y/N] ", message)?;
  io::stderr().flush()?;

  let mut answer = String::new();
  io::stdin().read_line(&mut answer)?;

  Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
