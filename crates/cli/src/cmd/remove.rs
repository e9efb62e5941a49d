//! Implementation of the `reentry remove` commands.

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;
use owo_colors::OwoColorize;
use tracing::debug;

use super::open_store;
use crate::output::{print_info, symbols};

#[derive(Subcommand, Debug)]
pub enum RemoveCommand {
  /// Remove all entry points of a distribution
  Dist {
    /// Distribution name
    name: String,
  },

  /// Remove a group from every distribution
  Group {
    /// Group name
    name: String,
  },
}

pub fn cmd_remove(data_file: &Path, command: RemoveCommand) -> Result<()> {
  let mut store = open_store(data_file)?;

  match command {
    RemoveCommand::Dist { name } => {
      let cached = store.distribution_names().contains(&name);
      store.remove_distribution(&name)?;
      if cached {
        println!("  {} Removed distribution {}", symbols::REMOVE.red(), name);
      } else {
        print_info(&format!("Distribution {} was not cached", name));
      }
    }
    RemoveCommand::Group { name } => {
      let cached = store.group_names().contains(&name);
      store.remove_group(&name)?;
      if cached {
        println!("  {} Removed group {}", symbols::REMOVE.red(), name);
      } else {
        print_info(&format!("Group {} was not cached", name));
      }
    }
  }

  debug!(path = %data_file.display(), "cache updated");
  Ok(())
}
