mod clear;
mod get;
mod info;
mod map;
mod remove;
mod scan;

use std::path::Path;

use anyhow::{Context, Result};
use reentry_lib::EntryPointStore;

pub use clear::cmd_clear;
pub use get::cmd_get;
pub use info::cmd_info;
pub use map::cmd_map;
pub use remove::{RemoveCommand, cmd_remove};
pub use scan::cmd_scan;

fn open_store(data_file: &Path) -> Result<EntryPointStore> {
  EntryPointStore::open(data_file)
    .with_context(|| format!("Failed to open entry point cache {}", data_file.display()))
}
