mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reentry_lib::platform::paths;
use tracing_subscriber::EnvFilter;

use cmd::RemoveCommand;
use output::OutputFormat;

/// reentry - manage your entry point cache
#[derive(Parser)]
#[command(name = "reentry")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Entry point cache file [env: REENTRY_DATA_FILE]
  #[arg(long, global = true, value_name = "PATH")]
  data_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Scan installed distributions for entry points to cache
  ///
  /// Scan only groups matching PATTERNs, or leave empty to scan all groups.
  Scan {
    /// Group names to scan
    #[arg(value_name = "PATTERN")]
    groups: Vec<String>,

    /// Treat PATTERNs as regular expressions
    #[arg(short, long)]
    regex: bool,

    /// Site directory to scan (repeatable; default: REENTRY_SITE_DIRS or the active virtualenv)
    #[arg(long = "site-dir", value_name = "DIR")]
    site_dirs: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Print a map of cached entry points
  Map {
    /// Limit map to a distribution (repeatable)
    #[arg(long)]
    dist: Vec<String>,

    /// Limit map to an entry point group (repeatable)
    #[arg(long)]
    group: Vec<String>,

    /// Limit map to entry points whose name matches this regular expression (repeatable)
    #[arg(long)]
    name: Vec<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show a single cached entry point
  Get {
    /// Entry point group
    group: String,

    /// Entry point name
    name: String,

    /// Only look in this distribution
    #[arg(long)]
    dist: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Remove cached entry points
  #[command(subcommand)]
  Remove(RemoveCommand),

  /// Remove every cached entry point
  Clear {
    /// Skip confirmation prompt
    #[arg(long)]
    force: bool,
  },

  /// Show cache location and contents summary
  Info {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let cli = Cli::parse();
  let data_file = match cli.data_file {
    Some(path) => path,
    None => paths::data_file().context("Failed to locate the entry point cache")?,
  };

  match cli.command {
    Commands::Scan {
      groups,
      regex,
      site_dirs,
      output,
    } => cmd::cmd_scan(&data_file, &groups, regex, site_dirs, output),
    Commands::Map {
      dist,
      group,
      name,
      output,
    } => cmd::cmd_map(&data_file, dist, group, name, output),
    Commands::Get {
      group,
      name,
      dist,
      output,
    } => cmd::cmd_get(&data_file, &group, &name, dist.as_deref(), output),
    Commands::Remove(command) => cmd::cmd_remove(&data_file, command),
    Commands::Clear { force } => cmd::cmd_clear(&data_file, force),
    Commands::Info { output } => cmd::cmd_info(&data_file, output),
  }
}
