//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output: colored status
//! messages, entry point maps, and JSON output.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};
use reentry_lib::store::EntryPointMap;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
  pub const REMOVE: &str = "-";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    format!("{}m {}s", secs / 60, secs % 60)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

/// Spec strings of an entry point map, for JSON output.
pub fn spec_strings(map: &EntryPointMap) -> BTreeMap<&str, BTreeMap<&str, String>> {
  map
    .iter()
    .map(|(group, entries)| {
      let specs = entries
        .iter()
        .map(|(name, ep)| (name.as_str(), ep.to_string()))
        .collect();
      (group.as_str(), specs)
    })
    .collect()
}

/// Print groups and their entry points, indented by `indent` spaces.
pub fn print_entry_point_map(map: &EntryPointMap, indent: usize) {
  let pad = " ".repeat(indent);
  for (group, entries) in map {
    println!("{}{}", pad, group.if_supports_color(Stream::Stdout, |s| s.cyan()));
    for (name, ep) in entries {
      println!(
        "{}  {} {} {}",
        pad,
        name,
        symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.dimmed()),
        ep.target()
      );
    }
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
