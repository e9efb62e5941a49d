//! Entry point declarations.
//!
//! An entry point is declared as a spec string of the form
//!
//! ```text
//! name = module.path:attr.path [extra1, extra2]
//! ```
//!
//! where the attribute path and the extras list are optional. The cache stores
//! spec strings verbatim; [`EntryPoint::parse`] turns them back into structured
//! values on read.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static SPEC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^(?P<name>[^=]+?)\s*=\s*(?P<module>\w+(?:\.\w+)*)\s*(?::\s*(?P<attr>\w+(?:\.\w+)*))?\s*(?:\[(?P<extras>[^\]]*)\])?$",
  )
  .expect("entry point spec pattern is valid")
});

/// Errors raised while decoding entry point spec strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
  #[error("malformed entry point spec '{spec}': {reason}")]
  Malformed { spec: String, reason: &'static str },
}

impl SpecError {
  fn malformed(spec: &str, reason: &'static str) -> Self {
    SpecError::Malformed {
      spec: spec.to_string(),
      reason,
    }
  }
}

/// A named registration pointing at an importable target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntryPoint {
  pub name: String,
  /// Dotted module path, e.g. `pkg.plugins`.
  pub module: String,
  /// Dotted attribute path inside the module, if any.
  pub attr: Option<String>,
  pub extras: Vec<String>,
}

impl EntryPoint {
  /// Parse a spec string of the form `name = module:attr [extras]`.
  pub fn parse(spec: &str) -> Result<Self, SpecError> {
    let trimmed = spec.trim();
    let captures = SPEC_PATTERN
      .captures(trimmed)
      .ok_or_else(|| SpecError::malformed(spec, "expected 'name = module:attr [extras]'"))?;

    let name = captures["name"].trim();
    if name.is_empty() {
      return Err(SpecError::malformed(spec, "entry point name is empty"));
    }

    let extras = match captures.name("extras") {
      Some(list) => parse_extras(spec, list.as_str())?,
      None => Vec::new(),
    };

    Ok(Self {
      name: name.to_string(),
      module: captures["module"].to_string(),
      attr: captures.name("attr").map(|m| m.as_str().to_string()),
      extras,
    })
  }

  /// The import target, `module:attr` or just `module`.
  pub fn target(&self) -> String {
    match &self.attr {
      Some(attr) => format!("{}:{}", self.module, attr),
      None => self.module.clone(),
    }
  }
}

fn parse_extras(spec: &str, list: &str) -> Result<Vec<String>, SpecError> {
  if list.trim().is_empty() {
    return Ok(Vec::new());
  }

  list
    .split(',')
    .map(|extra| {
      let extra = extra.trim();
      if extra.is_empty() {
        Err(SpecError::malformed(spec, "empty extra in extras list"))
      } else {
        Ok(extra.to_string())
      }
    })
    .collect()
}

impl FromStr for EntryPoint {
  type Err = SpecError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

/// Renders the canonical spec string.
impl fmt::Display for EntryPoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} = {}", self.name, self.target())?;
    if !self.extras.is_empty() {
      write!(f, " [{}]", self.extras.join(","))?;
    }
    Ok(())
  }
}

/// Name part of a raw `name = target` declaration.
pub fn declaration_name(declaration: &str) -> Result<&str, SpecError> {
  match declaration.split_once('=') {
    Some((name, _)) if !name.trim().is_empty() => Ok(name.trim()),
    Some(_) => Err(SpecError::malformed(declaration, "entry point name is empty")),
    None => Err(SpecError::malformed(declaration, "missing '='")),
  }
}
