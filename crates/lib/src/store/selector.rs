use std::collections::BTreeSet;

/// Selects values along one query axis (distributions, groups or name patterns).
///
/// `All` leaves the axis unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector<T> {
  #[default]
  All,
  One(T),
  Many(Vec<T>),
}

impl<T> Selector<T> {
  /// Build a selector from a possibly empty list; an empty list selects everything.
  pub fn from_values(mut values: Vec<T>) -> Self {
    match values.len() {
      0 => Selector::All,
      1 => Selector::One(values.remove(0)),
      _ => Selector::Many(values),
    }
  }

  /// The selected values, or `None` for `All`.
  pub fn into_values(self) -> Option<Vec<T>> {
    match self {
      Selector::All => None,
      Selector::One(value) => Some(vec![value]),
      Selector::Many(values) => Some(values),
    }
  }
}

impl<T: Ord> Selector<T> {
  /// The selected values as a set, or `None` for `All`.
  pub fn into_set(self) -> Option<BTreeSet<T>> {
    self.into_values().map(|values| values.into_iter().collect())
  }
}

impl From<&str> for Selector<String> {
  fn from(value: &str) -> Self {
    Selector::One(value.to_string())
  }
}

impl From<String> for Selector<String> {
  fn from(value: String) -> Self {
    Selector::One(value)
  }
}

impl From<&String> for Selector<String> {
  fn from(value: &String) -> Self {
    Selector::One(value.clone())
  }
}

impl<T> From<Vec<T>> for Selector<T> {
  fn from(values: Vec<T>) -> Self {
    Selector::Many(values)
  }
}

impl From<Vec<&str>> for Selector<String> {
  fn from(values: Vec<&str>) -> Self {
    Selector::Many(values.into_iter().map(str::to_string).collect())
  }
}

impl<const N: usize> From<[&str; N]> for Selector<String> {
  fn from(values: [&str; N]) -> Self {
    Selector::Many(values.into_iter().map(str::to_string).collect())
  }
}

impl<T> From<Option<T>> for Selector<T> {
  fn from(value: Option<T>) -> Self {
    match value {
      Some(value) => Selector::One(value),
      None => Selector::All,
    }
  }
}
