mod endpoints;
mod records;
mod types;

use std::fmt;

pub use endpoints::{ApiMethod, ArgumentShape, EndpointCandidate};
#[cfg(test)]
pub(crate) use endpoints::strip_query;
pub use records::{FieldDef, RecordDef};
use serde::{Deserialize, Serialize};
pub use types::{RustPrimitive, TypeRef};

/// Ordered name tokens derived from an href and a link relation.
///
/// Displayed joined by `.`, e.g. `entries.locations.list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Crumbs(Vec<String>);

impl Crumbs {
  pub fn new(crumbs: Vec<String>) -> Self {
    Self(crumbs)
  }

  pub fn as_slice(&self) -> &[String] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn last(&self) -> Option<&str> {
    self.0.last().map(String::as_str)
  }

  /// Every crumb but the verb: the path of the owning resource class.
  pub fn class_path(&self) -> &[String] {
    self.0.split_last().map_or(&[], |(_, rest)| rest)
  }

  pub fn dotted(&self) -> String {
    self.0.join(".")
  }
}

impl fmt::Display for Crumbs {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.dotted())
  }
}

impl From<Vec<String>> for Crumbs {
  fn from(crumbs: Vec<String>) -> Self {
    Self(crumbs)
  }
}

impl<const N: usize> From<[&str; N]> for Crumbs {
  fn from(crumbs: [&str; N]) -> Self {
    Self(crumbs.into_iter().map(str::to_string).collect())
  }
}

impl From<&[String]> for Crumbs {
  fn from(crumbs: &[String]) -> Self {
    Self(crumbs.to_vec())
  }
}
