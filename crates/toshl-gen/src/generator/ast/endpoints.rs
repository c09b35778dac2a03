use super::{Crumbs, RecordDef};

/// Root argument record of a link plus the nested records it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentShape {
  pub root: RecordDef,
  /// Nested records, each after the record that references it.
  pub nested: Vec<RecordDef>,
}

impl ArgumentShape {
  pub fn name(&self) -> &str {
    &self.root.name
  }

  /// The root record followed by its nested records.
  pub fn records(&self) -> impl Iterator<Item = &RecordDef> {
    std::iter::once(&self.root).chain(&self.nested)
  }
}

/// A callable endpoint derived from one link descriptor, before deduplication.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct EndpointCandidate {
  pub crumbs: Crumbs,
  #[builder(into)]
  pub method: String,
  #[builder(into)]
  pub href: String,
  pub argument: Option<ArgumentShape>,
  /// Return record name, resolved against the return-type registry.
  #[builder(into)]
  pub returns: Option<String>,
}

impl EndpointCandidate {
  /// Deduplication key: href without its query part, then the verb.
  pub fn dedup_key(&self) -> (&str, &str) {
    (strip_query(&self.href), self.method.as_str())
  }
}

/// The surviving endpoint for one (href, method) pair.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct ApiMethod {
  pub crumbs: Crumbs,
  #[builder(into)]
  pub method: String,
  #[builder(into)]
  pub href: String,
  /// Argument record name.
  #[builder(into)]
  pub argument: Option<String>,
  /// Return record name.
  #[builder(into)]
  pub returns: Option<String>,
}

impl ApiMethod {
  /// The verb the method is named after.
  pub fn verb(&self) -> &str {
    self.crumbs.last().unwrap_or_default()
  }
}

impl From<&EndpointCandidate> for ApiMethod {
  fn from(candidate: &EndpointCandidate) -> Self {
    Self {
      crumbs: candidate.crumbs.clone(),
      method: candidate.method.clone(),
      href: candidate.href.clone(),
      argument: candidate.argument.as_ref().map(|shape| shape.name().to_string()),
      returns: candidate.returns.clone(),
    }
  }
}

pub(crate) fn strip_query(href: &str) -> &str {
  href.split_once('?').map_or(href, |(path, _)| path)
}
