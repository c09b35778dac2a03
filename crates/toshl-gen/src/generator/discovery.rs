//! Derives endpoint candidates from the link descriptors embedded in each definition.

use std::str::FromStr;

use http::Method;
use serde_json::{Map, Value};

use super::{
  ast::{ArgumentShape, Crumbs, EndpointCandidate, RecordDef},
  materialize::MaterializedSchema,
  metrics::GenerationWarning,
  records::{RecordMode, RecordSet},
  registry::ReturnTypeRegistry,
};
use crate::{
  naming::identifiers::{capitalize_crumb, shorten_negation, to_rust_type_name},
  utils::ValueExt,
};

/// Verbs whose endpoints hand back the definition's own record.
const RETURNING_VERBS: &[&str] = &["get", "list", "update"];

/// Splits an href into crumbs and appends the link relation.
///
/// Placeholder segments and query suffixes are dropped before the result is
/// simplified with [`simplify_crumbs`].
pub fn derive_crumbs(href: &str, rel: &str) -> Crumbs {
  let mut crumbs: Vec<String> = href
    .split('/')
    .filter(|segment| !segment.is_empty() && !segment.starts_with('{'))
    .map(|segment| segment.split_once('?').map_or(segment, |(path, _)| path).to_string())
    .filter(|segment| !segment.is_empty())
    .collect();
  if !rel.is_empty() {
    crumbs.push(rel.to_string());
  }
  simplify_crumbs(Crumbs::new(crumbs))
}

/// `self` becomes `get`, then a verb repeating the previous crumb is dropped.
pub fn simplify_crumbs(crumbs: Crumbs) -> Crumbs {
  let mut crumbs = crumbs.as_slice().to_vec();

  if let Some(last) = crumbs.last_mut()
    && *last == "self"
  {
    *last = "get".to_string();
  }

  if let [.., previous, last] = crumbs.as_slice()
    && previous == last
  {
    crumbs.pop();
  }

  Crumbs::new(crumbs)
}

/// Return-type guesses for a definition, most specific first: its title, then
/// its dotted name with each segment capitalized and a trailing `List` dropped.
pub fn return_guesses(definition_name: &str, definition: &Map<String, Value>) -> Vec<String> {
  let mut guesses = Vec::with_capacity(2);

  if let Some(title) = definition.str_field("title") {
    guesses.push(title.to_string());
  }

  let mut parts: Vec<String> = definition_name.split('.').map(capitalize_crumb).collect();
  if parts.len() > 1 && parts.last().is_some_and(|part| part == "List") {
    parts.pop();
  }
  guesses.push(parts.concat());

  guesses
}

/// Renames `exclamation_mark_*` fields to `not_*`, keeping their wire names.
pub fn shorten_negated_fields(record: &mut RecordDef) {
  for index in 0..record.fields.len() {
    let Some(short) = shorten_negation(&record.fields[index].name) else {
      continue;
    };
    if record.field(&short).is_none() {
      record.fields[index].name = short;
    }
  }
}

/// Walks every definition's links in name order.
pub struct EndpointDiscovery<'a> {
  registry: &'a ReturnTypeRegistry,
  warnings: Vec<GenerationWarning>,
}

impl<'a> EndpointDiscovery<'a> {
  pub fn new(registry: &'a ReturnTypeRegistry) -> Self {
    Self {
      registry,
      warnings: Vec::new(),
    }
  }

  pub fn discover(mut self, schema: &MaterializedSchema) -> (Vec<EndpointCandidate>, Vec<GenerationWarning>) {
    let mut candidates = Vec::new();

    for (name, definition) in schema.definitions() {
      let Some(links) = definition.get("links").and_then(Value::as_array) else {
        continue;
      };
      for link in links {
        if let Some(candidate) = self.candidate(name, definition, link) {
          candidates.push(candidate);
        }
      }
    }

    (candidates, self.warnings)
  }

  fn candidate(
    &mut self,
    definition_name: &str,
    definition: &Map<String, Value>,
    link: &Value,
  ) -> Option<EndpointCandidate> {
    let (Some(href), Some(rel)) = (link.str_field("href"), link.str_field("rel")) else {
      self.skip(definition_name, "link has no href or rel");
      return None;
    };

    let method = match link.str_field("method").map(Method::from_str) {
      None => Method::GET,
      Some(Ok(method)) => method,
      Some(Err(_)) => {
        self.skip(definition_name, &format!("link {href} has an invalid method"));
        return None;
      }
    };

    let crumbs = derive_crumbs(href, rel);
    if crumbs.is_empty() {
      self.skip(definition_name, &format!("link {href} yields no name"));
      return None;
    }

    let argument = link
      .get("schema")
      .and_then(Value::as_object)
      .map(|schema| build_argument(&crumbs, schema));

    let returns = crumbs
      .last()
      .filter(|verb| RETURNING_VERBS.contains(verb))
      .and_then(|_| {
        let guesses = return_guesses(definition_name, definition);
        self
          .registry
          .first_match(guesses.iter().map(String::as_str))
          .map(str::to_string)
      });

    Some(
      EndpointCandidate::builder()
        .crumbs(crumbs)
        .method(method.as_str().to_ascii_uppercase())
        .href(href)
        .maybe_argument(argument)
        .maybe_returns(returns)
        .build(),
    )
  }

  fn skip(&mut self, definition: &str, reason: &str) {
    self.warnings.push(GenerationWarning::LinkSkipped {
      definition: definition.to_string(),
      reason: reason.to_string(),
    });
  }
}

/// Builds the argument record named `{crumbs}.argument` plus its nested records.
pub fn build_argument(crumbs: &Crumbs, schema: &Map<String, Value>) -> ArgumentShape {
  let root_name = to_rust_type_name(&format!("{}.argument", crumbs.dotted()));
  let mut set = RecordSet::new(RecordMode::Argument);
  let root_name = set.build_named_record(&root_name, schema);

  let mut records: Vec<RecordDef> = set.ordered([root_name.as_str()]).into_iter().cloned().collect();
  for record in &mut records {
    shorten_negated_fields(record);
  }

  let root = records.remove(0);
  ArgumentShape { root, nested: records }
}
