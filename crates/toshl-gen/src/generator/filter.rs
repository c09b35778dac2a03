//! Collapses endpoint candidates to one canonical method per (href, method).

use std::collections::HashSet;

use indexmap::IndexMap;
use itertools::Itertools as _;

use super::{
  ast::{ApiMethod, ArgumentShape, Crumbs, EndpointCandidate},
  config::{MethodOverride, Quirks},
  metrics::GenerationWarning,
  registry::ReturnTypeRegistry,
};

/// The canonical endpoints plus every argument shape they may reference.
#[derive(Debug, Clone, Default)]
pub struct FilteredEndpoints {
  pub methods: IndexMap<Crumbs, ApiMethod>,
  /// Argument shapes by record name, including those only reachable through overrides.
  pub arguments: IndexMap<String, ArgumentShape>,
  pub warnings: Vec<GenerationWarning>,
}

impl FilteredEndpoints {
  /// Argument shapes used by the surviving methods, ordered by class path.
  pub fn used_arguments(&self) -> Vec<&ArgumentShape> {
    self
      .methods
      .values()
      .sorted_by(|a, b| a.crumbs.class_path().cmp(b.crumbs.class_path()))
      .filter_map(|method| method.argument.as_deref())
      .unique()
      .filter_map(|name| self.arguments.get(name))
      .collect()
  }
}

pub struct EndpointFilter<'a> {
  quirks: &'a Quirks,
  registry: &'a ReturnTypeRegistry,
  warnings: Vec<GenerationWarning>,
}

impl<'a> EndpointFilter<'a> {
  pub fn new(quirks: &'a Quirks, registry: &'a ReturnTypeRegistry) -> Self {
    Self {
      quirks,
      registry,
      warnings: Vec::new(),
    }
  }

  pub fn filter(mut self, candidates: &[EndpointCandidate]) -> FilteredEndpoints {
    let quirks = self.quirks;
    let kept = self.deduplicate(candidates);

    let mut arguments = IndexMap::new();
    for candidate in &kept {
      if let Some(shape) = &candidate.argument {
        arguments.insert(shape.name().to_string(), shape.clone());
      }
    }
    for shape in candidates.iter().filter_map(|candidate| candidate.argument.as_ref()) {
      arguments.entry(shape.name().to_string()).or_insert_with(|| shape.clone());
    }

    let mut methods = IndexMap::with_capacity(kept.len() + quirks.add.len());

    for candidate in kept {
      let mut method = ApiMethod::from(candidate);
      if let Some(entry) = quirks.override_for(&method.crumbs) {
        self.apply_override(&mut method, entry, &arguments);
      }
      self.insert(&mut methods, method);
    }

    for synthetic in &quirks.add {
      let crumbs = synthetic.crumbs.to_string();
      let argument = synthetic
        .argument
        .clone()
        .and_then(|name| self.known_argument(&crumbs, name, &arguments));
      let returns = synthetic
        .returns
        .clone()
        .and_then(|name| self.known_return(&crumbs, name));

      let method = ApiMethod::builder()
        .crumbs(synthetic.crumbs.clone())
        .method(synthetic.method.to_ascii_uppercase())
        .href(synthetic.href.clone())
        .maybe_argument(argument)
        .maybe_returns(returns)
        .build();
      self.insert(&mut methods, method);
    }

    FilteredEndpoints {
      methods,
      arguments,
      warnings: self.warnings,
    }
  }

  /// Sorts by (href without query, method, longest crumbs first) and keeps the
  /// first non-excluded candidate per key. Excluded candidates claim no key.
  fn deduplicate<'c>(&self, candidates: &'c [EndpointCandidate]) -> Vec<&'c EndpointCandidate> {
    let mut sorted: Vec<&EndpointCandidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| {
      a.dedup_key()
        .cmp(&b.dedup_key())
        .then_with(|| b.crumbs.len().cmp(&a.crumbs.len()))
    });

    let mut seen = HashSet::new();
    sorted
      .into_iter()
      .filter(|candidate| !self.quirks.is_discarded(&candidate.crumbs))
      .filter(|candidate| seen.insert(candidate.dedup_key()))
      .collect()
  }

  fn apply_override(
    &mut self,
    method: &mut ApiMethod,
    entry: &MethodOverride,
    arguments: &IndexMap<String, ArgumentShape>,
  ) {
    let crumbs = method.crumbs.to_string();

    if let Some(verb) = &entry.method {
      method.method = verb.to_ascii_uppercase();
    }
    if let Some(href) = &entry.href {
      method.href.clone_from(href);
    }
    match &entry.argument {
      Some(None) => method.argument = None,
      Some(Some(name)) => {
        if let Some(name) = self.known_argument(&crumbs, name.clone(), arguments) {
          method.argument = Some(name);
        }
      }
      None => {}
    }
    match &entry.returns {
      Some(None) => method.returns = None,
      Some(Some(name)) => {
        if let Some(name) = self.known_return(&crumbs, name.clone()) {
          method.returns = Some(name);
        }
      }
      None => {}
    }
  }

  fn known_argument(
    &mut self,
    crumbs: &str,
    name: String,
    arguments: &IndexMap<String, ArgumentShape>,
  ) -> Option<String> {
    if arguments.contains_key(&name) {
      return Some(name);
    }
    self.warnings.push(GenerationWarning::UnknownOverrideType {
      crumbs: crumbs.to_string(),
      field: "argument",
      type_name: name,
    });
    None
  }

  fn known_return(&mut self, crumbs: &str, name: String) -> Option<String> {
    if self.registry.contains(&name) {
      return Some(name);
    }
    self.warnings.push(GenerationWarning::UnknownOverrideType {
      crumbs: crumbs.to_string(),
      field: "return",
      type_name: name,
    });
    None
  }

  /// Later entries with identical crumbs replace earlier ones in place.
  fn insert(&mut self, methods: &mut IndexMap<Crumbs, ApiMethod>, method: ApiMethod) {
    if methods.contains_key(&method.crumbs) {
      self.warnings.push(GenerationWarning::DuplicateCrumbs {
        crumbs: method.crumbs.to_string(),
        method: method.method.clone(),
        href: method.href.clone(),
      });
    }
    methods.insert(method.crumbs.clone(), method);
  }
}

/// Convenience wrapper over [`EndpointFilter`].
pub fn filter_endpoints(
  candidates: &[EndpointCandidate],
  quirks: &Quirks,
  registry: &ReturnTypeRegistry,
) -> FilteredEndpoints {
  EndpointFilter::new(quirks, registry).filter(candidates)
}
