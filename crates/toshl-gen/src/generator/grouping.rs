//! Groups canonical endpoints into nested resource classes.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::ast::ApiMethod;
use crate::naming::identifiers::{capitalize_crumb, class_name_tokens};

/// Sort key filler that places a single-word class after its own subclasses.
const SINGLE_TOKEN_TAIL: &str = "zzz";

/// A generated resource struct: the methods sharing a crumb prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceClass {
  /// Capitalized concatenation of the class path; empty for the root client.
  pub name: String,
  pub path: Vec<String>,
  pub methods: Vec<ApiMethod>,
  /// `(accessor crumb, child class name)` pairs.
  pub subclasses: BTreeSet<(String, String)>,
}

impl ResourceClass {
  pub fn is_root(&self) -> bool {
    self.path.is_empty()
  }

  /// Classes one level below the root get an accessor on the root client.
  pub fn is_top_level(&self) -> bool {
    self.path.len() == 1
  }

  fn sort_key(&self) -> Vec<String> {
    let mut tokens = class_name_tokens(&self.name);
    if tokens.len() == 1 {
      tokens.push(SINGLE_TOKEN_TAIL.to_string());
    }
    tokens
  }
}

pub fn class_name(path: &[String]) -> String {
  path.iter().map(|crumb| capitalize_crumb(crumb)).collect()
}

/// Classes keyed by name, created on first use.
#[derive(Debug, Clone, Default)]
pub struct ClassMap {
  classes: IndexMap<String, ResourceClass>,
}

impl ClassMap {
  pub fn get_or_create(&mut self, path: &[String]) -> &mut ResourceClass {
    let name = class_name(path);
    self.classes.entry(name.clone()).or_insert_with(|| ResourceClass {
      name,
      path: path.to_vec(),
      ..Default::default()
    })
  }

  /// Adds a method to its class and links that class into its ancestors.
  pub fn add_method(&mut self, method: ApiMethod) {
    let path = method.crumbs.class_path().to_vec();
    self.get_or_create(&path).methods.push(method);

    let mut child = path;
    while child.len() >= 2 {
      let Some((accessor, parent)) = child.split_last() else {
        break;
      };
      let pair = (accessor.clone(), class_name(&child));
      let parent = parent.to_vec();
      self.get_or_create(&parent).subclasses.insert(pair);
      child = parent;
    }
  }

  /// Classes sorted by name tokens: the root first, single-word classes after
  /// the classes that extend them.
  pub fn into_sorted(self) -> Vec<ResourceClass> {
    let mut classes: Vec<ResourceClass> = self.classes.into_values().collect();
    classes.sort_by_cached_key(ResourceClass::sort_key);
    classes
  }
}

/// Groups endpoints into classes, sorted for emission.
pub fn group_classes<'m>(methods: impl IntoIterator<Item = &'m ApiMethod>) -> Vec<ResourceClass> {
  let mut classes = ClassMap::default();
  for method in methods {
    classes.add_method(method.clone());
  }
  classes.into_sorted()
}
