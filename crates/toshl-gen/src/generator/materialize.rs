//! Links the repaired schema files into one tree.
//!
//! Starting from the `top.json` index, every `$ref` is replaced by its
//! (recursively materialized) target. A reference that re-enters a target
//! still being resolved becomes an `{"x-recursive": <name>}` marker so the
//! record builder can emit a boxed reference instead of looping forever.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use super::config::INDEX_FILE;
use crate::{naming::identifiers::to_rust_type_name, utils::ValueExt};

pub const LABEL_KEY: &str = "x-label";
pub const RECURSIVE_KEY: &str = "x-recursive";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
  #[error("unresolved reference '{reference}' in {document}")]
  UnresolvedReference { reference: String, document: String },
  #[error("schema index '{0}' was not found in the cache")]
  MissingIndex(String),
  #[error("schema index '{0}' has no definitions map")]
  MissingDefinitions(String),
}

/// Naming policy for object nodes that carry no `title`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Labeller {
  /// Derive a label from the node's position in the tree.
  #[default]
  ContextPath,
  #[allow(dead_code)]
  Disabled,
}

impl Labeller {
  fn is_enabled(self) -> bool {
    matches!(self, Self::ContextPath)
  }

  /// Label for the child reached through `key` from a node labelled `parent`.
  fn child_label(self, parent: Option<&str>, key: &str) -> Option<String> {
    match key {
      "items" => parent.map(|label| format!("{label}Item")),
      "additionalProperties" => parent.map(|label| format!("{label}Value")),
      _ => parent.map(str::to_string),
    }
  }

  /// Label for a named member of a `definitions` or `properties` map.
  fn member_label(self, parent: Option<&str>, container: &str, name: &str) -> String {
    let name = to_rust_type_name(name);
    match (container, parent) {
      ("properties", Some(label)) => format!("{label}{name}"),
      _ => name,
    }
  }
}

/// The fully linked schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedSchema {
  pub root: Value,
  pub recursive_references: usize,
}

impl MaterializedSchema {
  /// The named definitions, in name order.
  pub fn definitions(&self) -> Vec<(&str, &Map<String, Value>)> {
    let mut definitions: Vec<_> = self
      .root
      .get("definitions")
      .and_then(Value::as_object)
      .map(|map| {
        map
          .iter()
          .filter_map(|(name, value)| value.as_object().map(|def| (name.as_str(), def)))
          .collect()
      })
      .unwrap_or_default();
    definitions.sort_by(|(a, _), (b, _)| a.cmp(b));
    definitions
  }
}

/// A reference target: document file name plus JSON pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
  file: String,
  pointer: String,
}

pub struct Materializer<'a> {
  documents: &'a BTreeMap<String, Value>,
  base_url: &'a str,
  labeller: Labeller,
  stack: Vec<(Target, String)>,
  /// Stack depth at which the current `links` walk started; cycles are only
  /// searched above it so a link schema may expand its own definition.
  link_floor: usize,
  in_links: bool,
  recursive_references: usize,
}

impl<'a> Materializer<'a> {
  pub fn new(documents: &'a BTreeMap<String, Value>, base_url: &'a str, labeller: Labeller) -> Self {
    Self {
      documents,
      base_url,
      labeller,
      stack: Vec::new(),
      link_floor: 0,
      in_links: false,
      recursive_references: 0,
    }
  }

  /// Resolves the index document into a single tree.
  pub fn materialize(mut self) -> Result<MaterializedSchema, SchemaError> {
    let index = self
      .documents
      .get(INDEX_FILE)
      .ok_or_else(|| SchemaError::MissingIndex(INDEX_FILE.to_string()))?;
    if !index.get("definitions").is_some_and(Value::is_object) {
      return Err(SchemaError::MissingDefinitions(INDEX_FILE.to_string()));
    }

    let root = self.walk(index, INDEX_FILE, None)?;
    Ok(MaterializedSchema {
      root,
      recursive_references: self.recursive_references,
    })
  }

  fn walk(&mut self, node: &Value, document: &str, label: Option<String>) -> Result<Value, SchemaError> {
    match node {
      Value::Object(map) => {
        if let Some(reference) = map.str_field("$ref") {
          return self.resolve(reference, document, label);
        }
        self.walk_object(map, document, label)
      }
      Value::Array(items) => items
        .iter()
        .map(|item| self.walk(item, document, label.clone()))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array),
      other => Ok(other.clone()),
    }
  }

  fn walk_object(
    &mut self,
    map: &Map<String, Value>,
    document: &str,
    label: Option<String>,
  ) -> Result<Value, SchemaError> {
    let own_label = map.str_field("title").map(str::to_string).or(label);
    let mut out = Map::with_capacity(map.len() + 1);

    for (key, value) in map {
      if key == "links" {
        if !self.in_links {
          let child_label = self.labeller.child_label(own_label.as_deref(), key);
          out.insert(key.clone(), self.walk_links(value, document, child_label)?);
        }
        continue;
      }

      let child = match (key.as_str(), value) {
        (container @ ("definitions" | "properties"), Value::Object(members)) => {
          let mut resolved = Map::with_capacity(members.len());
          for (name, member) in members {
            let member_label = self.labeller.member_label(own_label.as_deref(), container, name);
            resolved.insert(name.clone(), self.walk(member, document, Some(member_label))?);
          }
          Value::Object(resolved)
        }
        _ => {
          let child_label = self.labeller.child_label(own_label.as_deref(), key);
          self.walk(value, document, child_label)?
        }
      };
      out.insert(key.clone(), child);
    }

    if self.labeller.is_enabled()
      && map.is_object_shape()
      && !map.contains_key("title")
      && let Some(label) = own_label
    {
      out.entry(LABEL_KEY).or_insert(Value::String(label));
    }

    Ok(Value::Object(out))
  }

  /// Walks a `links` array; definitions expanded from inside it drop their own links.
  fn walk_links(&mut self, links: &Value, document: &str, label: Option<String>) -> Result<Value, SchemaError> {
    let floor = std::mem::replace(&mut self.link_floor, self.stack.len());
    self.in_links = true;
    let result = self.walk(links, document, label);
    self.in_links = false;
    self.link_floor = floor;
    result
  }

  fn resolve(&mut self, reference: &str, document: &str, label: Option<String>) -> Result<Value, SchemaError> {
    let target = self.parse_reference(reference, document);

    let entered = self.stack[self.link_floor..]
      .iter()
      .find(|(entered, _)| *entered == target)
      .map(|(_, name)| name.clone());
    if let Some(name) = entered {
      self.recursive_references += 1;
      let mut marker = Map::new();
      marker.insert(RECURSIVE_KEY.to_string(), Value::String(name));
      return Ok(Value::Object(marker));
    }

    let unresolved = || SchemaError::UnresolvedReference {
      reference: reference.to_string(),
      document: document.to_string(),
    };
    let documents = self.documents;
    let resolved = documents
      .get(&target.file)
      .ok_or_else(unresolved)?
      .pointer(&target.pointer)
      .ok_or_else(unresolved)?;

    let name = resolved
      .str_field("title")
      .map(str::to_string)
      .or_else(|| label.clone())
      .unwrap_or_else(|| to_rust_type_name(target.file.trim_end_matches(".json")));

    let file = target.file.clone();
    self.stack.push((target, name));
    let result = self.walk(resolved, &file, label);
    self.stack.pop();
    result
  }

  fn parse_reference(&self, reference: &str, document: &str) -> Target {
    let relative = reference.strip_prefix(self.base_url).unwrap_or(reference);
    let (file, pointer) = relative.split_once('#').unwrap_or((relative, ""));
    let file = file.trim_start_matches("./");

    let file = if file.is_empty() {
      document.to_string()
    } else if file.ends_with(".json") {
      file.to_string()
    } else {
      format!("{file}.json")
    };

    Target {
      file,
      pointer: pointer.to_string(),
    }
  }
}

/// Convenience wrapper over [`Materializer`].
pub fn materialize(
  documents: &BTreeMap<String, Value>,
  base_url: &str,
  labeller: Labeller,
) -> Result<MaterializedSchema, SchemaError> {
  Materializer::new(documents, base_url, labeller).materialize()
}
