//! Turns JSON Schema object nodes into [`RecordDef`]s.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{
  ast::{FieldDef, RecordDef, RustPrimitive, TypeRef},
  materialize::{LABEL_KEY, RECURSIVE_KEY},
  metrics::GenerationWarning,
};
use crate::{
  naming::identifiers::{to_rust_field_name, to_rust_type_name},
  utils::ValueExt,
};

/// How nested records are named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordMode {
  /// Return types honor `title` and `x-label`, and box recursive references.
  #[default]
  Return,
  /// Argument records are always named after their parent and property.
  Argument,
}

/// An insertion-ordered set of records with collision handling.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
  mode: RecordMode,
  records: IndexMap<String, RecordDef>,
  warnings: Vec<GenerationWarning>,
}

impl RecordSet {
  pub fn new(mode: RecordMode) -> Self {
    Self {
      mode,
      ..Default::default()
    }
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.records.len()
  }

  #[cfg(test)]
  pub fn get(&self, name: &str) -> Option<&RecordDef> {
    self.records.get(name)
  }

  pub fn take_warnings(&mut self) -> Vec<GenerationWarning> {
    std::mem::take(&mut self.warnings)
  }

  /// Builds a record for an object node and returns the name it was stored under.
  ///
  /// `fallback` names the record when the node has no usable title.
  pub fn build_record(&mut self, fallback: &str, node: &Map<String, Value>) -> String {
    let name = self.record_name(fallback, node);
    let fields = self.build_fields(&name, node);
    let record = RecordDef::builder()
      .name(name)
      .maybe_docs(node.str_field("description"))
      .fields(fields)
      .build();
    self.insert(record)
  }

  /// Builds a record under exactly `name`, ignoring any title on the node.
  pub fn build_named_record(&mut self, name: &str, node: &Map<String, Value>) -> String {
    let fields = self.build_fields(name, node);
    let record = RecordDef::builder()
      .name(name)
      .maybe_docs(node.str_field("description"))
      .fields(fields)
      .build();
    self.insert(record)
  }

  /// Records reachable from `roots`, each root followed depth-first by the
  /// records it references. Unreachable records come last.
  pub fn ordered<'a>(&self, roots: impl IntoIterator<Item = &'a str>) -> Vec<&RecordDef> {
    let mut visited = HashSet::new();
    let mut ordered = Vec::with_capacity(self.records.len());

    for root in roots {
      self.visit(root, &mut visited, &mut ordered);
    }
    for record in self.records.values() {
      if visited.insert(record.name.as_str()) {
        ordered.push(record);
      }
    }

    ordered
  }

  fn visit<'s>(&'s self, name: &str, visited: &mut HashSet<&'s str>, ordered: &mut Vec<&'s RecordDef>) {
    let Some(record) = self.records.get(name) else {
      return;
    };
    if !visited.insert(record.name.as_str()) {
      return;
    }
    ordered.push(record);
    for child in record.referenced_records() {
      self.visit(child, visited, ordered);
    }
  }

  fn record_name(&self, fallback: &str, node: &Map<String, Value>) -> String {
    let explicit = match self.mode {
      RecordMode::Return => node.str_field("title").or_else(|| node.str_field(LABEL_KEY)),
      RecordMode::Argument => None,
    };
    to_rust_type_name(explicit.unwrap_or(fallback))
  }

  fn build_fields(&mut self, owner: &str, node: &Map<String, Value>) -> Vec<FieldDef> {
    let Some(properties) = node.get("properties").and_then(Value::as_object) else {
      return Vec::new();
    };

    let required: HashSet<&str> = node
      .get("required")
      .and_then(Value::as_array)
      .map(|names| names.iter().filter_map(Value::as_str).collect())
      .unwrap_or_default();

    let mut used_names = HashSet::new();
    let mut fields = Vec::with_capacity(properties.len());

    for (wire_name, schema) in properties {
      let mut name = to_rust_field_name(wire_name);
      let mut suffix = 2;
      while !used_names.insert(name.clone()) {
        name = format!("{}_{suffix}", to_rust_field_name(wire_name));
        suffix += 1;
      }

      let is_required = required.contains(wire_name.as_str())
        || schema.get("required").and_then(Value::as_bool).unwrap_or(false);
      let fallback = format!("{owner}{}", to_rust_type_name(wire_name));
      let (mut type_ref, nullable) = self.field_type(&fallback, schema);
      if nullable || !is_required {
        type_ref = type_ref.with_option();
      }

      fields.push(
        FieldDef::builder()
          .name(name)
          .wire_name(wire_name.clone())
          .type_ref(type_ref)
          .maybe_docs(schema.str_field("description"))
          .required(is_required)
          .build(),
      );
    }

    fields
  }

  /// Maps a property schema onto a type, building nested records as needed.
  /// The flag reports whether the schema itself admits `null`.
  fn field_type(&mut self, fallback: &str, schema: &Value) -> (TypeRef, bool) {
    match schema.as_object() {
      Some(map) => self.object_field_type(fallback, map),
      None => (TypeRef::new(RustPrimitive::Value), false),
    }
  }

  fn object_field_type(&mut self, fallback: &str, map: &Map<String, Value>) -> (TypeRef, bool) {
    if let Some(target) = map.str_field(RECURSIVE_KEY) {
      let type_ref = match self.mode {
        RecordMode::Return => TypeRef::new(RustPrimitive::Record(to_rust_type_name(target))).with_boxed(),
        RecordMode::Argument => TypeRef::new(RustPrimitive::Value),
      };
      return (type_ref, false);
    }

    let (schema_type, nullable) = declared_type(map);

    let type_ref = match schema_type.as_deref() {
      Some("array") => {
        let item_type = match map.get("items").and_then(Value::as_object) {
          Some(item) if declared_type(item).0.as_deref() == Some("array") => TypeRef::new(RustPrimitive::Value),
          Some(item) => {
            let (item_type, _) = self.object_field_type(&format!("{fallback}Item"), item);
            TypeRef::new(item_type.base_type)
          }
          None => TypeRef::new(RustPrimitive::Value),
        };
        item_type.with_vec()
      }
      Some("object") | None if map.contains_key("properties") => {
        let name = self.build_record(fallback, map);
        TypeRef::new(RustPrimitive::Record(name))
      }
      Some(other) => TypeRef::new(RustPrimitive::from_schema_type(other, map.str_field("format"))),
      None => TypeRef::new(RustPrimitive::Value),
    };

    (type_ref, nullable)
  }

  /// Stores a record, reusing an identical shape or suffixing a clashing name.
  fn insert(&mut self, record: RecordDef) -> String {
    let base = record.name.clone();
    let mut candidate = base.clone();
    let mut suffix = 2;

    loop {
      match self.records.get(&candidate) {
        Some(existing) if existing.same_shape(&record) => return candidate,
        Some(_) => {
          candidate = format!("{base}{suffix}");
          suffix += 1;
        }
        None => break,
      }
    }

    if candidate != base {
      self.warnings.push(GenerationWarning::TypeNameCollision {
        name: base,
        renamed: candidate.clone(),
      });
    }

    self.records.insert(candidate.clone(), RecordDef { name: candidate.clone(), ..record });
    candidate
  }
}

/// The first non-null declared type, and whether `null` is allowed.
fn declared_type(map: &Map<String, Value>) -> (Option<String>, bool) {
  match map.get("type") {
    Some(Value::String(single)) => (Some(single.clone()), false),
    Some(Value::Array(types)) => {
      let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
      let non_null = names.iter().find(|name| **name != "null").map(|name| (*name).to_string());
      (non_null, names.contains(&"null"))
    }
    _ => match map.get("enum").and_then(Value::as_array).and_then(|values| values.first()) {
      Some(Value::String(_)) => (Some("string".to_string()), false),
      Some(Value::Number(n)) if n.is_i64() || n.is_u64() => (Some("integer".to_string()), false),
      Some(Value::Number(_)) => (Some("number".to_string()), false),
      Some(Value::Bool(_)) => (Some("boolean".to_string()), false),
      _ => (None, false),
    },
  }
}
