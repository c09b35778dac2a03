//! Normalizes the defects the upstream schema documents are known to carry.

use serde_json::{Map, Value};

use crate::utils::ValueExt;

/// Repairs every object in `document`, children before parents.
pub fn repair_document(document: &mut Value) {
  match document {
    Value::Object(map) => {
      for child in map.values_mut() {
        repair_document(child);
      }
      repair_node(map);
    }
    Value::Array(items) => {
      for item in items {
        repair_document(item);
      }
    }
    _ => {}
  }
}

/// Applies the node-level rules to a single schema object.
pub fn repair_node(node: &mut Map<String, Value>) {
  let schema_type = node.type_name().map(str::to_string);
  match schema_type.as_deref() {
    Some("number" | "integer") => {
      upgrade_exclusive_bound(node, "exclusiveMinimum", "minimum");
      upgrade_exclusive_bound(node, "exclusiveMaximum", "maximum");
    }
    Some("date") => {
      node.insert("type".to_string(), Value::from("string"));
      node.insert("format".to_string(), Value::from("date"));
    }
    Some("object") => {
      let java_name = node
        .str_field("javaType")
        .and_then(|java_type| java_type.rsplit('.').next())
        .map(str::to_string);
      if let Some(title) = java_name {
        node.insert("title".to_string(), Value::String(title));
      }
    }
    _ => {}
  }
}

/// Rewrites a draft-04 boolean exclusivity flag into the draft-06 numeric form.
fn upgrade_exclusive_bound(node: &mut Map<String, Value>, flag_key: &str, bound_key: &str) {
  let Some(&Value::Bool(exclusive)) = node.get(flag_key) else {
    return;
  };

  if exclusive && let Some(bound) = node.remove(bound_key) {
    node.insert(flag_key.to_string(), bound);
  } else {
    node.remove(flag_key);
  }
}
