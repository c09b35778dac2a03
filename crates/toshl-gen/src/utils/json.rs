use serde_json::{Map, Value};

/// Rebuilds a value with every object's keys in lexicographic order.
pub(crate) fn sorted_keys(value: &Value) -> Value {
  match value {
    Value::Object(map) => {
      let mut entries: Vec<_> = map.iter().collect();
      entries.sort_by(|(a, _), (b, _)| a.cmp(b));
      Value::Object(entries.into_iter().map(|(k, v)| (k.clone(), sorted_keys(v))).collect())
    }
    Value::Array(items) => Value::Array(items.iter().map(sorted_keys).collect()),
    other => other.clone(),
  }
}

/// Pretty-prints with four-space indentation and sorted keys, the layout of the cached schema files.
pub(crate) fn to_pretty_sorted(value: &Value) -> serde_json::Result<String> {
  let mut buf = Vec::new();
  let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
  let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
  serde::Serialize::serialize(&sorted_keys(value), &mut serializer)?;
  Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Accessors for the loosely typed schema nodes.
pub(crate) trait ValueExt {
  fn str_field(&self, key: &str) -> Option<&str>;
  fn type_name(&self) -> Option<&str>;
  fn is_object_shape(&self) -> bool;
}

impl ValueExt for Map<String, Value> {
  fn str_field(&self, key: &str) -> Option<&str> {
    self.get(key).and_then(Value::as_str)
  }

  fn type_name(&self) -> Option<&str> {
    self.str_field("type")
  }

  fn is_object_shape(&self) -> bool {
    self.type_name() == Some("object") || self.get("properties").is_some_and(Value::is_object)
  }
}

impl ValueExt for Value {
  fn str_field(&self, key: &str) -> Option<&str> {
    self.as_object().and_then(|map| map.str_field(key))
  }

  fn type_name(&self) -> Option<&str> {
    self.as_object().and_then(|map| map.type_name())
  }

  fn is_object_shape(&self) -> bool {
    self.as_object().is_some_and(|map| map.is_object_shape())
  }
}
