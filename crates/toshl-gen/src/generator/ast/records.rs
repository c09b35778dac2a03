use super::TypeRef;

/// One field of a generated record.
#[derive(Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
pub struct FieldDef {
  /// Rust identifier, possibly raw (`r#type`).
  #[builder(into)]
  pub name: String,
  /// Key as it appears on the wire.
  #[builder(into)]
  pub wire_name: String,
  pub type_ref: TypeRef,
  #[builder(into)]
  pub docs: Option<String>,
  #[builder(default)]
  pub required: bool,
}

impl FieldDef {
  /// Whether the serde attribute needs an explicit `rename`.
  pub fn needs_rename(&self) -> bool {
    self.name.strip_prefix("r#").unwrap_or(&self.name) != self.wire_name
  }
}

/// A named record generated from an object schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
pub struct RecordDef {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub docs: Option<String>,
  #[builder(default)]
  pub fields: Vec<FieldDef>,
}

impl RecordDef {
  /// Two records have the same shape when their fields match, ignoring names and docs.
  pub fn same_shape(&self, other: &Self) -> bool {
    self.fields.len() == other.fields.len()
      && self
        .fields
        .iter()
        .zip(&other.fields)
        .all(|(a, b)| a.name == b.name && a.wire_name == b.wire_name && a.type_ref == b.type_ref)
  }

  pub fn field(&self, name: &str) -> Option<&FieldDef> {
    self.fields.iter().find(|field| field.name == name)
  }

  /// Finds a field by its wire name.
  pub fn wire_field(&self, wire_name: &str) -> Option<&FieldDef> {
    self.fields.iter().find(|field| field.wire_name == wire_name)
  }

  /// Names of records referenced by the fields, in field order.
  pub fn referenced_records(&self) -> impl Iterator<Item = &str> {
    self.fields.iter().filter_map(|field| field.type_ref.record_name())
  }
}
