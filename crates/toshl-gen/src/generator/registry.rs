use indexmap::IndexMap;

use super::{
  ast::RecordDef,
  materialize::MaterializedSchema,
  metrics::GenerationWarning,
  records::{RecordMode, RecordSet},
};
use crate::{naming::identifiers::to_rust_type_name, utils::ValueExt};

/// Name → record map of every generated return type, built once.
#[derive(Debug, Clone, Default)]
pub struct ReturnTypeRegistry {
  records: IndexMap<String, RecordDef>,
}

impl ReturnTypeRegistry {
  /// Builds one record per object shape reachable from the definitions.
  ///
  /// Records are ordered definition by definition, each followed by the
  /// records it references.
  pub fn from_schema(schema: &MaterializedSchema) -> (Self, Vec<GenerationWarning>) {
    let mut set = RecordSet::new(RecordMode::Return);
    let mut roots = Vec::new();

    for (name, definition) in schema.definitions() {
      if definition.is_object_shape() {
        roots.push(set.build_record(&to_rust_type_name(name), definition));
      }
    }

    let warnings = set.take_warnings();
    let records = set
      .ordered(roots.iter().map(String::as_str))
      .into_iter()
      .map(|record| (record.name.clone(), record.clone()))
      .collect();

    (Self { records }, warnings)
  }

  #[cfg(test)]
  pub fn from_records(records: impl IntoIterator<Item = RecordDef>) -> Self {
    Self {
      records: records.into_iter().map(|record| (record.name.clone(), record)).collect(),
    }
  }

  pub fn get(&self, name: &str) -> Option<&RecordDef> {
    self.records.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.get(name).is_some()
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  /// Records in emission order.
  pub fn records(&self) -> impl Iterator<Item = &RecordDef> {
    self.records.values()
  }

  /// The first guess naming a registered record, as that record's name.
  pub fn first_match<'g>(&self, guesses: impl IntoIterator<Item = &'g str>) -> Option<&str> {
    guesses
      .into_iter()
      .map(to_rust_type_name)
      .find_map(|guess| self.records.get_key_value(&guess).map(|(name, _)| name.as_str()))
  }
}
