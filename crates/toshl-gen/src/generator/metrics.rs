use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub profiles_fetched: usize,
  pub schemas_repaired: usize,
  pub definitions_materialized: usize,
  pub recursive_references: usize,
  pub return_types_generated: usize,
  pub argument_types_generated: usize,
  pub candidates_discovered: usize,
  pub endpoints_generated: usize,
  pub classes_generated: usize,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    for warning in warnings {
      self.record_warning(warning);
    }
  }

  /// Label/value pairs for the summary block, in display order.
  pub fn summary(&self) -> Vec<(&'static str, usize)> {
    vec![
      ("Profiles fetched", self.profiles_fetched),
      ("Schemas repaired", self.schemas_repaired),
      ("Definitions", self.definitions_materialized),
      ("Recursive references", self.recursive_references),
      ("Return types", self.return_types_generated),
      ("Argument types", self.argument_types_generated),
      ("Endpoint candidates", self.candidates_discovered),
      ("Endpoints", self.endpoints_generated),
      ("Resource classes", self.classes_generated),
      ("Warnings", self.warnings.len()),
    ]
  }
}

/// Non-fatal conditions collected during a run and reported at the end.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Profile '{profile}' skipped: {reason}")]
  ProfileSkipped { profile: String, reason: String },
  #[strum(to_string = "Link in '{definition}' skipped: {reason}")]
  LinkSkipped { definition: String, reason: String },
  #[strum(to_string = "Type name '{name}' already used by a different shape, emitted as '{renamed}'")]
  TypeNameCollision { name: String, renamed: String },
  #[strum(to_string = "Endpoint '{crumbs}' defined twice, keeping {method} {href}")]
  DuplicateCrumbs {
    crumbs: String,
    method: String,
    href: String,
  },
  #[strum(to_string = "Override for '{crumbs}' names unknown {field} type '{type_name}'")]
  UnknownOverrideType {
    crumbs: String,
    field: &'static str,
    type_name: String,
  },
  #[strum(to_string = "Method '{method}' on '{class}' collides with a subclass accessor, emitted as '{renamed}'")]
  MethodAccessorCollision {
    class: String,
    method: String,
    renamed: String,
  },
}

impl GenerationWarning {
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::ProfileSkipped { .. } | Self::LinkSkipped { .. })
  }
}
