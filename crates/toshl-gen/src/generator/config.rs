use std::path::PathBuf;

use anyhow::Context as _;
use serde::Deserialize;

use super::{ast::Crumbs, materialize::Labeller};

pub const DEFAULT_SCHEMA_DIR: &str = "schemas";
pub const DEFAULT_OUTPUT_DIR: &str = "generated";
pub const DEFAULT_SCHEMA_BASE_URL: &str = "https://api2.toshl.com/schema/";
pub const INDEX_FILE: &str = "top.json";

const EMBEDDED_QUIRKS: &str = include_str!("../../quirks.json");

/// Settings for one generation run, threaded explicitly through every stage.
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct GeneratorConfig {
  #[builder(into, default = PathBuf::from(DEFAULT_SCHEMA_DIR))]
  pub schema_dir: PathBuf,
  #[builder(into, default = PathBuf::from(DEFAULT_OUTPUT_DIR))]
  pub output_dir: PathBuf,
  #[builder(into, default = DEFAULT_SCHEMA_BASE_URL.to_string())]
  pub schema_base_url: String,
  /// Regenerate from the cached schemas without touching the network.
  #[builder(default)]
  pub offline: bool,
  #[builder(default)]
  pub labeller: Labeller,
  #[builder(default)]
  pub quirks: Quirks,
}

impl GeneratorConfig {
  pub fn original_dir(&self) -> PathBuf {
    self.schema_dir.join("original")
  }

  pub fn fixed_dir(&self) -> PathBuf {
    self.schema_dir.join("fixed")
  }

  pub fn index_path(&self) -> PathBuf {
    self.fixed_dir().join(INDEX_FILE)
  }
}

/// Upstream API defects, kept as versioned data rather than code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Quirks {
  /// Profiles requested from the schema service, in order.
  pub profiles: Vec<String>,
  /// Schema files referenced upstream but never published.
  pub dummies: Vec<String>,
  /// Crumb sequences of known-bad duplicate endpoints.
  pub discard: Vec<Crumbs>,
  /// Field replacements applied to selected endpoints after deduplication.
  pub modify: Vec<MethodOverride>,
  /// Endpoints the schemas do not describe at all.
  pub add: Vec<SyntheticMethod>,
}

impl Quirks {
  /// The quirks file shipped with the generator.
  pub fn embedded() -> anyhow::Result<Self> {
    Self::from_json(EMBEDDED_QUIRKS).context("embedded quirks.json is invalid")
  }

  pub fn from_json(text: &str) -> anyhow::Result<Self> {
    Ok(serde_json::from_str(text)?)
  }

  pub fn is_discarded(&self, crumbs: &Crumbs) -> bool {
    self.discard.contains(crumbs)
  }

  pub fn override_for(&self, crumbs: &Crumbs) -> Option<&MethodOverride> {
    self.modify.iter().find(|entry| &entry.crumbs == crumbs)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodOverride {
  pub crumbs: Crumbs,
  #[serde(default)]
  pub method: Option<String>,
  #[serde(default)]
  pub href: Option<String>,
  /// `null` clears the argument, a string names an argument record.
  #[serde(default, with = "serde_with::rust::double_option")]
  pub argument: Option<Option<String>>,
  /// `null` clears the return shape, a string names a return record.
  #[serde(default, rename = "return", with = "serde_with::rust::double_option")]
  pub returns: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyntheticMethod {
  pub crumbs: Crumbs,
  #[serde(default = "default_method")]
  pub method: String,
  pub href: String,
  #[serde(default)]
  pub argument: Option<String>,
  #[serde(default, rename = "return")]
  pub returns: Option<String>,
}

fn default_method() -> String {
  "GET".to_string()
}
