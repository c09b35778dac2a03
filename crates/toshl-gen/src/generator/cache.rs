use std::{collections::BTreeMap, io::ErrorKind, path::Path};

use anyhow::Context as _;
use serde_json::{Value, json};

use super::{config::GeneratorConfig, repair::repair_document};
use crate::utils::{SchemaLoader, to_pretty_sorted};

/// What the repair pass wrote into `fixed/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
  /// Profile names (file stems) listed in the index, sorted.
  pub profiles: Vec<String>,
  pub dummies: usize,
}

/// The on-disk schema cache: `original/` as downloaded, `fixed/` after repair.
pub struct SchemaCache<'a> {
  config: &'a GeneratorConfig,
}

impl<'a> SchemaCache<'a> {
  pub fn new(config: &'a GeneratorConfig) -> Self {
    Self { config }
  }

  /// Deletes the whole cache directory; a missing directory is fine.
  pub async fn clean(&self) -> anyhow::Result<()> {
    match tokio::fs::remove_dir_all(&self.config.schema_dir).await {
      Ok(()) => Ok(()),
      Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
      Err(err) => {
        Err(err).with_context(|| format!("failed to clean schema cache {}", self.config.schema_dir.display()))
      }
    }
  }

  pub async fn store_original(&self, profile: &str, body: &str) -> anyhow::Result<()> {
    let dir = self.config.original_dir();
    tokio::fs::create_dir_all(&dir)
      .await
      .with_context(|| format!("failed to create {}", dir.display()))?;
    write_file(&dir.join(format!("{profile}.json")), body).await
  }

  /// Writes the dummy files, repairs every original document into `fixed/`
  /// and emits the `top.json` index.
  pub async fn repair_all(&self) -> anyhow::Result<RepairReport> {
    let fixed_dir = self.config.fixed_dir();
    tokio::fs::create_dir_all(&fixed_dir)
      .await
      .with_context(|| format!("failed to create {}", fixed_dir.display()))?;

    for dummy in &self.config.quirks.dummies {
      let text = to_pretty_sorted(&dummy_schema(dummy))?;
      write_file(&fixed_dir.join(dummy), &text).await?;
    }

    let originals = match tokio::fs::try_exists(self.config.original_dir()).await {
      Ok(true) => SchemaLoader::load_dir(&self.config.original_dir()).await?,
      _ => BTreeMap::new(),
    };

    let mut definitions = serde_json::Map::new();
    let mut profiles = Vec::with_capacity(originals.len());

    for (file_name, mut document) in originals {
      let stem = file_name.strip_suffix(".json").unwrap_or(&file_name).to_string();
      definitions.insert(stem.clone(), json!({ "$ref": format!("{file_name}#") }));

      repair_document(&mut document);
      let text = to_pretty_sorted(&document).with_context(|| format!("failed to serialize {file_name}"))?;
      write_file(&fixed_dir.join(&file_name), &text).await?;
      profiles.push(stem);
    }

    let index = json!({ "definitions": definitions });
    write_file(&self.config.index_path(), &to_pretty_sorted(&index)?).await?;

    Ok(RepairReport {
      profiles,
      dummies: self.config.quirks.dummies.len(),
    })
  }

  /// Loads every repaired document, keyed by file name.
  pub async fn load_fixed(&self) -> anyhow::Result<BTreeMap<String, Value>> {
    let index = self.config.index_path();
    if !tokio::fs::try_exists(&index).await.unwrap_or(false) {
      anyhow::bail!(
        "no cached schemas at {}; run once without --offline to download them",
        index.display()
      );
    }
    SchemaLoader::load_dir(&self.config.fixed_dir()).await
  }
}

/// Empty object schema standing in for a file upstream references but never publishes.
pub fn dummy_schema(file_name: &str) -> Value {
  json!({
    "type": "object",
    "properties": {},
    "description": format!("Dummy Item, because Toshl dev do not include {file_name}"),
  })
}

async fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
  tokio::fs::write(path, contents)
    .await
    .with_context(|| format!("failed to write {}", path.display()))
}
