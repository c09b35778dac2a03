use std::{collections::BTreeMap, ffi::OsStr, path::Path};

use anyhow::Context as _;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use serde_json::Value;

/// A cached schema file mapped into memory.
pub struct SchemaLoader {
  file: AsyncMmapFile,
  name: String,
}

impl SchemaLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let name = path
      .file_name()
      .and_then(OsStr::to_str)
      .map(str::to_string)
      .with_context(|| format!("schema path has no file name: {}", path.display()))?;

    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open schema file {}", path.display()))?;

    Ok(Self { file, name })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn parse(&self) -> anyhow::Result<Value> {
    serde_json::from_slice(self.file.as_slice()).with_context(|| format!("failed to parse schema file {}", self.name))
  }

  /// Loads every `*.json` file in `dir`, keyed by file name.
  pub async fn load_dir(dir: &Path) -> anyhow::Result<BTreeMap<String, Value>> {
    let mut documents = BTreeMap::new();
    let mut entries = tokio::fs::read_dir(dir)
      .await
      .with_context(|| format!("failed to read schema directory {}", dir.display()))?;

    while let Some(entry) = entries.next_entry().await? {
      let path = entry.path();
      if path.extension().and_then(OsStr::to_str) != Some("json") {
        continue;
      }
      let loader = Self::open(&path).await?;
      let document = loader.parse()?;
      documents.insert(loader.name().to_string(), document);
    }

    Ok(documents)
  }
}
