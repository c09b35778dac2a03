//! Orchestration for the schema to client generation pipeline.
//!
//! Each stage is its own method so the caller can report progress between them:
//!
//! 1. [`Orchestrator::clean_cache`], [`Orchestrator::download_profiles`] and
//!    [`Orchestrator::repair_schemas`] rebuild the cache (skipped when offline).
//! 2. [`Orchestrator::load_schemas`] reads the repaired documents back.
//! 3. [`Orchestrator::generate_from_documents`] turns them into the generated module.
//! 4. [`Orchestrator::write_output`] writes it to the output directory.

use std::collections::BTreeMap;

use anyhow::Context as _;
use serde_json::Value;

use super::{
  cache::SchemaCache,
  codegen::{CodeGenerator, GeneratedModule},
  config::GeneratorConfig,
  discovery::EndpointDiscovery,
  fetch::SchemaFetcher,
  filter::filter_endpoints,
  grouping::group_classes,
  materialize::materialize,
  metrics::GenerationStats,
  registry::ReturnTypeRegistry,
};

/// Result of a generation run: the rendered files and what it took to produce them.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
  pub module: GeneratedModule,
  pub stats: GenerationStats,
}

pub struct Orchestrator {
  config: GeneratorConfig,
}

impl Orchestrator {
  pub fn new(config: GeneratorConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &GeneratorConfig {
    &self.config
  }

  pub async fn clean_cache(&self) -> anyhow::Result<()> {
    SchemaCache::new(&self.config).clean().await
  }

  /// Downloads every configured profile into `original/`.
  pub async fn download_profiles(&self, stats: &mut GenerationStats) -> anyhow::Result<()> {
    let cache = SchemaCache::new(&self.config);
    let fetcher = SchemaFetcher::new(&self.config.schema_base_url)?;
    let report = fetcher.fetch_all(&self.config.quirks.profiles, &cache).await?;
    stats.profiles_fetched = report.fetched.len();
    stats.record_warnings(report.warnings);
    Ok(())
  }

  /// Repairs the downloaded profiles into `fixed/` and writes the index.
  pub async fn repair_schemas(&self, stats: &mut GenerationStats) -> anyhow::Result<()> {
    let report = SchemaCache::new(&self.config).repair_all().await?;
    stats.schemas_repaired = report.profiles.len();
    Ok(())
  }

  pub async fn load_schemas(&self) -> anyhow::Result<BTreeMap<String, Value>> {
    SchemaCache::new(&self.config).load_fixed().await
  }

  /// Runs every in-memory stage over already repaired documents.
  pub fn generate_from_documents(
    &self,
    documents: &BTreeMap<String, Value>,
    mut stats: GenerationStats,
  ) -> anyhow::Result<GenerationOutput> {
    let schema = materialize(documents, &self.config.schema_base_url, self.config.labeller)
      .context("failed to materialize schemas")?;
    stats.definitions_materialized = schema.definitions().len();
    stats.recursive_references = schema.recursive_references;

    let (registry, warnings) = ReturnTypeRegistry::from_schema(&schema);
    stats.return_types_generated = registry.len();
    stats.record_warnings(warnings);

    let (candidates, warnings) = EndpointDiscovery::new(&registry).discover(&schema);
    stats.candidates_discovered = candidates.len();
    stats.record_warnings(warnings);

    let mut endpoints = filter_endpoints(&candidates, &self.config.quirks, &registry);
    stats.endpoints_generated = endpoints.methods.len();
    stats.record_warnings(endpoints.warnings.drain(..));

    stats.argument_types_generated = endpoints
      .used_arguments()
      .iter()
      .map(|shape| shape.records().count())
      .sum();

    let classes = group_classes(endpoints.methods.values());
    stats.classes_generated = classes.iter().filter(|class| !class.is_root()).count();

    let mut module = CodeGenerator::new(&registry, &endpoints, &classes).generate()?;
    stats.record_warnings(module.warnings.drain(..));

    Ok(GenerationOutput { module, stats })
  }

  /// Writes every generated file into the output directory.
  pub async fn write_output(&self, module: &GeneratedModule) -> anyhow::Result<()> {
    let dir = &self.config.output_dir;
    tokio::fs::create_dir_all(dir)
      .await
      .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    for file in &module.files {
      let path = dir.join(file.name);
      tokio::fs::write(&path, &file.source)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
  }
}
