use crate::generator::{
  codegen::{ARGUMENT_TYPES_FILE, ENDPOINTS_FILE, LOOKUP_FILE, MOD_FILE, RETURN_TYPES_FILE},
  config::GeneratorConfig,
  metrics::GenerationStats,
  orchestrator::Orchestrator,
  tests::support::{assert_contains, assert_contains_all, assert_not_contains, fixture_documents, fixture_quirks},
};
use crate::ui::{Colors, colors::Theme, commands::generate_client};

const PLAIN: Colors = Colors::new(false, Theme::Dark);

fn config(dir: &tempfile::TempDir) -> GeneratorConfig {
  GeneratorConfig::builder()
    .schema_dir(dir.path().join("schemas"))
    .output_dir(dir.path().join("generated"))
    .offline(true)
    .quirks(fixture_quirks())
    .build()
}

fn seed_fixed(config: &GeneratorConfig) {
  std::fs::create_dir_all(config.fixed_dir()).unwrap();
  for (name, document) in fixture_documents() {
    std::fs::write(config.fixed_dir().join(name), document.to_string()).unwrap();
  }
}

#[test]
fn test_generate_from_documents_stats() {
  let dir = tempfile::tempdir().unwrap();
  let orchestrator = Orchestrator::new(config(&dir));
  let output = orchestrator
    .generate_from_documents(&fixture_documents(), GenerationStats::default())
    .unwrap();

  let stats = &output.stats;
  assert_eq!(stats.definitions_materialized, 5);
  assert_eq!(stats.return_types_generated, 5);
  assert_eq!(stats.candidates_discovered, 11);
  assert_eq!(stats.endpoints_generated, 11);
  assert_eq!(stats.classes_generated, 3);
  assert_eq!(stats.argument_types_generated, 7);
  assert!(stats.recursive_references >= 1);
  assert!(stats.warnings.is_empty(), "unexpected warnings: {:?}", stats.warnings);

  let names: Vec<&str> = output.module.files.iter().map(|file| file.name).collect();
  assert_eq!(
    names,
    vec![ARGUMENT_TYPES_FILE, RETURN_TYPES_FILE, ENDPOINTS_FILE, LOOKUP_FILE, MOD_FILE]
  );
}

#[test]
fn test_generated_files_parse() {
  let dir = tempfile::tempdir().unwrap();
  let output = Orchestrator::new(config(&dir))
    .generate_from_documents(&fixture_documents(), GenerationStats::default())
    .unwrap();

  for file in &output.module.files {
    assert_contains(&file.source, "AUTO-GENERATED CODE - DO NOT EDIT!", file.name);
    syn::parse_file(&file.source).unwrap_or_else(|err| panic!("{} does not parse: {err}", file.name));
  }

  let arguments = output.module.file(ARGUMENT_TYPES_FILE).unwrap();
  assert_not_contains(&arguments.source, "use super::", ARGUMENT_TYPES_FILE);
  assert!(output.module.file("missing.rs").is_none());
}

#[tokio::test]
async fn test_offline_run_writes_module() {
  let dir = tempfile::tempdir().unwrap();
  let config = config(&dir);
  seed_fixed(&config);

  let output = generate_client(config.clone(), &PLAIN).await.unwrap();
  assert_eq!(output.stats.profiles_fetched, 0);

  for file in &output.module.files {
    let written = std::fs::read_to_string(config.output_dir.join(file.name)).unwrap();
    assert_eq!(written, file.source);
  }

  let endpoints = std::fs::read_to_string(config.output_dir.join(ENDPOINTS_FILE)).unwrap();
  assert_contains_all(
    &endpoints,
    &[
      ("pub struct Toshl", "root client"),
      ("pub fn entries(&self) -> Entries<'_>", "top-level accessor"),
      ("pub struct Entries<'a>", "resource struct"),
    ],
  );

  let lookup = std::fs::read_to_string(config.output_dir.join(LOOKUP_FILE)).unwrap();
  assert_contains(&lookup, "name: \"accounts.get\"", "kept endpoint");
  assert_not_contains(&lookup, "name: \"accounts.account\"", "discarded endpoint");
}

#[tokio::test]
async fn test_offline_run_without_cache_fails() {
  let dir = tempfile::tempdir().unwrap();
  let err = generate_client(config(&dir), &PLAIN).await.unwrap_err();
  assert!(err.to_string().contains("--offline"));
  assert!(!config(&dir).output_dir.exists());
}
