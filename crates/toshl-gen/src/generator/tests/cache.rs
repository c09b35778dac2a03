use serde_json::{Value, json};

use crate::generator::{
  cache::{SchemaCache, dummy_schema},
  config::GeneratorConfig,
  tests::support::quirks,
};

fn config(dir: &tempfile::TempDir) -> GeneratorConfig {
  GeneratorConfig::builder()
    .schema_dir(dir.path().join("schemas"))
    .output_dir(dir.path().join("generated"))
    .quirks(quirks(r#"{"dummies": ["item.json"]}"#))
    .build()
}

fn read_json(path: &std::path::Path) -> Value {
  serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_repair_all_writes_fixed_documents_and_index() {
  let dir = tempfile::tempdir().unwrap();
  let config = config(&dir);
  let cache = SchemaCache::new(&config);

  cache
    .store_original(
      "entry",
      r#"{"type":"object","javaType":"com.toshl.Entry","properties":{"date":{"type":"date"}}}"#,
    )
    .await
    .unwrap();
  cache.store_original("entry.list", r#"{"type":"array"}"#).await.unwrap();

  let report = cache.repair_all().await.unwrap();
  assert_eq!(report.profiles, vec!["entry", "entry.list"]);
  assert_eq!(report.dummies, 1);

  let entry = read_json(&config.fixed_dir().join("entry.json"));
  assert_eq!(entry["title"], json!("Entry"));
  assert_eq!(entry["properties"]["date"]["type"], json!("string"));

  let index = read_json(&config.index_path());
  assert_eq!(
    index,
    json!({
      "definitions": {
        "entry": {"$ref": "entry.json#"},
        "entry.list": {"$ref": "entry.list.json#"}
      }
    })
  );

  assert_eq!(read_json(&config.fixed_dir().join("item.json")), dummy_schema("item.json"));
}

#[tokio::test]
async fn test_fixed_files_are_sorted_and_indented() {
  let dir = tempfile::tempdir().unwrap();
  let config = config(&dir);
  let cache = SchemaCache::new(&config);

  cache
    .store_original("tag", r#"{"type":"object","description":"Tag"}"#)
    .await
    .unwrap();
  cache.repair_all().await.unwrap();

  let text = std::fs::read_to_string(config.fixed_dir().join("tag.json")).unwrap();
  assert_eq!(text, "{\n    \"description\": \"Tag\",\n    \"type\": \"object\"\n}");
}

#[tokio::test]
async fn test_clean_tolerates_missing_directory() {
  let dir = tempfile::tempdir().unwrap();
  let config = config(&dir);
  let cache = SchemaCache::new(&config);

  cache.clean().await.unwrap();

  cache.store_original("user", "{}").await.unwrap();
  assert!(config.original_dir().join("user.json").exists());
  cache.clean().await.unwrap();
  assert!(!config.schema_dir.exists());
}

#[tokio::test]
async fn test_load_fixed_requires_index() {
  let dir = tempfile::tempdir().unwrap();
  let config = config(&dir);
  let cache = SchemaCache::new(&config);

  let err = cache.load_fixed().await.unwrap_err();
  assert!(err.to_string().contains("run once without --offline"));

  cache.store_original("user", r#"{"type":"object"}"#).await.unwrap();
  cache.repair_all().await.unwrap();
  let documents = cache.load_fixed().await.unwrap();
  let names: Vec<&str> = documents.keys().map(String::as_str).collect();
  assert_eq!(names, vec!["item.json", "top.json", "user.json"]);
}

#[test]
fn test_dummy_schema_shape() {
  let dummy = dummy_schema("planning.json");
  assert_eq!(dummy["type"], json!("object"));
  assert_eq!(dummy["properties"], json!({}));
  assert!(dummy["description"].as_str().unwrap().contains("planning.json"));
}
