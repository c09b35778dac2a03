use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::generator::{
  ast::{ApiMethod, Crumbs, EndpointCandidate},
  config::{DEFAULT_SCHEMA_BASE_URL, Quirks},
  materialize::{Labeller, MaterializedSchema, materialize},
};

pub(super) fn crumbs(parts: &[&str]) -> Crumbs {
  Crumbs::new(parts.iter().map(|part| (*part).to_string()).collect())
}

pub(super) fn candidate(parts: &[&str], method: &str, href: &str) -> EndpointCandidate {
  EndpointCandidate::builder()
    .crumbs(crumbs(parts))
    .method(method)
    .href(href)
    .build()
}

pub(super) fn api_method(parts: &[&str], method: &str, href: &str) -> ApiMethod {
  ApiMethod::builder()
    .crumbs(crumbs(parts))
    .method(method)
    .href(href)
    .build()
}

pub(super) fn quirks(json: &str) -> Quirks {
  Quirks::from_json(json).expect("failed to parse test quirks")
}

/// Quirks matching the fixture documents.
pub(super) fn fixture_quirks() -> Quirks {
  quirks(
    r#"{
      "profiles": ["user", "account", "account.list", "entry", "entry.list"],
      "dummies": ["item.json"],
      "discard": [["accounts", "account"]],
      "modify": [
        {"crumbs": ["entries", "manage"], "method": "put"}
      ],
      "add": [
        {"crumbs": ["entries", "sums"], "href": "/entries/sums", "argument": "EntriesListArgument"}
      ]
    }"#,
  )
}

/// Repaired documents shaped like a small slice of the Toshl schemas.
pub(super) fn fixture_documents() -> BTreeMap<String, Value> {
  let mut documents = BTreeMap::new();

  documents.insert(
    "top.json".to_string(),
    json!({
      "definitions": {
        "account": {"$ref": "account.json#"},
        "account.list": {"$ref": "account.list.json#"},
        "entry": {"$ref": "entry.json#"},
        "entry.list": {"$ref": "entry.list.json#"},
        "user": {"$ref": "user.json#"}
      }
    }),
  );

  documents.insert(
    "user.json".to_string(),
    json!({
      "title": "User",
      "type": "object",
      "properties": {
        "id": {"type": "string"},
        "email": {"type": "string"},
        "limits": {
          "type": "object",
          "properties": {"accounts": {"type": "integer"}}
        }
      },
      "required": ["id"],
      "links": [
        {"href": "/me", "rel": "self"}
      ]
    }),
  );

  documents.insert(
    "account.json".to_string(),
    json!({
      "title": "Account",
      "type": "object",
      "description": "A money account.",
      "properties": {
        "id": {"type": "string"},
        "name": {"type": "string"},
        "balance": {"type": "number"},
        "parent": {"$ref": "account.json#"}
      },
      "required": ["id", "name"],
      "links": [
        {"href": "/accounts/{id}", "rel": "self"},
        {"href": "/accounts/{id}", "rel": "account"},
        {"href": "/accounts/{id}", "method": "PUT", "rel": "update", "schema": {"$ref": "#"}},
        {"href": "/accounts/{id}", "method": "DELETE", "rel": "delete"},
        {
          "href": "/accounts/{id}/move",
          "method": "POST",
          "rel": "move",
          "schema": {
            "type": "object",
            "properties": {"position": {"type": "integer"}},
            "required": ["position"]
          }
        }
      ]
    }),
  );

  documents.insert(
    "account.list.json".to_string(),
    json!({
      "type": "array",
      "items": {"$ref": "account.json#"},
      "links": [
        {
          "href": "/accounts",
          "rel": "list",
          "schema": {
            "type": "object",
            "properties": {
              "page": {"type": "integer"},
              "!deleted": {"type": "boolean"}
            }
          }
        },
        {"href": "/accounts", "method": "POST", "rel": "create", "schema": {"$ref": "account.json#"}}
      ]
    }),
  );

  documents.insert(
    "entry.json".to_string(),
    json!({
      "title": "Entry",
      "type": "object",
      "properties": {
        "id": {"type": "string"},
        "amount": {"type": "number"},
        "date": {"type": "string", "format": "date"},
        "modified": {"type": "string", "format": "date-time"},
        "tags": {"type": "array", "items": {"type": "string"}},
        "location": {
          "type": "object",
          "properties": {
            "latitude": {"type": "number"},
            "longitude": {"type": "number"}
          }
        }
      },
      "required": ["id", "amount", "date"],
      "links": [
        {"href": "/entries/{id}", "rel": "self"},
        {
          "href": "/entries/manage",
          "method": "POST",
          "rel": "manage",
          "schema": {
            "type": "object",
            "properties": {
              "with": {
                "type": "object",
                "properties": {"tags": {"type": "array", "items": {"type": "string"}}}
              }
            }
          }
        }
      ]
    }),
  );

  documents.insert(
    "entry.list.json".to_string(),
    json!({
      "type": "array",
      "items": {"$ref": "entry.json#"},
      "links": [
        {
          "href": "/entries",
          "rel": "list",
          "schema": {
            "type": "object",
            "properties": {
              "from": {"type": "string", "format": "date"},
              "to": {"type": "string", "format": "date"},
              "!starred": {"type": "boolean"}
            },
            "required": ["from", "to"]
          }
        }
      ]
    }),
  );

  documents
}

pub(super) fn fixture_schema() -> MaterializedSchema {
  materialize(&fixture_documents(), DEFAULT_SCHEMA_BASE_URL, Labeller::default()).expect("fixture schema materializes")
}

pub(super) fn assert_contains(code: &str, expected: &str, context: &str) {
  assert!(code.contains(expected), "missing {context}: expected '{expected}'");
}

pub(super) fn assert_not_contains(code: &str, pattern: &str, context: &str) {
  assert!(!code.contains(pattern), "{context}: '{pattern}' should not appear");
}

pub(super) fn assert_contains_all(code: &str, checks: &[(&str, &str)]) {
  for (expected, context) in checks {
    assert_contains(code, expected, context);
  }
}
