use indexmap::IndexMap;

use super::{api_method, assert_contains, assert_not_contains, format};
use crate::generator::{
  ast::{ApiMethod, ArgumentShape, FieldDef, RecordDef, RustPrimitive, TypeRef},
  codegen::endpoints::{EndpointsEmitter, href_placeholders},
  grouping::group_classes,
  metrics::GenerationWarning,
};

fn argument(name: &str, wire_fields: &[&str]) -> ArgumentShape {
  let fields = wire_fields
    .iter()
    .map(|wire| {
      FieldDef::builder()
        .name(*wire)
        .wire_name(*wire)
        .type_ref(TypeRef::new(RustPrimitive::String).with_option())
        .build()
    })
    .collect();
  ArgumentShape {
    root: RecordDef::builder().name(name).fields(fields).build(),
    nested: Vec::new(),
  }
}

fn emit(methods: &[ApiMethod], arguments: &IndexMap<String, ArgumentShape>) -> (String, Vec<GenerationWarning>) {
  let classes = group_classes(methods);
  let mut emitter = EndpointsEmitter::new(&classes, arguments);
  let code = format(&emitter.generate());
  (code, emitter.into_warnings())
}

#[test]
fn test_root_client_and_accessors() {
  let methods = vec![
    api_method(&["entries", "list"], "GET", "/entries"),
    api_method(&["entries", "locations", "list"], "GET", "/entries/locations"),
    api_method(&["me", "get"], "GET", "/me"),
  ];
  let (code, warnings) = emit(&methods, &IndexMap::new());
  assert!(warnings.is_empty());

  assert_contains(&code, "pub struct Toshl {");
  assert_contains(&code, "client: toshl_support::Client,");
  assert_contains(&code, "pub fn new(api_key: impl Into<String>) -> Self");
  assert_contains(&code, "pub fn with_client(client: toshl_support::Client) -> Self");
  assert_contains(&code, "pub fn entries(&self) -> Entries<'_>");
  assert_contains(&code, "pub fn me(&self) -> Me<'_>");
  assert_not_contains(&code, "pub fn locations(&self) -> EntriesLocations<'_>");

  assert_contains(&code, "/// Endpoints under `entries`.");
  assert_contains(&code, "pub struct Entries<'a> {");
  assert_contains(&code, "impl<'a> Entries<'a> {");
  assert_contains(&code, "pub fn locations(&self) -> EntriesLocations<'a>");
  assert_contains(&code, "pub struct EntriesLocations<'a> {");
}

#[test]
fn test_method_with_placeholder_and_return() {
  let mut get = api_method(&["entries", "get"], "GET", "/entries/{id}");
  get.returns = Some("Entry".to_string());
  let (code, _) = emit(&[get], &IndexMap::new());

  assert_contains(&code, "/// `GET /entries/{id}`");
  assert_contains(&code, "pub fn get(");
  assert_contains(&code, "id: &str");
  assert_contains(&code, "toshl_support::Payload<super::return_types::Entry>");
  assert_contains(&code, ".request(toshl_support::Method::GET, \"/entries/{id}\")");
  assert_contains(&code, ".path(\"id\", id)");
  assert_contains(&code, ".decode()");
  assert_not_contains(&code, ".argument(");
}

#[test]
fn test_argument_covers_placeholder() {
  let mut update = api_method(&["accounts", "update"], "PUT", "/accounts/{id}");
  update.argument = Some("AccountsUpdateArgument".to_string());
  let mut arguments = IndexMap::new();
  arguments.insert(
    "AccountsUpdateArgument".to_string(),
    argument("AccountsUpdateArgument", &["id", "name"]),
  );
  let (code, _) = emit(&[update], &arguments);

  assert_contains(&code, "args: &super::argument_types::AccountsUpdateArgument");
  assert_contains(&code, ".argument(args)?");
  assert_contains(&code, "Result<serde_json::Value, toshl_support::ApiError>");
  assert_contains(&code, ".into_value()");
  assert_not_contains(&code, "id: &str");
  assert_not_contains(&code, ".path(");
}

#[test]
fn test_nonstandard_verb() {
  let (code, _) = emit(&[api_method(&["entries", "purge"], "PURGE", "/entries")], &IndexMap::new());
  assert_contains(&code, "toshl_support::Method::from_bytes(b\"PURGE\")");
}

#[test]
fn test_keyword_verbs_are_raw() {
  let (code, _) = emit(
    &[api_method(&["accounts", "move"], "POST", "/accounts/{id}/move")],
    &IndexMap::new(),
  );
  assert_contains(&code, "pub fn r#move(");
}

#[test]
fn test_methods_sorted_by_verb() {
  let methods = vec![
    api_method(&["tags", "update"], "PUT", "/tags/{id}"),
    api_method(&["tags", "create"], "POST", "/tags"),
    api_method(&["tags", "list"], "GET", "/tags"),
  ];
  let (code, _) = emit(&methods, &IndexMap::new());

  let create = code.find("pub fn create(").unwrap();
  let list = code.find("pub fn list(").unwrap();
  let update = code.find("pub fn update(").unwrap();
  assert!(create < list && list < update);
}

#[test]
fn test_method_accessor_collision() {
  let methods = vec![
    api_method(&["me", "payments"], "GET", "/me/payments"),
    api_method(&["me", "payments", "list"], "GET", "/me/payments/list"),
  ];
  let (code, warnings) = emit(&methods, &IndexMap::new());

  assert_contains(&code, "pub fn payments(&self) -> MePayments<'a>");
  assert_contains(&code, "pub fn payments_endpoint(");
  assert_eq!(
    warnings,
    vec![GenerationWarning::MethodAccessorCollision {
      class: "Me".to_string(),
      method: "payments".to_string(),
      renamed: "payments_endpoint".to_string(),
    }]
  );
}

#[test]
fn test_root_methods_avoid_reserved_names() {
  let methods = vec![
    api_method(&["ping"], "GET", "/ping"),
    api_method(&["new"], "POST", "/new"),
  ];
  let (code, warnings) = emit(&methods, &IndexMap::new());

  assert_contains(&code, "pub fn ping(");
  assert_contains(&code, "pub fn new_endpoint(");
  assert_eq!(warnings.len(), 1);
  assert!(matches!(&warnings[0], GenerationWarning::MethodAccessorCollision { class, .. } if class == "Toshl"));
}

#[test]
fn test_href_placeholders() {
  assert_eq!(href_placeholders("/entries/{id}"), vec!["id"]);
  assert_eq!(
    href_placeholders("/categories/{category}/sums/{id}?x=1"),
    vec!["category", "id"]
  );
  assert!(href_placeholders("/me").is_empty());
}
