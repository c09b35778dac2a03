use std::collections::BTreeSet;

use crate::generator::{
  ast::ApiMethod,
  grouping::{class_name, group_classes},
  tests::support::api_method,
};

fn methods() -> Vec<ApiMethod> {
  vec![
    api_method(&["entries", "get"], "GET", "/entries/{id}"),
    api_method(&["entries", "transactions", "list"], "GET", "/entries/transactions"),
    api_method(&["me", "get"], "GET", "/me"),
    api_method(&["me", "payments", "cards", "list"], "GET", "/me/payments/cards"),
    api_method(&["accounts", "list"], "GET", "/accounts"),
    api_method(&["ping"], "GET", "/ping"),
  ]
}

#[test]
fn test_class_name() {
  let path = vec!["entries".to_string(), "transactions".to_string()];
  assert_eq!(class_name(&path), "EntriesTransactions");
  assert_eq!(class_name(&[]), "");
}

#[test]
fn test_classes_sorted_by_name_tokens() {
  let names: Vec<String> = group_classes(&methods()).into_iter().map(|class| class.name).collect();
  assert_eq!(
    names,
    vec!["", "Accounts", "EntriesTransactions", "Entries", "MePayments", "MePaymentsCards", "Me"]
  );
}

#[test]
fn test_root_class_holds_single_crumb_methods() {
  let classes = group_classes(&methods());
  let root = classes.iter().find(|class| class.is_root()).unwrap();
  assert_eq!(root.methods.len(), 1);
  assert_eq!(root.methods[0].verb(), "ping");
  assert!(root.subclasses.is_empty());
}

#[test]
fn test_self_link_lands_in_entries_class() {
  let classes = group_classes(&methods());
  let entries = classes.iter().find(|class| class.name == "Entries").unwrap();
  let get = entries.methods.iter().find(|method| method.verb() == "get").unwrap();
  assert_eq!(get.href, "/entries/{id}");
  assert_eq!(get.method, "GET");
  assert!(entries.is_top_level());
}

#[test]
fn test_intermediate_classes_are_created() {
  let classes = group_classes(&methods());
  let payments = classes.iter().find(|class| class.name == "MePayments").unwrap();
  assert!(payments.methods.is_empty());
  assert_eq!(
    payments.subclasses,
    BTreeSet::from([("cards".to_string(), "MePaymentsCards".to_string())])
  );

  let me = classes.iter().find(|class| class.name == "Me").unwrap();
  assert_eq!(
    me.subclasses,
    BTreeSet::from([("payments".to_string(), "MePayments".to_string())])
  );
}

#[test]
fn test_every_deep_endpoint_has_exactly_one_parent_link() {
  let methods = methods();
  let classes = group_classes(&methods);

  for method in methods.iter().filter(|method| method.crumbs.len() > 2) {
    let crumbs = method.crumbs.as_slice();
    let pair = (
      crumbs[crumbs.len() - 2].clone(),
      class_name(&crumbs[..crumbs.len() - 1]),
    );
    let owners: Vec<&str> = classes
      .iter()
      .filter(|class| class.subclasses.contains(&pair))
      .map(|class| class.name.as_str())
      .collect();
    assert_eq!(owners, vec![class_name(&crumbs[..crumbs.len() - 2])], "for {}", method.crumbs);
  }
}
