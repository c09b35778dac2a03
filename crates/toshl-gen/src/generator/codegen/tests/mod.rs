mod endpoints;

use proc_macro2::TokenStream;

use crate::generator::ast::{ApiMethod, Crumbs};

fn format(tokens: &TokenStream) -> String {
  let file: syn::File = syn::parse2(tokens.clone()).expect("generated tokens parse");
  prettyplease::unparse(&file)
}

fn api_method(parts: &[&str], method: &str, href: &str) -> ApiMethod {
  ApiMethod::builder()
    .crumbs(Crumbs::new(parts.iter().map(|part| (*part).to_string()).collect()))
    .method(method)
    .href(href)
    .build()
}

fn assert_contains(code: &str, expected: &str) {
  assert!(code.contains(expected), "expected '{expected}' in:\n{code}");
}

fn assert_not_contains(code: &str, pattern: &str) {
  assert!(!code.contains(pattern), "'{pattern}' should not appear in:\n{code}");
}
