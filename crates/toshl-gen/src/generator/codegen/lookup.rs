use proc_macro2::TokenStream;
use quote::quote;

use crate::generator::ast::ApiMethod;

/// Emits the `ENDPOINTS` table sorted by dotted name and a binary-search `endpoint` lookup.
pub(crate) fn lookup_module<'a>(methods: impl Iterator<Item = &'a ApiMethod>) -> TokenStream {
  let mut methods: Vec<&ApiMethod> = methods.collect();
  methods.sort_by_cached_key(|method| method.crumbs.dotted());

  let entries = methods.iter().map(|method| {
    let name = method.crumbs.dotted();
    let argument = optional_literal(method.argument.as_deref());
    let href = &method.href;
    let verb = &method.method;
    let returns = optional_literal(method.returns.as_deref());
    quote! {
      toshl_support::EndpointInfo {
        name: #name,
        argument: #argument,
        href: #href,
        method: #verb,
        returns: #returns,
      }
    }
  });

  quote! {
    pub const ENDPOINTS: &[toshl_support::EndpointInfo] = &[
      #(#entries),*
    ];

    /// Looks up an endpoint by dotted name, e.g. `entries.list`.
    pub fn endpoint(name: &str) -> Option<&'static toshl_support::EndpointInfo> {
      toshl_support::EndpointInfo::find(ENDPOINTS, name)
    }
  }
}

fn optional_literal(value: Option<&str>) -> TokenStream {
  match value {
    Some(value) => quote! { Some(#value) },
    None => quote! { None },
  }
}
