use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::doc_attrs;
use crate::generator::ast::{FieldDef, RecordDef};

/// A module body holding `records` in the given order.
///
/// Argument records only reference other argument records, so neither module
/// needs imports.
pub(crate) fn records_module(records: &[&RecordDef]) -> TokenStream {
  let records = records.iter().map(|record| record_tokens(record));

  quote! {
    #(#records)*
  }
}

pub(crate) fn record_tokens(record: &RecordDef) -> TokenStream {
  let name = format_ident!("{}", record.name);
  let docs = doc_attrs(record.docs.as_deref());
  let fields = record.fields.iter().map(field_tokens);

  quote! {
    #docs
    #[toshl_support::skip_serializing_none]
    #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
    pub struct #name {
      #(#fields),*
    }
  }
}

fn field_tokens(field: &FieldDef) -> TokenStream {
  let name = format_ident!("{}", field.name);
  let docs = doc_attrs(field.docs.as_deref());
  let type_ref = &field.type_ref;
  let rename = field.needs_rename().then(|| {
    let wire_name = &field.wire_name;
    quote! { #[serde(rename = #wire_name)] }
  });

  quote! {
    #docs
    #rename
    pub #name: #type_ref
  }
}
