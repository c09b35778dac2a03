use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};

/// Type reference with wrapper support (Box, Option, Vec)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRef {
  pub base_type: RustPrimitive,
  pub boxed: bool,
  pub nullable: bool,
  pub is_array: bool,
}

impl TypeRef {
  pub fn new(base_type: impl Into<RustPrimitive>) -> Self {
    Self {
      base_type: base_type.into(),
      boxed: false,
      nullable: false,
      is_array: false,
    }
  }

  #[must_use]
  pub fn with_option(mut self) -> Self {
    self.nullable = true;
    self
  }

  #[must_use]
  pub fn with_vec(mut self) -> Self {
    self.is_array = true;
    self
  }

  #[must_use]
  pub fn with_boxed(mut self) -> Self {
    self.boxed = true;
    self
  }

  /// Name of the referenced record, if the base type is one.
  pub fn record_name(&self) -> Option<&str> {
    match &self.base_type {
      RustPrimitive::Record(name) => Some(name),
      _ => None,
    }
  }
}

impl std::fmt::Display for TypeRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut result = self.base_type.to_string();

    if self.boxed {
      result = format!("Box<{result}>");
    }

    if self.is_array {
      result = format!("Vec<{result}>");
    }

    if self.nullable {
      result = format!("Option<{result}>");
    }

    write!(f, "{result}")
  }
}

impl From<RustPrimitive> for TypeRef {
  fn from(primitive: RustPrimitive) -> Self {
    TypeRef::new(primitive)
  }
}

impl ToTokens for TypeRef {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let mut ty = self.base_type.to_token_stream();

    if self.boxed {
      ty = quote! { Box<#ty> };
    }

    if self.is_array {
      ty = quote! { Vec<#ty> };
    }

    if self.nullable {
      ty = quote! { Option<#ty> };
    }

    tokens.extend(ty);
  }
}

/// Base types a JSON Schema node can map to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum RustPrimitive {
  Bool,
  I64,
  F64,
  #[default]
  String,
  Date,
  DateTime,
  Value,
  /// A generated record, by its Rust type name.
  Record(String),
}

impl RustPrimitive {
  /// Maps a JSON Schema `type` and optional `format` onto a primitive.
  pub fn from_schema_type(schema_type: &str, format: Option<&str>) -> Self {
    match (schema_type, format) {
      ("boolean", _) => Self::Bool,
      ("integer", _) => Self::I64,
      ("number", _) => Self::F64,
      ("string", Some("date")) => Self::Date,
      ("string", Some("date-time")) => Self::DateTime,
      ("string", _) => Self::String,
      _ => Self::Value,
    }
  }
}

impl std::fmt::Display for RustPrimitive {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Self::Bool => "bool",
      Self::I64 => "i64",
      Self::F64 => "f64",
      Self::String => "String",
      Self::Date => "chrono::NaiveDate",
      Self::DateTime => "chrono::DateTime<chrono::Utc>",
      Self::Value => "serde_json::Value",
      Self::Record(name) => name,
    };
    write!(f, "{s}")
  }
}

impl ToTokens for RustPrimitive {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    tokens.extend(match self {
      Self::Bool => quote! { bool },
      Self::I64 => quote! { i64 },
      Self::F64 => quote! { f64 },
      Self::String => quote! { String },
      Self::Date => quote! { toshl_support::chrono::NaiveDate },
      Self::DateTime => quote! { toshl_support::chrono::DateTime<toshl_support::chrono::Utc> },
      Self::Value => quote! { serde_json::Value },
      Self::Record(name) => {
        let ident = format_ident!("{name}");
        quote! { #ident }
      }
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_schema_type() {
    assert_eq!(RustPrimitive::from_schema_type("boolean", None), RustPrimitive::Bool);
    assert_eq!(RustPrimitive::from_schema_type("integer", None), RustPrimitive::I64);
    assert_eq!(RustPrimitive::from_schema_type("number", Some("float")), RustPrimitive::F64);
    assert_eq!(RustPrimitive::from_schema_type("string", Some("date")), RustPrimitive::Date);
    assert_eq!(
      RustPrimitive::from_schema_type("string", Some("date-time")),
      RustPrimitive::DateTime
    );
    assert_eq!(RustPrimitive::from_schema_type("string", Some("email")), RustPrimitive::String);
    assert_eq!(RustPrimitive::from_schema_type("null", None), RustPrimitive::Value);
  }

  #[test]
  fn test_type_ref_display() {
    let type_ref = TypeRef::new(RustPrimitive::Record("Entry".to_string()))
      .with_boxed()
      .with_option();
    assert_eq!(type_ref.to_string(), "Option<Box<Entry>>");

    let type_ref = TypeRef::new(RustPrimitive::String).with_vec().with_option();
    assert_eq!(type_ref.to_string(), "Option<Vec<String>>");

    assert_eq!(TypeRef::new(RustPrimitive::Date).to_string(), "chrono::NaiveDate");
  }

  #[test]
  fn test_type_ref_tokens() {
    let type_ref = TypeRef::new(RustPrimitive::Record("Category".to_string()))
      .with_vec()
      .with_option();
    let ty: syn::Type = syn::parse2(type_ref.to_token_stream()).unwrap();
    assert_eq!(quote!(#ty).to_string(), "Option < Vec < Category > >");
  }

  #[test]
  fn test_record_name() {
    let type_ref = TypeRef::new(RustPrimitive::Record("Tag".to_string())).with_vec();
    assert_eq!(type_ref.record_name(), Some("Tag"));
    assert_eq!(TypeRef::new(RustPrimitive::F64).record_name(), None);
  }
}
