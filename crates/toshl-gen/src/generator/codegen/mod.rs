use anyhow::Context as _;
use proc_macro2::TokenStream;
use quote::quote;

use super::{
  filter::FilteredEndpoints, grouping::ResourceClass, metrics::GenerationWarning, registry::ReturnTypeRegistry,
};

pub mod endpoints;
pub mod lookup;
pub mod records;

#[cfg(test)]
mod tests;

pub const ARGUMENT_TYPES_FILE: &str = "argument_types.rs";
pub const RETURN_TYPES_FILE: &str = "return_types.rs";
pub const ENDPOINTS_FILE: &str = "endpoints.rs";
pub const LOOKUP_FILE: &str = "lookup.rs";
pub const MOD_FILE: &str = "mod.rs";

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  pub name: &'static str,
  pub source: String,
}

/// Everything a generation run writes, plus warnings raised while rendering.
#[derive(Debug, Clone, Default)]
pub struct GeneratedModule {
  pub files: Vec<GeneratedFile>,
  pub warnings: Vec<GenerationWarning>,
}

impl GeneratedModule {
  #[cfg(test)]
  pub fn file(&self, name: &str) -> Option<&GeneratedFile> {
    self.files.iter().find(|file| file.name == name)
  }
}

pub struct CodeGenerator<'a> {
  registry: &'a ReturnTypeRegistry,
  endpoints: &'a FilteredEndpoints,
  classes: &'a [ResourceClass],
}

impl<'a> CodeGenerator<'a> {
  pub fn new(registry: &'a ReturnTypeRegistry, endpoints: &'a FilteredEndpoints, classes: &'a [ResourceClass]) -> Self {
    Self {
      registry,
      endpoints,
      classes,
    }
  }

  pub fn generate(&self) -> anyhow::Result<GeneratedModule> {
    let mut module = GeneratedModule::default();

    let arguments: Vec<_> = self
      .endpoints
      .used_arguments()
      .into_iter()
      .flat_map(|shape| shape.records())
      .collect();
    module.files.push(GeneratedFile {
      name: ARGUMENT_TYPES_FILE,
      source: render_source(
        &records::records_module(&arguments),
        "Argument records accepted by the Toshl API endpoints.",
      )
      .context("failed to render argument types")?,
    });

    let returns: Vec<_> = self.registry.records().collect();
    module.files.push(GeneratedFile {
      name: RETURN_TYPES_FILE,
      source: render_source(
        &records::records_module(&returns),
        "Records returned by the Toshl API.",
      )
      .context("failed to render return types")?,
    });

    let mut emitter = endpoints::EndpointsEmitter::new(self.classes, &self.endpoints.arguments);
    let endpoint_tokens = emitter.generate();
    module.warnings.extend(emitter.into_warnings());
    module.files.push(GeneratedFile {
      name: ENDPOINTS_FILE,
      source: render_source(&endpoint_tokens, "Resource structs wrapping every Toshl API endpoint.")
        .context("failed to render endpoints")?,
    });

    module.files.push(GeneratedFile {
      name: LOOKUP_FILE,
      source: render_source(
        &lookup::lookup_module(self.endpoints.methods.values()),
        "Flat table of every generated endpoint, sorted by dotted name.",
      )
      .context("failed to render lookup table")?,
    });

    module.files.push(GeneratedFile {
      name: MOD_FILE,
      source: render_source(&mod_file(), "Generated Toshl API client.").context("failed to render mod.rs")?,
    });

    Ok(module)
  }
}

fn mod_file() -> TokenStream {
  quote! {
    pub mod argument_types;
    pub mod endpoints;
    pub mod lookup;
    pub mod return_types;

    pub use endpoints::Toshl;
    pub use lookup::{ENDPOINTS, endpoint};
  }
}

/// Formats `tokens` and prefixes the auto-generated header.
pub(crate) fn render_source(tokens: &TokenStream, summary: &str) -> anyhow::Result<String> {
  let syntax_tree: syn::File = syn::parse2(tokens.clone())?;
  let formatted = prettyplease::unparse(&syntax_tree);

  Ok(format!(
    r"//! AUTO-GENERATED CODE - DO NOT EDIT!
//!
//! {summary}
//! Generated by `{}` {}.
#![allow(clippy::all, clippy::pedantic)]

{formatted}",
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_VERSION"),
  ))
}

/// `#[doc]` attributes for an optional description, one per line.
pub(crate) fn doc_attrs(docs: Option<&str>) -> TokenStream {
  let lines: Vec<String> = docs
    .into_iter()
    .flat_map(str::lines)
    .map(|line| format!(" {}", line.trim_end()))
    .collect();
  quote! { #(#[doc = #lines])* }
}
